//! CG (Conjugate Gradient) solver
//!
//! The Conjugate Gradient method for symmetric positive definite systems.
//! This is the method of choice for SPD matrices as it has optimal convergence.
//!
//! Convergence is tested on the relative residual `‖r‖ < tolerance · ‖b‖`.
//! A zero right-hand side short-circuits to the zero solution, and a zero
//! residual stops the iteration before any division by `r·r`.

use crate::error::{Result, SolverError};
use crate::traits::{LinearOperator, RealField};
use crate::vector::DenseVector;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// CG solver configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, bound(deserialize = "R: RealField + Deserialize<'de>"))]
pub struct CgConfig<R> {
    /// Maximum number of iterations
    pub max_iterations: usize,
    /// Relative tolerance for convergence
    pub tolerance: R,
    /// Print progress every N iterations (0 = no output)
    pub print_interval: usize,
}

impl<R: RealField> Default for CgConfig<R> {
    fn default() -> Self {
        Self {
            max_iterations: 1000,
            tolerance: R::from_f64(1e-6).unwrap_or_else(R::epsilon),
            print_interval: 0,
        }
    }
}

impl<R: RealField> CgConfig<R> {
    /// Configuration with the given budget and tolerance, progress logging off
    pub fn new(max_iterations: usize, tolerance: R) -> Self {
        Self {
            max_iterations,
            tolerance,
            print_interval: 0,
        }
    }
}

impl<R: RealField + Serialize + DeserializeOwned> CgConfig<R> {
    /// Load from JSON file; missing fields take their default values
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Save to JSON file
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

/// How a CG run terminated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CgStatus {
    /// The relative residual dropped below the tolerance
    Converged,
    /// The iteration budget ran out first; `x` is the last iterate
    MaxIterationsExhausted,
}

/// CG solver result
#[derive(Debug, Clone)]
pub struct CgSolution<T: RealField> {
    /// Solution vector
    pub x: DenseVector<T>,
    /// Termination state
    pub status: CgStatus,
    /// Number of iterations
    pub iterations: usize,
    /// Final residual norm ‖r‖ (recurrence residual)
    pub residual_norm: T,
    /// Final relative residual ‖r‖ / ‖b‖
    pub relative_residual: T,
}

impl<T: RealField> CgSolution<T> {
    /// Whether convergence was achieved
    pub fn converged(&self) -> bool {
        self.status == CgStatus::Converged
    }
}

/// Solve Ax = b using the Conjugate Gradient method, starting from x = 0
///
/// Note: This method is only correct for symmetric positive definite matrices.
pub fn cg<T, A>(operator: &A, b: &DenseVector<T>, config: &CgConfig<T>) -> Result<CgSolution<T>>
where
    T: RealField,
    A: LinearOperator<T> + ?Sized,
{
    let x0 = DenseVector::zeros(operator.num_cols());
    cg_with_guess(operator, b, &x0, config)
}

/// Solve Ax = b with CG from `x0`, with the budget and tolerance given directly
pub fn solve_cg<T, A>(
    operator: &A,
    b: &DenseVector<T>,
    x0: &DenseVector<T>,
    max_iterations: usize,
    tolerance: T,
) -> Result<CgSolution<T>>
where
    T: RealField,
    A: LinearOperator<T> + ?Sized,
{
    cg_with_guess(operator, b, x0, &CgConfig::new(max_iterations, tolerance))
}

/// Solve Ax = b using the Conjugate Gradient method from an initial guess
///
/// # Errors
///
/// - [`SolverError::DimensionMismatch`] if the operator is not square or
///   `b`/`x0` do not match its size
/// - [`SolverError::InvalidTolerance`] if the tolerance is negative or not finite
/// - [`SolverError::SingularOrIllConditioned`] if `p·Ap <= 0`, which means
///   the operator is not SPD
///
/// Exhausting `max_iterations` is not an error; check [`CgSolution::status`].
pub fn cg_with_guess<T, A>(
    operator: &A,
    b: &DenseVector<T>,
    x0: &DenseVector<T>,
    config: &CgConfig<T>,
) -> Result<CgSolution<T>>
where
    T: RealField,
    A: LinearOperator<T> + ?Sized,
{
    let n = operator.num_rows();
    if !operator.is_square() {
        return Err(SolverError::DimensionMismatch {
            expected: n,
            got: operator.num_cols(),
        });
    }
    for len in [b.len(), x0.len()] {
        if len != n {
            return Err(SolverError::DimensionMismatch {
                expected: n,
                got: len,
            });
        }
    }
    if !config.tolerance.is_finite() || config.tolerance < T::zero() {
        return Err(SolverError::InvalidTolerance {
            tolerance: config.tolerance.to_f64_lossy(),
        });
    }

    let b_norm = b.norm();
    if b_norm == T::zero() {
        // A is SPD, so x = 0 is the exact solution
        log::debug!("CG: zero right-hand side, returning zero solution");
        return Ok(CgSolution {
            x: DenseVector::zeros(n),
            status: CgStatus::Converged,
            iterations: 0,
            residual_norm: T::zero(),
            relative_residual: T::zero(),
        });
    }
    let threshold = config.tolerance * b_norm;

    let mut x = x0.clone();
    let mut r = b.checked_sub(&operator.apply(&x)?)?;
    let mut p = r.clone();
    let mut rr = r.norm_sqr();

    log::debug!(
        "CG started: n = {}, initial relative residual = {:.6e}",
        n,
        (rr.sqrt() / b_norm).to_f64_lossy()
    );

    for iter in 0..config.max_iterations {
        if is_converged(rr, threshold) {
            return Ok(finish(x, CgStatus::Converged, iter, rr, b_norm));
        }

        // Ap = A * p
        let ap = operator.apply(&p)?;

        // alpha = (r, r) / (p, Ap)
        let p_ap = p.dot(&ap)?;
        if p_ap <= T::zero() || !p_ap.is_finite() {
            return Err(SolverError::SingularOrIllConditioned {
                iteration: iter,
                denominator: p_ap.to_f64_lossy(),
            });
        }
        let alpha = rr / p_ap;

        // x = x + alpha * p, r = r - alpha * Ap
        x.axpy(alpha, &p)?;
        r.axpy(-alpha, &ap)?;

        // rr > 0 here, the convergence check above caught rr == 0
        let rr_new = r.norm_sqr();
        let beta = rr_new / rr;

        // p = r + beta * p
        p = r.checked_add(&(p * beta))?;
        rr = rr_new;

        if config.print_interval > 0 && (iter + 1) % config.print_interval == 0 {
            log::info!(
                "CG iteration {}: relative residual = {:.6e}",
                iter + 1,
                (rr.sqrt() / b_norm).to_f64_lossy()
            );
        }
    }

    if is_converged(rr, threshold) {
        return Ok(finish(
            x,
            CgStatus::Converged,
            config.max_iterations,
            rr,
            b_norm,
        ));
    }

    let solution = finish(
        x,
        CgStatus::MaxIterationsExhausted,
        config.max_iterations,
        rr,
        b_norm,
    );
    log::warn!(
        "CG did not converge in {} iterations: relative residual = {:.6e}",
        config.max_iterations,
        solution.relative_residual.to_f64_lossy()
    );
    Ok(solution)
}

#[inline]
fn is_converged<T: RealField>(rr: T, threshold: T) -> bool {
    rr == T::zero() || rr.sqrt() < threshold
}

fn finish<T: RealField>(
    x: DenseVector<T>,
    status: CgStatus,
    iterations: usize,
    rr: T,
    b_norm: T,
) -> CgSolution<T> {
    let residual_norm = rr.sqrt();
    log::debug!(
        "CG finished: {:?} after {} iterations, residual = {:.6e}",
        status,
        iterations,
        residual_norm.to_f64_lossy()
    );
    CgSolution {
        x,
        status,
        iterations,
        residual_norm,
        relative_residual: residual_norm / b_norm,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sparse::CsrMatrix;
    use approx::assert_relative_eq;
    use ndarray::array;

    fn tridiagonal(n: usize) -> CsrMatrix<f64> {
        let mut a = CsrMatrix::with_capacity(n, n, 3 * n);
        for i in 0..n {
            if i > 0 {
                a.set(i, i - 1, -1.0).unwrap();
            }
            a.set(i, i, 2.0).unwrap();
            if i + 1 < n {
                a.set(i, i + 1, -1.0).unwrap();
            }
        }
        a
    }

    fn residual(a: &CsrMatrix<f64>, x: &DenseVector<f64>, b: &DenseVector<f64>) -> f64 {
        a.multiply(x).unwrap().checked_sub(b).unwrap().norm()
    }

    #[test]
    fn test_cg_spd() {
        // Symmetric positive definite matrix
        let dense = array![[4.0_f64, 1.0], [1.0, 3.0]];

        let a = CsrMatrix::from_dense(&dense, 1e-15);
        let b = DenseVector::from_vec(vec![1.0_f64, 2.0]);

        let config = CgConfig {
            max_iterations: 100,
            tolerance: 1e-10,
            print_interval: 0,
        };

        let solution = cg(&a, &b, &config).unwrap();

        assert!(solution.converged(), "CG should converge for SPD matrix");
        assert!(residual(&a, &solution.x, &b) < 1e-8, "Solution should satisfy Ax = b");
    }

    #[test]
    fn test_cg_tridiagonal_3x3() {
        let a = tridiagonal(3);
        let b = DenseVector::from_vec(vec![1.0, 0.0, 1.0]);
        let x0 = DenseVector::zeros(3);

        let solution = solve_cg(&a, &b, &x0, 100, 1e-6).unwrap();

        assert_eq!(solution.status, CgStatus::Converged);
        assert!(solution.iterations <= 3);
        let error = solution
            .x
            .checked_sub(&DenseVector::from_elem(3, 1.0))
            .unwrap()
            .norm();
        assert!(error < 1e-5, "error = {}", error);
    }

    #[test]
    fn test_cg_identity() {
        let n = 5;
        let id: CsrMatrix<f64> = CsrMatrix::identity(n);
        let b: DenseVector = (1..=n).map(|i| i as f64).collect();

        let config = CgConfig {
            max_iterations: 10,
            tolerance: 1e-12,
            print_interval: 1,
        };

        let solution = cg(&id, &b, &config).unwrap();

        assert!(solution.converged());
        assert!(solution.iterations <= 2);

        let error = solution.x.checked_sub(&b).unwrap().norm();
        assert!(error < 1e-10);
    }

    #[test]
    fn test_zero_rhs_short_circuits() {
        let a = tridiagonal(4);
        let b = DenseVector::zeros(4);
        let x0 = DenseVector::from_vec(vec![1.0, -1.0, 2.0, 0.5]);

        let solution = solve_cg(&a, &b, &x0, 50, 1e-8).unwrap();

        assert!(solution.converged());
        assert_eq!(solution.iterations, 0);
        assert_eq!(solution.x, DenseVector::zeros(4));
        assert_eq!(solution.residual_norm, 0.0);
        assert!(solution.relative_residual.is_finite());
    }

    #[test]
    fn test_exact_initial_guess() {
        let a = tridiagonal(3);
        let b = DenseVector::from_vec(vec![1.0, 0.0, 1.0]);
        let x0 = DenseVector::from_elem(3, 1.0);

        let solution = solve_cg(&a, &b, &x0, 10, 0.0).unwrap();

        assert!(solution.converged());
        assert_eq!(solution.iterations, 0);
        assert_eq!(solution.x, x0);

        // same with no iteration budget at all
        let solution = solve_cg(&a, &b, &x0, 0, 1e-6).unwrap();
        assert!(solution.converged());
        assert_eq!(solution.iterations, 0);
    }

    #[test]
    fn test_empty_system() {
        let a: CsrMatrix = CsrMatrix::new(0, 0);
        let b = DenseVector::zeros(0);

        let solution = cg(&a, &b, &CgConfig::default()).unwrap();

        assert!(solution.converged());
        assert!(solution.x.is_empty());
    }

    #[test]
    fn test_max_iterations_exhausted() {
        let n = 50;
        let a = tridiagonal(n);
        let b = DenseVector::from_elem(n, 1.0);

        let solution = cg(&a, &b, &CgConfig::new(3, 1e-10)).unwrap();

        assert_eq!(solution.status, CgStatus::MaxIterationsExhausted);
        assert!(!solution.converged());
        assert_eq!(solution.iterations, 3);
        assert!(solution.relative_residual > 1e-10);
        assert_eq!(solution.x.len(), n);
    }

    #[test]
    fn test_converged_on_last_iteration() {
        // two distinct eigenvalues: CG terminates in exactly 2 steps
        let a = CsrMatrix::from_diagonal(&DenseVector::from_vec(vec![1.0, 2.0, 2.0]));
        let b = DenseVector::from_vec(vec![1.0, 1.0, 1.0]);

        let solution = cg(&a, &b, &CgConfig::new(2, 1e-10)).unwrap();

        assert!(solution.converged());
        assert_eq!(solution.iterations, 2);
        assert_relative_eq!(solution.x[0], 1.0, epsilon = 1e-12);
        assert_relative_eq!(solution.x[1], 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_indefinite_matrix_is_rejected() {
        let a = CsrMatrix::from_diagonal(&DenseVector::from_vec(vec![1.0, -1.0]));
        let b = DenseVector::from_vec(vec![1.0, 1.0]);

        let err = cg(&a, &b, &CgConfig::default()).unwrap_err();

        assert!(err.is_numerical_error());
        assert!(matches!(
            err,
            SolverError::SingularOrIllConditioned { iteration: 0, .. }
        ));
    }

    #[test]
    fn test_negative_definite_matrix_is_rejected() {
        let a = CsrMatrix::from_diagonal(&DenseVector::from_vec(vec![-2.0, -3.0]));
        let b = DenseVector::from_vec(vec![1.0, 1.0]);

        let err = cg(&a, &b, &CgConfig::default()).unwrap_err();
        match err {
            SolverError::SingularOrIllConditioned { denominator, .. } => {
                assert!(denominator < 0.0)
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_dimension_checks() {
        let a = tridiagonal(3);
        let config = CgConfig::default();

        let err = cg(&a, &DenseVector::zeros(2), &config).unwrap_err();
        assert!(err.is_dimension_error());

        let err = cg_with_guess(
            &a,
            &DenseVector::zeros(3),
            &DenseVector::zeros(4),
            &config,
        )
        .unwrap_err();
        assert!(err.is_dimension_error());

        let rect: CsrMatrix = CsrMatrix::new(2, 3);
        let err = cg(&rect, &DenseVector::zeros(2), &config).unwrap_err();
        assert!(matches!(
            err,
            SolverError::DimensionMismatch {
                expected: 2,
                got: 3
            }
        ));
    }

    #[test]
    fn test_invalid_tolerance() {
        let a = tridiagonal(2);
        let b = DenseVector::from_vec(vec![1.0, 1.0]);

        for tolerance in [-1.0, f64::NAN, f64::INFINITY] {
            let err = cg(&a, &b, &CgConfig::new(10, tolerance)).unwrap_err();
            assert!(matches!(err, SolverError::InvalidTolerance { .. }));
        }
    }

    #[test]
    fn test_dyn_operator() {
        let a = tridiagonal(3);
        let op: &dyn LinearOperator<f64> = &a;
        let b = DenseVector::from_vec(vec![1.0, 0.0, 1.0]);

        let solution = cg(op, &b, &CgConfig::new(10, 1e-12)).unwrap();
        assert!(solution.converged());
    }

    #[test]
    fn test_f32_solve() {
        let a = CsrMatrix::from_dense(&array![[4.0_f32, 1.0], [1.0, 3.0]], 0.0);
        let b = DenseVector::from_vec(vec![1.0_f32, 2.0]);

        let solution = cg(&a, &b, &CgConfig::new(20, 1e-5_f32)).unwrap();

        assert!(solution.converged());
        // exact: x = [1/11, 7/11]
        assert_relative_eq!(solution.x[0], 1.0 / 11.0, epsilon = 1e-4);
        assert_relative_eq!(solution.x[1], 7.0 / 11.0, epsilon = 1e-4);
    }

    #[test]
    fn test_config_default_and_json() {
        let config: CgConfig<f64> = CgConfig::default();
        assert_eq!(config.max_iterations, 1000);
        assert_relative_eq!(config.tolerance, 1e-6);
        assert_eq!(config.print_interval, 0);

        let partial: CgConfig<f64> = serde_json::from_str(r#"{"tolerance": 1e-9}"#).unwrap();
        assert_eq!(partial.max_iterations, 1000);
        assert_relative_eq!(partial.tolerance, 1e-9);

        let path = std::env::temp_dir().join(format!("cg_config_{}.json", std::process::id()));
        let config = CgConfig {
            max_iterations: 42,
            tolerance: 1e-7,
            print_interval: 5,
        };
        config.save_json(&path).unwrap();
        let loaded = CgConfig::<f64>::from_json_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_config_missing_file() {
        let err = CgConfig::<f64>::from_json_file("/nonexistent/cg.json").unwrap_err();
        assert!(matches!(err, SolverError::Io(_)));
    }
}
