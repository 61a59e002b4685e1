//! Sparse linear algebra for symmetric positive definite systems
//!
//! This crate provides a Compressed Sparse Row matrix, a dense vector with
//! checked arithmetic, and a Conjugate Gradient solver built on both.
//!
//! # Features
//!
//! - **Sparse Matrices**: CSR format with ordered `set`, an order-free builder,
//!   and O(nnz) matrix-vector products
//! - **Dense Vectors**: add/subtract/scale/dot/norm with dimension checks
//! - **Iterative Solver**: Conjugate Gradient reporting status and iteration count
//! - **Generic Scalar Types**: Works with f64 (default) and f32
//!
//! # Example
//!
//! ```
//! use math_audio_cg::{CsrMatrix, DenseVector, solve_cg};
//!
//! // A = | 2 -1  0 |
//! //     |-1  2 -1 |
//! //     | 0 -1  2 |
//! let mut a: CsrMatrix<f64> = CsrMatrix::with_capacity(3, 3, 7);
//! for (row, col, val) in [
//!     (0, 0, 2.0), (0, 1, -1.0),
//!     (1, 0, -1.0), (1, 1, 2.0), (1, 2, -1.0),
//!     (2, 1, -1.0), (2, 2, 2.0),
//! ] {
//!     a.set(row, col, val)?;
//! }
//!
//! let b = DenseVector::from_vec(vec![1.0, 0.0, 1.0]);
//! let x0 = DenseVector::zeros(3);
//! let solution = solve_cg(&a, &b, &x0, 100, 1e-6)?;
//!
//! assert!(solution.converged());
//! assert!((solution.x[1] - 1.0).abs() < 1e-5);
//! # Ok::<(), math_audio_cg::SolverError>(())
//! ```

pub mod blas_helpers;
pub mod error;
pub mod iterative;
pub mod sparse;
pub mod traits;
pub mod vector;

// Re-export main types
pub use error::{Result, SolverError};
pub use sparse::{CsrBuilder, CsrMatrix, DuplicatePolicy};
pub use traits::{LinearOperator, RealField};
pub use vector::DenseVector;

// Re-export vector kernels
pub use blas_helpers::{axpy, dot_product, norm, norm_sqr};

// Re-export the solver
pub use iterative::{CgConfig, CgSolution, CgStatus, cg, cg_with_guess, solve_cg};
