//! Level-1 vector kernels
//!
//! Free-function forms of the reductions and updates used by the solver:
//! inner products, norms and `axpy`. All of them check operand lengths and
//! report [`SolverError::DimensionMismatch`](crate::SolverError) instead of
//! panicking.

use crate::error::Result;
use crate::traits::RealField;
use crate::vector::DenseVector;

/// Compute inner product (x, y) = Σ x_i * y_i
#[inline]
pub fn dot_product<T: RealField>(x: &DenseVector<T>, y: &DenseVector<T>) -> Result<T> {
    x.dot(y)
}

/// Compute vector 2-norm: ||x||_2 = sqrt(Σ x_i^2)
#[inline]
pub fn norm<T: RealField>(x: &DenseVector<T>) -> T {
    x.norm()
}

/// Compute vector norm squared: ||x||_2^2 = Σ x_i^2
///
/// Cheaper than squaring [`norm`] when the square root isn't needed.
#[inline]
pub fn norm_sqr<T: RealField>(x: &DenseVector<T>) -> T {
    x.norm_sqr()
}

/// Compute axpy: y = α * x + y
#[inline]
pub fn axpy<T: RealField>(alpha: T, x: &DenseVector<T>, y: &mut DenseVector<T>) -> Result<()> {
    y.axpy(alpha, x)
}
