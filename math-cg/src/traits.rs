//! Core traits for linear algebra operations
//!
//! This module defines the abstractions shared by vectors, matrices and the solver:
//! - [`RealField`]: Trait for real scalar types
//! - [`LinearOperator`]: Trait for matrix-like objects that can perform matrix-vector products

use crate::error::Result;
use crate::vector::DenseVector;
use num_traits::{Float, FromPrimitive, NumAssign, ToPrimitive};
use std::fmt::{Debug, Display};

/// Trait for scalar types that can be used in the vector, matrix and solver code.
///
/// # Implementations
///
/// Provided for:
/// - `f64` (default everywhere)
/// - `f32` (for memory-constrained applications)
pub trait RealField:
    Float
    + NumAssign
    + FromPrimitive
    + ToPrimitive
    + Debug
    + Display
    + Default
    + Send
    + Sync
    + 'static
{
    /// Squared magnitude x²
    #[inline]
    fn norm_sqr(&self) -> Self {
        *self * *self
    }

    /// Widen to `f64` for diagnostics and error payloads
    #[inline]
    fn to_f64_lossy(&self) -> f64 {
        self.to_f64().unwrap_or(f64::NAN)
    }
}

impl RealField for f64 {}

impl RealField for f32 {}

/// Trait for linear operators (matrices) that can perform matrix-vector products.
///
/// The CG solver is generic over this trait, so any SPD operator that can
/// apply itself to a vector can be solved, not only [`CsrMatrix`](crate::CsrMatrix).
pub trait LinearOperator<T: RealField>: Send + Sync {
    /// Number of rows in the operator
    fn num_rows(&self) -> usize;

    /// Number of columns in the operator
    fn num_cols(&self) -> usize;

    /// Apply the operator: y = A * x
    ///
    /// Fails with [`SolverError::DimensionMismatch`](crate::SolverError) if
    /// `x.len() != self.num_cols()`.
    fn apply(&self, x: &DenseVector<T>) -> Result<DenseVector<T>>;

    /// Check if the operator is square
    fn is_square(&self) -> bool {
        self.num_rows() == self.num_cols()
    }
}
