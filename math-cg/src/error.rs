//! Error types for sparse matrix, vector and solver operations.
//!
//! Follows the same layout as the other math-audio crates: a single
//! `thiserror` enum, a crate-wide `Result` alias, and `is_*` helpers for
//! coarse error categorization.

use thiserror::Error;

/// Errors that can occur while building matrices, combining vectors or
/// running the Conjugate Gradient solver.
///
/// Running out of iterations is not an error: it is reported through
/// [`CgStatus::MaxIterationsExhausted`](crate::CgStatus).
#[derive(Debug, Error)]
pub enum SolverError {
    /// Operand lengths or shapes disagree.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch {
        /// Length required by the operation
        expected: usize,
        /// Length actually provided
        got: usize,
    },

    /// Vector index outside `0..len`.
    #[error("index {index} out of range for vector of length {len}")]
    IndexOutOfRange {
        /// The offending index
        index: usize,
        /// Length of the vector
        len: usize,
    },

    /// Matrix entry outside `rows x cols`.
    #[error("entry ({row}, {col}) out of range for {rows}x{cols} matrix")]
    EntryOutOfRange {
        /// Requested row
        row: usize,
        /// Requested column
        col: usize,
        /// Number of rows of the matrix
        rows: usize,
        /// Number of columns of the matrix
        cols: usize,
    },

    /// `set` was called with a row smaller than the previous one.
    #[error("unordered insertion: row {row} inserted after row {last_row}")]
    UnorderedInsertion {
        /// Row of the rejected insertion
        row: usize,
        /// Row of the previous insertion
        last_row: usize,
    },

    /// Zero or non-positive `p·Ap` during CG: the matrix is not SPD or is degenerate.
    #[error("singular or ill-conditioned system at iteration {iteration}: p·Ap = {denominator:e}")]
    SingularOrIllConditioned {
        /// Iteration at which the breakdown happened
        iteration: usize,
        /// The offending denominator
        denominator: f64,
    },

    /// Raw CSR arrays do not describe a valid matrix.
    #[error("invalid CSR structure: {0}")]
    InvalidStructure(String),

    /// Tolerance is negative or not finite.
    #[error("invalid tolerance: {tolerance} (must be finite and >= 0)")]
    InvalidTolerance {
        /// The rejected tolerance
        tolerance: f64,
    },

    /// Reading or writing a configuration file failed.
    #[error("config i/o: {0}")]
    Io(#[from] std::io::Error),

    /// A configuration file is not valid JSON for the expected type.
    #[error("config format: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized `Result` type for this crate.
pub type Result<T> = std::result::Result<T, SolverError>;

impl SolverError {
    /// Returns `true` if this is a shape/length disagreement.
    pub fn is_dimension_error(&self) -> bool {
        matches!(self, SolverError::DimensionMismatch { .. })
    }

    /// Returns `true` for vector and matrix bounds errors.
    pub fn is_index_error(&self) -> bool {
        matches!(
            self,
            SolverError::IndexOutOfRange { .. } | SolverError::EntryOutOfRange { .. }
        )
    }

    /// Returns `true` if the solver broke down numerically.
    pub fn is_numerical_error(&self) -> bool {
        matches!(self, SolverError::SingularOrIllConditioned { .. })
    }
}
