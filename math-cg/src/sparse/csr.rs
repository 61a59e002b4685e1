//! Compressed Sparse Row (CSR) matrix format
//!
//! CSR format stores:
//! - `values`: Non-zero entries in row-major order
//! - `col_indices`: Column index for each value
//! - `row_ptrs`: Index into values/col_indices where each row starts
//!
//! The arrays are private: every constructor and [`CsrMatrix::set`] keeps
//! `row_ptrs` non-decreasing with `row_ptrs[0] == 0` and
//! `row_ptrs[num_rows] == nnz`.

use crate::error::{Result, SolverError};
use crate::sparse::builder::{CsrBuilder, DuplicatePolicy};
use crate::traits::{LinearOperator, RealField};
use crate::vector::DenseVector;
use ndarray::Array2;
use std::ops::Range;

/// Compressed Sparse Row (CSR) matrix format
///
/// Memory-efficient storage for sparse matrices with O(nnz) space complexity.
/// Matrix-vector products are O(nnz) instead of O(n²) for dense matrices.
///
/// # Duplicate entries
///
/// Setting the same `(row, col)` twice stores two entries. [`multiply`](Self::multiply),
/// [`get`](Self::get) and [`to_dense`](Self::to_dense) all see the sum of
/// the duplicates. Use [`CsrBuilder`] with [`DuplicatePolicy::Sum`] or
/// [`DuplicatePolicy::Last`] to merge them at construction time instead.
#[derive(Debug, Clone, PartialEq)]
pub struct CsrMatrix<T: RealField = f64> {
    num_rows: usize,
    num_cols: usize,
    values: Vec<T>,
    col_indices: Vec<usize>,
    row_ptrs: Vec<usize>,
    /// Row of the last stored entry; `set` may not go below it
    last_row: Option<usize>,
}

impl<T: RealField> CsrMatrix<T> {
    /// Create a new empty CSR matrix
    pub fn new(num_rows: usize, num_cols: usize) -> Self {
        Self::with_capacity(num_rows, num_cols, 0)
    }

    /// Create a CSR matrix with pre-allocated capacity
    ///
    /// `nnz_estimate` is only a hint; storage grows past it as needed.
    pub fn with_capacity(num_rows: usize, num_cols: usize, nnz_estimate: usize) -> Self {
        Self {
            num_rows,
            num_cols,
            values: Vec::with_capacity(nnz_estimate),
            col_indices: Vec::with_capacity(nnz_estimate),
            row_ptrs: vec![0; num_rows + 1],
            last_row: None,
        }
    }

    /// Assemble from arrays already known to satisfy the CSR invariants
    pub(crate) fn from_sorted_parts(
        num_rows: usize,
        num_cols: usize,
        row_ptrs: Vec<usize>,
        col_indices: Vec<usize>,
        values: Vec<T>,
    ) -> Self {
        debug_assert_eq!(row_ptrs.len(), num_rows + 1);
        debug_assert_eq!(col_indices.len(), values.len());
        let last_row = (0..num_rows).rev().find(|&i| row_ptrs[i + 1] > row_ptrs[i]);
        Self {
            num_rows,
            num_cols,
            values,
            col_indices,
            row_ptrs,
            last_row,
        }
    }

    /// Create a CSR matrix from raw components
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::InvalidStructure`] if the arrays are inconsistent:
    /// - `row_ptrs` must have length `num_rows + 1`, start at 0 and never decrease
    /// - `col_indices` and `values` must have the same length
    /// - `row_ptrs[num_rows]` must equal `values.len()`
    /// - every column index must be `< num_cols`
    pub fn from_raw_parts(
        num_rows: usize,
        num_cols: usize,
        row_ptrs: Vec<usize>,
        col_indices: Vec<usize>,
        values: Vec<T>,
    ) -> Result<Self> {
        if row_ptrs.len() != num_rows + 1 {
            return Err(SolverError::InvalidStructure(format!(
                "row_ptrs has {} entries, expected {}",
                row_ptrs.len(),
                num_rows + 1
            )));
        }
        if row_ptrs[0] != 0 {
            return Err(SolverError::InvalidStructure(format!(
                "row_ptrs[0] is {}, expected 0",
                row_ptrs[0]
            )));
        }
        if let Some(i) = row_ptrs.windows(2).position(|w| w[0] > w[1]) {
            return Err(SolverError::InvalidStructure(format!(
                "row_ptrs decreases at row {}: {} > {}",
                i,
                row_ptrs[i],
                row_ptrs[i + 1]
            )));
        }
        if col_indices.len() != values.len() {
            return Err(SolverError::InvalidStructure(format!(
                "{} column indices for {} values",
                col_indices.len(),
                values.len()
            )));
        }
        if row_ptrs[num_rows] != values.len() {
            return Err(SolverError::InvalidStructure(format!(
                "row_ptrs[{}] is {}, expected nnz = {}",
                num_rows,
                row_ptrs[num_rows],
                values.len()
            )));
        }
        if let Some(&col) = col_indices.iter().find(|&&c| c >= num_cols) {
            return Err(SolverError::InvalidStructure(format!(
                "column index {} out of range for {} columns",
                col, num_cols
            )));
        }

        Ok(Self::from_sorted_parts(
            num_rows,
            num_cols,
            row_ptrs,
            col_indices,
            values,
        ))
    }

    /// Create a CSR matrix from a dense matrix
    ///
    /// Only stores entries with magnitude > threshold
    pub fn from_dense(dense: &Array2<T>, threshold: T) -> Self {
        let num_rows = dense.nrows();
        let num_cols = dense.ncols();

        let mut values = Vec::new();
        let mut col_indices = Vec::new();
        let mut row_ptrs = vec![0usize; num_rows + 1];

        for i in 0..num_rows {
            for j in 0..num_cols {
                let val = dense[[i, j]];
                if val.abs() > threshold {
                    values.push(val);
                    col_indices.push(j);
                }
            }
            row_ptrs[i + 1] = values.len();
        }

        Self::from_sorted_parts(num_rows, num_cols, row_ptrs, col_indices, values)
    }

    /// Create a CSR matrix from COO (Coordinate) format triplets
    ///
    /// Triplets are (row, col, value) in any order. Duplicate entries are summed.
    pub fn from_triplets(
        num_rows: usize,
        num_cols: usize,
        triplets: impl IntoIterator<Item = (usize, usize, T)>,
    ) -> Result<Self> {
        let mut builder = CsrBuilder::new(num_rows, num_cols).duplicates(DuplicatePolicy::Sum);
        for (row, col, val) in triplets {
            builder.push(row, col, val)?;
        }
        Ok(builder.finish())
    }

    /// Create identity matrix in CSR format
    pub fn identity(n: usize) -> Self {
        Self::from_diagonal(&DenseVector::from_elem(n, T::one()))
    }

    /// Create diagonal matrix from vector
    pub fn from_diagonal(diag: &DenseVector<T>) -> Self {
        let n = diag.len();
        Self::from_sorted_parts(n, n, (0..=n).collect(), (0..n).collect(), diag.to_vec())
    }

    /// Append `value` at `(row, col)`
    ///
    /// Rows must arrive in non-decreasing order; columns within a row may
    /// come in any order. Setting an existing entry again stores a
    /// duplicate that is summed on multiply.
    ///
    /// # Errors
    ///
    /// - [`SolverError::EntryOutOfRange`] if `row >= num_rows` or `col >= num_cols`
    /// - [`SolverError::UnorderedInsertion`] if `row` is below the previously set row
    pub fn set(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        if row >= self.num_rows || col >= self.num_cols {
            return Err(SolverError::EntryOutOfRange {
                row,
                col,
                rows: self.num_rows,
                cols: self.num_cols,
            });
        }
        match self.last_row {
            Some(last_row) if row < last_row => {
                return Err(SolverError::UnorderedInsertion { row, last_row });
            }
            _ => {}
        }

        self.values.push(value);
        self.col_indices.push(col);
        for ptr in &mut self.row_ptrs[row + 1..] {
            *ptr += 1;
        }
        self.last_row = Some(row);
        Ok(())
    }

    /// Number of rows
    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    /// Number of columns
    pub fn num_cols(&self) -> usize {
        self.num_cols
    }

    /// Number of stored entries (duplicates included)
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Sparsity ratio (fraction of non-zero entries)
    pub fn sparsity(&self) -> f64 {
        // in f64, rows * cols may exceed usize
        let total = self.num_rows as f64 * self.num_cols as f64;
        if total == 0.0 {
            0.0
        } else {
            self.nnz() as f64 / total
        }
    }

    /// Stored values in row-major order
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Column index of each stored value
    pub fn col_indices(&self) -> &[usize] {
        &self.col_indices
    }

    /// Row pointers, length `num_rows + 1`
    pub fn row_ptrs(&self) -> &[usize] {
        &self.row_ptrs
    }

    /// Get the range of indices in values/col_indices for a given row
    ///
    /// # Panics
    ///
    /// Panics if `row >= num_rows`.
    pub fn row_range(&self, row: usize) -> Range<usize> {
        self.row_ptrs[row]..self.row_ptrs[row + 1]
    }

    /// Get the (col, value) pairs for a row, in stored order
    pub fn row_entries(&self, row: usize) -> impl Iterator<Item = (usize, T)> + '_ {
        let range = self.row_range(row);
        self.col_indices[range.clone()]
            .iter()
            .copied()
            .zip(self.values[range].iter().copied())
    }

    /// Matrix-vector product: y = A * x
    ///
    /// Each `y[i]` is accumulated in stored order, so the result is
    /// bit-reproducible for a given insertion sequence.
    ///
    /// # Errors
    ///
    /// [`SolverError::DimensionMismatch`] if `x.len() != num_cols`.
    pub fn multiply(&self, x: &DenseVector<T>) -> Result<DenseVector<T>> {
        if x.len() != self.num_cols {
            return Err(SolverError::DimensionMismatch {
                expected: self.num_cols,
                got: x.len(),
            });
        }

        let x = x.as_slice();
        Ok((0..self.num_rows)
            .map(|i| {
                let mut sum = T::zero();
                for idx in self.row_range(i) {
                    sum += self.values[idx] * x[self.col_indices[idx]];
                }
                sum
            })
            .collect())
    }

    /// Get element at (i, j), summing duplicates; returns 0 if not stored
    pub fn get(&self, i: usize, j: usize) -> Result<T> {
        if i >= self.num_rows || j >= self.num_cols {
            return Err(SolverError::EntryOutOfRange {
                row: i,
                col: j,
                rows: self.num_rows,
                cols: self.num_cols,
            });
        }
        Ok(self
            .row_entries(i)
            .filter(|&(col, _)| col == j)
            .fold(T::zero(), |acc, (_, v)| acc + v))
    }

    /// Extract diagonal elements
    pub fn diagonal(&self) -> DenseVector<T> {
        let n = self.num_rows.min(self.num_cols);
        let mut diag = DenseVector::zeros(n);

        for i in 0..n {
            for (j, v) in self.row_entries(i) {
                if j == i {
                    diag[i] += v;
                }
            }
        }

        diag
    }

    /// Check `A[i][j] == A[j][i]` within `tol` for every stored entry
    ///
    /// CG requires a symmetric matrix; this is a diagnostic, the solver
    /// does not call it.
    pub fn is_symmetric(&self, tol: T) -> bool {
        if self.num_rows != self.num_cols {
            return false;
        }
        (0..self.num_rows).all(|i| {
            self.row_entries(i)
                .all(|(j, _)| match (self.get(i, j), self.get(j, i)) {
                    (Ok(a_ij), Ok(a_ji)) => (a_ij - a_ji).abs() <= tol,
                    _ => false,
                })
        })
    }

    /// Convert to dense matrix (for debugging/small matrices)
    pub fn to_dense(&self) -> Array2<T> {
        let mut dense = Array2::from_elem((self.num_rows, self.num_cols), T::zero());

        for i in 0..self.num_rows {
            for (j, v) in self.row_entries(i) {
                dense[[i, j]] += v;
            }
        }

        dense
    }
}

impl<T: RealField> LinearOperator<T> for CsrMatrix<T> {
    fn num_rows(&self) -> usize {
        self.num_rows
    }

    fn num_cols(&self) -> usize {
        self.num_cols
    }

    fn apply(&self, x: &DenseVector<T>) -> Result<DenseVector<T>> {
        self.multiply(x)
    }
}
