//! Order-independent CSR construction
//!
//! [`CsrBuilder`] collects `(row, col, value)` triplets in any order and
//! freezes them with one stable counting sort plus a prefix sum, so the
//! per-insert `row_ptrs` update of [`CsrMatrix::set`] and its row-order
//! restriction both go away.

use crate::error::{Result, SolverError};
use crate::sparse::csr::CsrMatrix;
use crate::traits::RealField;
use std::collections::HashMap;

/// What to do with repeated `(row, col)` entries when the matrix is frozen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// Store every entry; multiply sums them (same as [`CsrMatrix::set`])
    #[default]
    Keep,
    /// Merge into one entry holding the sum, added in insertion order
    Sum,
    /// Merge into one entry holding the most recently pushed value
    Last,
}

/// Builder for constructing CSR matrices from unordered triplets
#[derive(Debug, Clone)]
pub struct CsrBuilder<T: RealField = f64> {
    num_rows: usize,
    num_cols: usize,
    triplets: Vec<(usize, usize, T)>,
    policy: DuplicatePolicy,
}

impl<T: RealField> CsrBuilder<T> {
    /// Create a new CSR builder
    pub fn new(num_rows: usize, num_cols: usize) -> Self {
        Self::with_capacity(num_rows, num_cols, 0)
    }

    /// Create a new CSR builder with estimated non-zeros
    pub fn with_capacity(num_rows: usize, num_cols: usize, nnz_estimate: usize) -> Self {
        Self {
            num_rows,
            num_cols,
            triplets: Vec::with_capacity(nnz_estimate),
            policy: DuplicatePolicy::default(),
        }
    }

    /// Choose how repeated entries are combined by [`finish`](Self::finish)
    pub fn duplicates(mut self, policy: DuplicatePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Record `value` at `(row, col)`; any order is accepted
    pub fn push(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        if row >= self.num_rows || col >= self.num_cols {
            return Err(SolverError::EntryOutOfRange {
                row,
                col,
                rows: self.num_rows,
                cols: self.num_cols,
            });
        }
        self.triplets.push((row, col, value));
        Ok(())
    }

    /// Number of triplets pushed so far
    pub fn len(&self) -> usize {
        self.triplets.len()
    }

    /// `true` if nothing has been pushed
    pub fn is_empty(&self) -> bool {
        self.triplets.is_empty()
    }

    /// Finish building and return the CSR matrix
    ///
    /// Entries of a row keep the order in which they were pushed.
    pub fn finish(self) -> CsrMatrix<T> {
        let num_rows = self.num_rows;
        let nnz = self.triplets.len();

        let mut row_ptrs = vec![0usize; num_rows + 1];
        for &(row, _, _) in &self.triplets {
            row_ptrs[row + 1] += 1;
        }
        for i in 0..num_rows {
            row_ptrs[i + 1] += row_ptrs[i];
        }

        let mut cursor = row_ptrs[..num_rows].to_vec();
        let mut col_indices = vec![0usize; nnz];
        let mut values = vec![T::zero(); nnz];
        for (row, col, val) in self.triplets {
            let slot = cursor[row];
            col_indices[slot] = col;
            values[slot] = val;
            cursor[row] += 1;
        }

        match self.policy {
            DuplicatePolicy::Keep => CsrMatrix::from_sorted_parts(
                num_rows,
                self.num_cols,
                row_ptrs,
                col_indices,
                values,
            ),
            DuplicatePolicy::Sum => merge_duplicates(
                num_rows,
                self.num_cols,
                &row_ptrs,
                &col_indices,
                &values,
                |acc, v| *acc += v,
            ),
            DuplicatePolicy::Last => merge_duplicates(
                num_rows,
                self.num_cols,
                &row_ptrs,
                &col_indices,
                &values,
                |acc, v| *acc = v,
            ),
        }
    }
}

/// Collapse repeated columns within each row, keeping first-occurrence order
fn merge_duplicates<T: RealField>(
    num_rows: usize,
    num_cols: usize,
    row_ptrs: &[usize],
    col_indices: &[usize],
    values: &[T],
    combine: impl Fn(&mut T, T),
) -> CsrMatrix<T> {
    // col -> output position, for the current row only
    let mut seen: HashMap<usize, usize> = HashMap::new();
    let mut out_values = Vec::with_capacity(values.len());
    let mut out_cols = Vec::with_capacity(values.len());
    let mut out_ptrs = vec![0usize; num_rows + 1];

    for i in 0..num_rows {
        seen.clear();
        for k in row_ptrs[i]..row_ptrs[i + 1] {
            let col = col_indices[k];
            match seen.get(&col) {
                Some(&pos) => combine(&mut out_values[pos], values[k]),
                None => {
                    seen.insert(col, out_values.len());
                    out_values.push(values[k]);
                    out_cols.push(col);
                }
            }
        }
        out_ptrs[i + 1] = out_values.len();
    }

    CsrMatrix::from_sorted_parts(num_rows, num_cols, out_ptrs, out_cols, out_values)
}
