//! Sparse matrix structures (CSR format)
//!
//! This module provides Compressed Sparse Row (CSR) format for efficient
//! storage and matrix-vector operations with sparse matrices, plus a
//! triplet builder that accepts entries in any order.

mod builder;
mod csr;

pub use builder::{CsrBuilder, DuplicatePolicy};
pub use csr::CsrMatrix;
