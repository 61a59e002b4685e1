//! Iterative solvers for linear systems
//!
//! - [`cg`]: Conjugate Gradient - for symmetric positive definite systems

mod cg;

pub use cg::{CgConfig, CgSolution, CgStatus, cg, cg_with_guess, solve_cg};
