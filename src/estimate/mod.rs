//! Grid-based τ estimation.
//!
//! Responsibilities:
//!
//! - evaluate the total chi-squared at every τ grid point (parallel)
//! - pick the maximum-likelihood grid point (argmin)
//! - compute likelihood-weighted posterior-style moments

pub mod grid;

pub use grid::*;
