//! Monte-Carlo characterization of the τ estimator.

pub mod harness;

pub use harness::*;
