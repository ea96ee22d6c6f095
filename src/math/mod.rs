//! Mathematical utilities: special functions for the likelihood models.

pub mod special;

pub use special::*;
