//! Reporting: formatted terminal output for estimate and study runs.

pub mod format;

pub use format::*;
