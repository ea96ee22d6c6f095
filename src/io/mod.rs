//! File I/O: the theory-table text cache and report export.

pub mod cache;
pub mod export;

pub use cache::*;
pub use export::*;
