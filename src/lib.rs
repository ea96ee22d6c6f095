//! `cmb-tau` library crate.
//!
//! The binary (`cmbtau`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - modules are reusable (e.g., future samplers, notebooks, etc.)
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod domain;
pub mod error;
pub mod estimate;
pub mod io;
pub mod likelihood;
pub mod math;
pub mod mc;
pub mod report;
pub mod synth;
pub mod theory;
