//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - spectrum containers (`TheorySpectrum`, `MeasuredJoint`)
//! - run configuration (`StudyConfig`, `FieldSet`)
//! - per-trial outputs (`TrialResult`)

pub mod types;

pub use types::*;
