//! Theory-side inputs: the precomputed τ grid of power spectra and the
//! provider seam that fills it.
//!
//! Responsibilities:
//!
//! - generate τ grids (`lin_space`)
//! - hold and look up precomputed theory spectra (`TheoryCurveTable`)
//! - abstract the Boltzmann solver behind `TheoryProvider` (with a toy
//!   analytic stand-in for tests and CLI runs)

pub mod provider;
pub mod table;
pub mod toy;

pub use provider::*;
pub use table::*;
pub use toy::*;
