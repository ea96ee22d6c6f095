//! Synthetic measurement generation.
//!
//! Stand-in for spherical-harmonic synthesis/analysis: we draw the harmonic
//! coefficients directly and form empirical power spectra from them, which
//! is distributionally identical to synthesizing a full-sky map and
//! re-analyzing it. Same seed ⇒ identical output.

pub mod gaussian;

pub use gaussian::*;
