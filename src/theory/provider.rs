//! Provider seam for theory spectra.
//!
//! The statistics core never runs a Boltzmann solver. It asks a
//! `TheoryProvider` for (TT, TE, EE) at a given τ and caches the answers in
//! a [`TheoryCurveTable`]. Tests and CLI runs use the toy analytic provider;
//! a real solver binding would implement the same trait.

use crate::domain::TheorySpectrum;
use crate::error::AppError;
use crate::theory::table::TheoryCurveTable;

/// Source of theory power spectra, indexed by τ.
pub trait TheoryProvider {
    /// Spectra for `tau`, each field running ℓ = 0..=lmax.
    fn spectra(&self, tau: f64, lmax: usize) -> Result<TheorySpectrum, AppError>;
}

/// Evaluate a provider over a full τ grid.
pub fn build_table(
    provider: &dyn TheoryProvider,
    taus: &[f64],
    lmax: usize,
) -> Result<TheoryCurveTable, AppError> {
    let mut spectra = Vec::with_capacity(taus.len());
    for &tau in taus {
        spectra.push(provider.spectra(tau, lmax)?);
    }
    TheoryCurveTable::new(taus.to_vec(), spectra).map_err(AppError::from)
}
