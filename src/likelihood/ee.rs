//! Approximate EE auto-spectrum likelihood.
//!
//! Per multipole, with N = 2ℓ+1 independent modes, the log-likelihood
//! penalty for a scaled chi-squared-distributed spectrum estimator is
//!
//! ```text
//! chi2_ell = N · (Ĉ_ℓ/C_ℓ + ln(C_ℓ/Ĉ_ℓ) − 1)
//! ```
//!
//! which is zero exactly at Ĉ = C and asymptotically chi-squared
//! distributed at large ℓ. The constant offset is chosen so a perfect fit
//! scores zero; the analytic expectation of the statistic under the null
//! lives in [`crate::likelihood::null`].

use crate::error::EstimateError;
use crate::likelihood::{sum_over_ells, Chi2Sum};
use crate::theory::TheoryCurveTable;

/// EE-only likelihood against a fixed theory table.
#[derive(Debug, Clone, Copy)]
pub struct EeLikelihood<'a> {
    table: &'a TheoryCurveTable,
    /// Additive noise term applied to the theory spectrum before comparison.
    noise: f64,
}

impl<'a> EeLikelihood<'a> {
    pub fn new(table: &'a TheoryCurveTable, noise: f64) -> Self {
        Self { table, noise }
    }

    /// Per-ℓ chi-squared contributions for candidate `tau`.
    ///
    /// The returned vector includes ℓ = 0 and 1, which callers discard.
    /// Entries may be non-finite where Ĉ_ℓ or C_ℓ is zero; that is the
    /// documented failure mode and aggregation filters it.
    pub fn chi2_per_ell(&self, tau: f64, clhat: &[f64]) -> Result<Vec<f64>, EstimateError> {
        let idx = self.table.nearest(tau)?;
        let theory = &self.table.spectrum(idx).ee;
        if theory.len() != clhat.len() {
            return Err(EstimateError::evaluation(format!(
                "measured spectrum has {} multipoles, theory has {}",
                clhat.len(),
                theory.len()
            )));
        }

        let out = theory
            .iter()
            .zip(clhat.iter())
            .enumerate()
            .map(|(ell, (&cl, &hat))| {
                let n = (2 * ell + 1) as f64;
                let cl = cl + self.noise;
                n * (hat / cl + (cl / hat).ln() - 1.0)
            })
            .collect();
        Ok(out)
    }

    /// Total chi-squared over ℓ ≥ 2, with non-finite multipoles excluded
    /// and counted.
    pub fn chi2_total(&self, tau: f64, clhat: &[f64]) -> Result<Chi2Sum, EstimateError> {
        let per_ell = self.chi2_per_ell(tau, clhat)?;
        sum_over_ells(&per_ell)
    }
}
