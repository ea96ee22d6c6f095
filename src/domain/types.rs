//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during estimation
//! - exported to JSON
//! - reloaded later for comparisons across runs

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Lowest multipole included in any statistic.
///
/// ℓ = 0 (monopole) and ℓ = 1 (dipole) are unconstrained by the power
/// spectrum estimators; spectra are stored from ℓ = 0 for indexing
/// convenience, and every sum starts here.
pub const LMIN: usize = 2;

/// Theory power spectra for one value of τ, indexed by ℓ from 0.
///
/// Immutable after construction: the table owns one of these per grid point
/// and hands out references for the lifetime of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TheorySpectrum {
    /// Temperature auto-spectrum `C_ell^TT`.
    pub tt: Vec<f64>,
    /// Temperature–polarization cross-spectrum `C_ell^TE`.
    pub te: Vec<f64>,
    /// Polarization auto-spectrum `C_ell^EE`.
    pub ee: Vec<f64>,
}

impl TheorySpectrum {
    /// Number of multipoles (lmax + 1). Panics only if fields disagree,
    /// which construction sites never allow.
    pub fn len(&self) -> usize {
        debug_assert!(self.tt.len() == self.te.len() && self.te.len() == self.ee.len());
        self.ee.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ee.is_empty()
    }
}

/// One synthetic joint measurement: empirical TT/TE/EE from a single
/// realization of correlated (T, E) harmonic coefficients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasuredJoint {
    pub tt: Vec<f64>,
    pub te: Vec<f64>,
    pub ee: Vec<f64>,
}

/// Which likelihood(s) drive the fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FieldSet {
    /// EE auto-spectrum only (approximate per-ℓ chi-squared model).
    Ee,
    /// TE cross-spectrum only (exact closed-form density).
    Te,
    /// Sum of the EE and TE chi-squared totals per grid point.
    Joint,
}

impl FieldSet {
    pub fn display_name(&self) -> &'static str {
        match self {
            FieldSet::Ee => "EE",
            FieldSet::Te => "TE",
            FieldSet::Joint => "EE+TE",
        }
    }
}

/// Configuration for an estimation run or Monte-Carlo study.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudyConfig {
    /// Highest multipole evaluated (spectra run ℓ = 0..=lmax).
    pub lmax: usize,
    /// Number of Monte-Carlo trials.
    pub trials: usize,
    /// "Truth" τ at which synthetic measurements are drawn.
    pub truth_tau: f64,
    /// τ grid range (inclusive) and resolution.
    pub tau_min: f64,
    pub tau_max: f64,
    pub tau_steps: usize,
    /// Additive noise term applied to the theory EE spectrum before the
    /// likelihood comparison. Zero for the idealized noiseless case.
    pub noise: f64,
    /// Which spectra enter the fit.
    pub fields: FieldSet,
    /// Base seed; trial s uses `base_seed + s`.
    pub base_seed: u64,
}

impl Default for StudyConfig {
    fn default() -> Self {
        Self {
            lmax: 100,
            trials: 100,
            truth_tau: 0.06,
            tau_min: 0.03,
            tau_max: 0.09,
            tau_steps: 21,
            noise: 0.0,
            fields: FieldSet::Ee,
            base_seed: 0,
        }
    }
}

/// Outcome of one Monte-Carlo trial that produced a finite estimate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrialResult {
    /// Seed the trial's RNG was constructed from.
    pub seed: u64,
    /// Maximum-likelihood τ (grid argmin).
    pub tau_hat: f64,
    /// Minimum total chi-squared over the grid.
    pub chi2_min: f64,
}
