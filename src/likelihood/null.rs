//! Analytic null-hypothesis moments of the chi-squared statistic.
//!
//! When the measured spectrum is drawn from the candidate theory itself, the
//! EE penalty statistic has known exact moments per multipole:
//!
//! ```text
//! E[χ²_ℓ]   = (2ℓ+1) (ln(ℓ+½) − ψ₀(ℓ+½))
//! Var[χ²_ℓ] = (2ℓ+1) ((2ℓ+1) ψ₁(ℓ+½) − 2)
//! ```
//!
//! summed over ℓ ≥ 2. The Monte-Carlo harness compares the empirical
//! distribution of the minimum chi-squared against these as a
//! simulation-independent goodness-of-fit reference. This is the single
//! shared implementation; nothing re-derives these sums inline.

use serde::{Deserialize, Serialize};
use statrs::function::gamma::digamma;

use crate::domain::LMIN;
use crate::math::trigamma;

/// Mean and variance of the null-hypothesis chi-squared statistic.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Chi2Moments {
    pub mean: f64,
    pub variance: f64,
}

impl Chi2Moments {
    pub fn std_dev(&self) -> f64 {
        self.variance.sqrt()
    }
}

/// Per-ℓ expectation `(2ℓ+1)(ln(ℓ+½) − ψ₀(ℓ+½))`.
pub fn null_chi2_mean_ell(ell: usize) -> f64 {
    let n = (2 * ell + 1) as f64;
    let x = ell as f64 + 0.5;
    n * (x.ln() - digamma(x))
}

/// Per-ℓ variance `(2ℓ+1)((2ℓ+1)ψ₁(ℓ+½) − 2)`.
pub fn null_chi2_var_ell(ell: usize) -> f64 {
    let n = (2 * ell + 1) as f64;
    let x = ell as f64 + 0.5;
    n * (n * trigamma(x) - 2.0)
}

/// Total null moments over ℓ = 2..=lmax.
pub fn null_chi2_moments(lmax: usize) -> Chi2Moments {
    let mut mean = 0.0;
    let mut variance = 0.0;
    for ell in LMIN..=lmax {
        mean += null_chi2_mean_ell(ell);
        variance += null_chi2_var_ell(ell);
    }
    Chi2Moments { mean, variance }
}
