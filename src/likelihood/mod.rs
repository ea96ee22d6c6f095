//! Per-multipole likelihood models.
//!
//! Responsibilities:
//!
//! - EE auto-spectrum: approximate per-ℓ chi-squared penalty (`ee`)
//! - TE cross-spectrum: exact closed-form density (`te`)
//! - analytic null-hypothesis chi-squared moments (`null`)
//!
//! Both models share the same aggregation contract: per-ℓ vectors include
//! ℓ = 0 and 1 (discarded by convention), and totals sum finite values over
//! ℓ ≥ 2 while counting exclusions.

pub mod ee;
pub mod null;
pub mod te;

pub use ee::*;
pub use null::*;
pub use te::*;

use crate::domain::LMIN;
use crate::error::EstimateError;

/// A summed chi-squared statistic with its exclusion count.
///
/// `excluded_ells` is the number of multipoles ℓ ≥ 2 whose contribution was
/// non-finite and therefore left out of the sum. A non-zero count is the
/// per-ℓ "warning" surface of the error policy: recoverable, but visible.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Chi2Sum {
    pub chi2: f64,
    pub excluded_ells: usize,
}

/// Sum per-ℓ contributions over ℓ ≥ 2, excluding non-finite entries.
///
/// Fails with an evaluation error when every multipole is excluded (e.g. an
/// all-zero measured spectrum): there is no information left to report a
/// finite statistic from.
pub fn sum_over_ells(per_ell: &[f64]) -> Result<Chi2Sum, EstimateError> {
    if per_ell.len() <= LMIN {
        return Err(EstimateError::evaluation(format!(
            "spectrum too short: {} multipoles (need ell >= {LMIN})",
            per_ell.len()
        )));
    }

    let mut chi2 = 0.0;
    let mut excluded = 0;
    for &v in &per_ell[LMIN..] {
        if v.is_finite() {
            chi2 += v;
        } else {
            excluded += 1;
        }
    }

    let considered = per_ell.len() - LMIN;
    if excluded == considered {
        return Err(EstimateError::evaluation(
            "every multipole produced a non-finite statistic",
        ));
    }

    Ok(Chi2Sum {
        chi2,
        excluded_ells: excluded,
    })
}
