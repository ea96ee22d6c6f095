//! Chi-squared curves over the τ grid and the estimators derived from them.
//!
//! Filtering policy (applied uniformly): a grid point whose evaluation
//! fails or comes back non-finite is stored as NaN in the curve and counted,
//! immediately. `argmin` and `weighted_moments` then only ever consider
//! finite points; no running minimum is accumulated over unfiltered values.

use rayon::prelude::*;

use crate::error::EstimateError;
use crate::likelihood::Chi2Sum;

/// Total chi-squared evaluated at each τ grid point.
#[derive(Debug, Clone)]
pub struct Chi2Curve {
    taus: Vec<f64>,
    totals: Vec<f64>,
    /// Multipoles excluded across all grid points (per-ℓ failures).
    excluded_ells: usize,
    /// Grid points whose evaluation failed outright or was non-finite.
    failed_points: usize,
}

impl Chi2Curve {
    /// Evaluate `eval` at every grid τ in parallel.
    ///
    /// `eval` failures and non-finite totals become NaN entries; the curve
    /// records how many, so instability is visible rather than silent.
    pub fn build<F>(taus: &[f64], eval: F) -> Result<Self, EstimateError>
    where
        F: Fn(f64) -> Result<Chi2Sum, EstimateError> + Sync,
    {
        if taus.is_empty() {
            return Err(EstimateError::EmptyTable);
        }

        let evaluated: Vec<(f64, usize)> = taus
            .par_iter()
            .map(|&tau| match eval(tau) {
                Ok(sum) if sum.chi2.is_finite() => (sum.chi2, sum.excluded_ells),
                Ok(sum) => (f64::NAN, sum.excluded_ells),
                Err(_) => (f64::NAN, 0),
            })
            .collect();

        let mut totals = Vec::with_capacity(evaluated.len());
        let mut excluded_ells = 0;
        let mut failed_points = 0;
        for (chi2, excl) in evaluated {
            if chi2.is_nan() {
                failed_points += 1;
            }
            excluded_ells += excl;
            totals.push(chi2);
        }

        Ok(Self {
            taus: taus.to_vec(),
            totals,
            excluded_ells,
            failed_points,
        })
    }

    /// Build from precomputed totals (used by tests and the joint fit).
    pub fn from_totals(taus: Vec<f64>, totals: Vec<f64>) -> Result<Self, EstimateError> {
        if taus.is_empty() {
            return Err(EstimateError::EmptyTable);
        }
        if taus.len() != totals.len() {
            return Err(EstimateError::invalid_grid(format!(
                "{} tau values but {} chi2 totals",
                taus.len(),
                totals.len()
            )));
        }
        let failed_points = totals.iter().filter(|v| !v.is_finite()).count();
        Ok(Self {
            taus,
            totals,
            excluded_ells: 0,
            failed_points,
        })
    }

    /// Pointwise sum of two curves on the same grid (joint EE+TE fit).
    /// A point that is non-finite in either curve is non-finite in the sum.
    pub fn add(&self, other: &Chi2Curve) -> Result<Chi2Curve, EstimateError> {
        if self.taus != other.taus {
            return Err(EstimateError::invalid_grid(
                "cannot add chi2 curves on different tau grids",
            ));
        }
        let totals: Vec<f64> = self
            .totals
            .iter()
            .zip(other.totals.iter())
            .map(|(a, b)| a + b)
            .collect();
        let failed_points = totals.iter().filter(|v| !v.is_finite()).count();
        Ok(Chi2Curve {
            taus: self.taus.clone(),
            totals,
            excluded_ells: self.excluded_ells + other.excluded_ells,
            failed_points,
        })
    }

    pub fn taus(&self) -> &[f64] {
        &self.taus
    }

    pub fn totals(&self) -> &[f64] {
        &self.totals
    }

    pub fn excluded_ells(&self) -> usize {
        self.excluded_ells
    }

    pub fn failed_points(&self) -> usize {
        self.failed_points
    }
}

/// Maximum-likelihood grid point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridEstimate {
    pub index: usize,
    pub tau_hat: f64,
    pub chi2_min: f64,
}

/// Likelihood-weighted mean/variance of τ over the grid.
///
/// Approximates the posterior moments under a flat prior over the evaluated
/// grid; only valid when the grid spans the full region of non-negligible
/// likelihood mass (the caller owns grid-range adequacy).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedMoments {
    pub mean: f64,
    pub variance: f64,
    /// Grid points excluded as non-finite.
    pub excluded_points: usize,
}

impl WeightedMoments {
    pub fn std_dev(&self) -> f64 {
        self.variance.max(0.0).sqrt()
    }
}

/// Grid τ minimizing the total chi-squared; first occurrence wins ties.
pub fn argmin(curve: &Chi2Curve) -> Result<GridEstimate, EstimateError> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &chi2) in curve.totals().iter().enumerate() {
        if !chi2.is_finite() {
            continue;
        }
        match best {
            Some((_, b)) if chi2 >= b => {}
            _ => best = Some((i, chi2)),
        }
    }
    let (index, chi2_min) = best.ok_or(EstimateError::DegenerateLikelihood)?;
    Ok(GridEstimate {
        index,
        tau_hat: curve.taus()[index],
        chi2_min,
    })
}

/// Likelihood-weighted moments: `L(τ) = exp(−(χ²(τ) − χ²_min)/2)`,
/// `mean = Στ·L/ΣL`, `variance = Στ²·L/ΣL − mean²` over finite points only.
pub fn weighted_moments(curve: &Chi2Curve) -> Result<WeightedMoments, EstimateError> {
    let chi2_min = argmin(curve)?.chi2_min;

    let mut sum_l = 0.0;
    let mut sum_tl = 0.0;
    let mut sum_ttl = 0.0;
    let mut excluded = 0;
    for (&tau, &chi2) in curve.taus().iter().zip(curve.totals().iter()) {
        if !chi2.is_finite() {
            excluded += 1;
            continue;
        }
        let l = (-(chi2 - chi2_min) / 2.0).exp();
        if !l.is_finite() {
            excluded += 1;
            continue;
        }
        sum_l += l;
        sum_tl += tau * l;
        sum_ttl += tau * tau * l;
    }

    if !(sum_l > 0.0 && sum_l.is_finite()) {
        return Err(EstimateError::DegenerateLikelihood);
    }

    let mean = sum_tl / sum_l;
    let variance = sum_ttl / sum_l - mean * mean;
    Ok(WeightedMoments {
        mean,
        variance,
        excluded_points: excluded,
    })
}
