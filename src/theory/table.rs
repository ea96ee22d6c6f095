//! The τ grid of precomputed theory spectra.
//!
//! Why nearest-neighbor instead of interpolation?
//! - Exact theory evaluation per candidate τ is expensive; a dense
//!   precomputed grid amortizes the cost across every likelihood call.
//! - Snapping to the closest grid point keeps the lookup trivially correct;
//!   it bounds achievable τ resolution to the grid spacing, which callers
//!   control by choosing the grid density.

use crate::domain::TheorySpectrum;
use crate::error::EstimateError;

/// Generate `steps` linearly spaced points between `min` and `max` (inclusive).
pub fn lin_space(min: f64, max: f64, steps: usize) -> Result<Vec<f64>, EstimateError> {
    if !(min.is_finite() && max.is_finite() && min > 0.0 && max > min) {
        return Err(EstimateError::invalid_grid(format!(
            "min={min}, max={max} (must be finite, >0, and max>min)"
        )));
    }
    if steps < 2 {
        return Err(EstimateError::invalid_grid("steps must be >= 2"));
    }

    let step = (max - min) / (steps as f64 - 1.0);
    let mut out = Vec::with_capacity(steps);
    for i in 0..steps {
        out.push(min + step * i as f64);
    }
    Ok(out)
}

/// Sorted τ grid with one precomputed theory spectrum per grid point.
///
/// Constructed once per run and reused read-only across all trials.
#[derive(Debug, Clone)]
pub struct TheoryCurveTable {
    taus: Vec<f64>,
    spectra: Vec<TheorySpectrum>,
}

impl TheoryCurveTable {
    /// Build a table from parallel arrays.
    ///
    /// Invariants enforced here so lookups never re-check them:
    /// - one spectrum per τ
    /// - τ values strictly increasing
    /// - all spectra share one lmax
    pub fn new(taus: Vec<f64>, spectra: Vec<TheorySpectrum>) -> Result<Self, EstimateError> {
        if taus.len() != spectra.len() {
            return Err(EstimateError::invalid_grid(format!(
                "{} tau values but {} spectra",
                taus.len(),
                spectra.len()
            )));
        }
        if taus.windows(2).any(|w| !(w[1] > w[0])) {
            return Err(EstimateError::invalid_grid(
                "tau values must be strictly increasing",
            ));
        }
        if let Some(first) = spectra.first() {
            let len = first.len();
            if spectra.iter().any(|s| s.len() != len) {
                return Err(EstimateError::invalid_grid(
                    "spectra have inconsistent lmax",
                ));
            }
        }
        Ok(Self { taus, spectra })
    }

    pub fn len(&self) -> usize {
        self.taus.len()
    }

    pub fn is_empty(&self) -> bool {
        self.taus.is_empty()
    }

    pub fn taus(&self) -> &[f64] {
        &self.taus
    }

    pub fn spectrum(&self, index: usize) -> &TheorySpectrum {
        &self.spectra[index]
    }

    /// Highest multipole stored, or `None` for an empty table.
    pub fn lmax(&self) -> Option<usize> {
        self.spectra.first().map(|s| s.len().saturating_sub(1))
    }

    /// Index of the grid point closest to `tau`.
    ///
    /// Linear scan for the global minimum of |grid − tau|; ties break to the
    /// lowest index. No interpolation is ever performed.
    pub fn nearest(&self, tau: f64) -> Result<usize, EstimateError> {
        if self.taus.is_empty() {
            return Err(EstimateError::EmptyTable);
        }
        // A NaN tau compares false against every distance and would land
        // on index 0 as if it were a hit.
        if !tau.is_finite() {
            return Err(EstimateError::invalid_grid(format!(
                "non-finite tau lookup: {tau}"
            )));
        }
        let mut best = 0;
        let mut best_dist = (self.taus[0] - tau).abs();
        for (i, &t) in self.taus.iter().enumerate().skip(1) {
            let d = (t - tau).abs();
            if d < best_dist {
                best = i;
                best_dist = d;
            }
        }
        Ok(best)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat(v: f64, lmax: usize) -> TheorySpectrum {
        TheorySpectrum {
            tt: vec![v; lmax + 1],
            te: vec![v; lmax + 1],
            ee: vec![v; lmax + 1],
        }
    }

    fn table(taus: &[f64]) -> TheoryCurveTable {
        let spectra = taus.iter().map(|_| flat(1.0, 4)).collect();
        TheoryCurveTable::new(taus.to_vec(), spectra).unwrap()
    }

    #[test]
    fn lin_space_includes_endpoints() {
        let v = lin_space(0.03, 0.09, 21).unwrap();
        assert_eq!(v.len(), 21);
        assert!((v[0] - 0.03).abs() < 1e-12);
        assert!((v[20] - 0.09).abs() < 1e-12);
        assert!((v[10] - 0.06).abs() < 1e-12);
    }

    #[test]
    fn lin_space_rejects_bad_ranges() {
        assert!(lin_space(0.09, 0.03, 5).is_err());
        assert!(lin_space(0.03, 0.09, 1).is_err());
        assert!(lin_space(f64::NAN, 0.09, 5).is_err());
    }

    #[test]
    fn nearest_returns_closest_index() {
        let t = table(&[0.04, 0.06, 0.08]);
        assert_eq!(t.nearest(0.061).unwrap(), 1);
        assert_eq!(t.nearest(0.0).unwrap(), 0);
        assert_eq!(t.nearest(1.0).unwrap(), 2);
    }

    #[test]
    fn nearest_minimality_property() {
        let taus: Vec<f64> = (0..50).map(|i| 0.02 + 0.001 * i as f64).collect();
        let t = table(&taus);
        for &q in &[0.0199, 0.0334, 0.0445, 0.069, 0.2] {
            let i = t.nearest(q).unwrap();
            let d = (taus[i] - q).abs();
            for (j, &tj) in taus.iter().enumerate() {
                assert!((tj - q).abs() >= d, "index {j} beats nearest() for q={q}");
            }
        }
    }

    #[test]
    fn nearest_tie_breaks_to_lowest_index() {
        let t = table(&[0.04, 0.06]);
        // 0.05 is equidistant from both grid points.
        assert_eq!(t.nearest(0.05).unwrap(), 0);
    }

    #[test]
    fn nearest_fails_on_empty_table() {
        let t = TheoryCurveTable::new(vec![], vec![]).unwrap();
        assert_eq!(t.nearest(0.06), Err(EstimateError::EmptyTable));
    }

    #[test]
    fn nearest_fails_on_nonfinite_tau() {
        let t = table(&[0.04, 0.06, 0.08]);
        assert!(t.nearest(f64::NAN).is_err());
        assert!(t.nearest(f64::INFINITY).is_err());
    }

    #[test]
    fn new_rejects_unsorted_taus() {
        let spectra = vec![flat(1.0, 4), flat(1.0, 4)];
        assert!(TheoryCurveTable::new(vec![0.06, 0.04], spectra).is_err());
    }
}
