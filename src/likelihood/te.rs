//! Exact TE cross-spectrum likelihood.
//!
//! Under the idealized full-sky, noiseless, Gaussian-field assumption the
//! empirical cross-spectrum estimator at multipole ℓ (N = 2ℓ+1 modes) has
//! the exact closed-form density
//!
//! ```text
//! p(ĉ) = N^((N+1)/2) |ĉ|^((N−1)/2) exp(Nρĉ/z) K_{(N−1)/2}(N|ĉ|/z)
//!        ────────────────────────────────────────────────────────
//!        2^((N−1)/2) √π Γ(N/2) √z (TT·EE)^(N/4)
//! ```
//!
//! with ρ = TE/√(TT·EE), z = (1−ρ²)√(TT·EE) and K the modified Bessel
//! function of the second kind. The Bessel order (N−1)/2 equals ℓ, an exact
//! integer. N|ĉ|/z grows with ℓ, so the naive product form overflows; we
//! assemble ln p term by term in the log domain instead and only ever
//! exponentiate differences.

use statrs::function::gamma::ln_gamma;

use crate::error::EstimateError;
use crate::likelihood::{sum_over_ells, Chi2Sum};
use crate::math::ln_kn;
use crate::theory::TheoryCurveTable;

const LN_2: f64 = std::f64::consts::LN_2;

/// TE cross-spectrum likelihood against a fixed theory table.
#[derive(Debug, Clone, Copy)]
pub struct TeLikelihood<'a> {
    table: &'a TheoryCurveTable,
}

impl<'a> TeLikelihood<'a> {
    pub fn new(table: &'a TheoryCurveTable) -> Self {
        Self { table }
    }

    /// Per-ℓ log-density of the measured TE values under candidate `tau`.
    ///
    /// Multipoles with inconsistent theory (TT·EE ≤ 0 or |ρ| ≥ 1, i.e.
    /// z ≤ 0) yield NaN: they are a likelihood-model failure for that ℓ and
    /// aggregation excludes and counts them rather than folding a bogus
    /// number into the total.
    pub fn ln_density_per_ell(&self, tau: f64, tehat: &[f64]) -> Result<Vec<f64>, EstimateError> {
        let idx = self.table.nearest(tau)?;
        let theory = self.table.spectrum(idx);
        if theory.len() != tehat.len() {
            return Err(EstimateError::evaluation(format!(
                "measured spectrum has {} multipoles, theory has {}",
                tehat.len(),
                theory.len()
            )));
        }

        let out = (0..tehat.len())
            .map(|ell| {
                ln_density_ell(
                    ell,
                    tehat[ell],
                    theory.tt[ell],
                    theory.ee[ell],
                    theory.te[ell],
                )
            })
            .collect();
        Ok(out)
    }

    /// Per-ℓ chi-squared-equivalent statistic `−2 ln p(ĉ_ℓ)`.
    pub fn chi2_per_ell(&self, tau: f64, tehat: &[f64]) -> Result<Vec<f64>, EstimateError> {
        let mut v = self.ln_density_per_ell(tau, tehat)?;
        for x in &mut v {
            *x = -2.0 * *x;
        }
        Ok(v)
    }

    /// Total `−2 Σ ln p` over ℓ ≥ 2, with failed multipoles excluded and
    /// counted.
    pub fn chi2_total(&self, tau: f64, tehat: &[f64]) -> Result<Chi2Sum, EstimateError> {
        let per_ell = self.chi2_per_ell(tau, tehat)?;
        sum_over_ells(&per_ell)
    }
}

/// Log-density at a single multipole.
pub fn ln_density_ell(ell: usize, c: f64, tt: f64, ee: f64, te: f64) -> f64 {
    let prod = tt * ee;
    if !(prod > 0.0 && prod.is_finite()) {
        return f64::NAN;
    }
    let s = prod.sqrt();
    let rho = te / s;
    let z = (1.0 - rho * rho) * s;
    // z ≤ 0 means |ρ| ≥ 1: the theory inputs are inconsistent.
    if !(z > 0.0 && z.is_finite()) {
        return f64::NAN;
    }

    let nu = ell; // Bessel order (N−1)/2
    let n = (2 * ell + 1) as f64;
    let half_pi_ln = 0.5 * std::f64::consts::PI.ln();

    // Terms independent of ĉ.
    let base = 0.5 * (n + 1.0) * n.ln()
        - (nu as f64) * LN_2
        - half_pi_ln
        - ln_gamma(n / 2.0)
        - 0.5 * z.ln()
        - 0.25 * n * prod.ln();

    if c == 0.0 {
        // Analytic ĉ → 0 limit of |ĉ|^ν K_ν(N|ĉ|/z) = (Γ(ν)/2)(2z/N)^ν;
        // the 2^ν factors cancel against the normalization. At ℓ = 0 the
        // density diverges logarithmically at the origin (still integrable);
        // ℓ < 2 is discarded by convention so +∞ is fine there.
        if nu == 0 {
            return f64::INFINITY;
        }
        return 0.5 * (n + 1.0) * n.ln() + ln_gamma(nu as f64) - LN_2
            + (nu as f64) * (z.ln() - n.ln())
            - half_pi_ln
            - ln_gamma(n / 2.0)
            - 0.5 * z.ln()
            - 0.25 * n * prod.ln();
    }

    let x = n * c.abs() / z;
    base + (nu as f64) * c.abs().ln() + n * rho * c / z + ln_kn(nu, x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theory::provider::{build_table, TheoryProvider};
    use crate::theory::ToyBoltzmann;

    #[test]
    fn density_normalizes_to_one() {
        // Grid quadrature over ĉ at fixed ℓ and theory: ∫ p(ĉ) dĉ ≈ 1.
        for &(ell, tt, ee, te) in &[
            (2, 1.0, 1.0, 0.5),
            (5, 2.0, 0.5, 0.3),
            (10, 3.0, 0.2, -0.4),
        ] {
            let n = (2 * ell + 1) as f64;
            let sd = ((tt * ee + te * te) / n).sqrt();
            let (lo, hi) = (te - 12.0 * sd, te + 12.0 * sd);
            let steps = 40_000usize;
            let h = (hi - lo) / steps as f64;
            let mut total = 0.0;
            for i in 0..=steps {
                let c = lo + i as f64 * h;
                let w = if i == 0 || i == steps { 0.5 } else { 1.0 };
                total += w * ln_density_ell(ell, c, tt, ee, te).exp();
            }
            total *= h;
            assert!((total - 1.0).abs() < 1e-3, "ell={ell}: integral={total}");
        }
    }

    #[test]
    fn density_is_nonnegative_and_finite() {
        for i in 0..200 {
            let c = -1.0 + i as f64 * 0.01;
            let lp = ln_density_ell(4, c, 1.5, 0.8, 0.4);
            assert!(!lp.is_nan());
            // p = exp(lp) ≥ 0 by construction; check lp is a real number.
            assert!(lp < f64::INFINITY);
        }
    }

    #[test]
    fn zero_chat_matches_small_chat_limit() {
        for &ell in &[1usize, 2, 5, 12] {
            let at_zero = ln_density_ell(ell, 0.0, 1.0, 1.0, 0.5);
            let near_zero = ln_density_ell(ell, 1e-9, 1.0, 1.0, 0.5);
            assert!(
                (at_zero - near_zero).abs() < 1e-5,
                "ell={ell}: {at_zero} vs {near_zero}"
            );
        }
    }

    #[test]
    fn inconsistent_theory_yields_nan_not_a_number_smuggled_in() {
        // |ρ| ≥ 1
        assert!(ln_density_ell(3, 0.1, 1.0, 1.0, 1.0).is_nan());
        assert!(ln_density_ell(3, 0.1, 1.0, 1.0, 1.5).is_nan());
        // non-positive variance
        assert!(ln_density_ell(3, 0.1, 0.0, 1.0, 0.0).is_nan());
        assert!(ln_density_ell(3, 0.1, -1.0, 1.0, 0.0).is_nan());
    }

    #[test]
    fn large_ell_does_not_overflow() {
        // N|ĉ|/z grows with ℓ; the log-domain form must stay finite.
        let lp = ln_density_ell(800, 0.37, 1.0, 1.0, 0.35);
        assert!(lp.is_finite());
    }

    #[test]
    fn true_tau_beats_wrong_tau_on_exact_theory_te() {
        let table = build_table(&ToyBoltzmann, &[0.04, 0.06, 0.08], 40).unwrap();
        let like = TeLikelihood::new(&table);
        let tehat = ToyBoltzmann.spectra(0.06, 40).unwrap().te;

        let at_truth = like.chi2_total(0.06, &tehat).unwrap();
        let off = like.chi2_total(0.08, &tehat).unwrap();
        assert!(at_truth.chi2 < off.chi2);
        assert_eq!(at_truth.excluded_ells, 0);
    }

    #[test]
    fn density_peaks_near_theory_te() {
        // The mode of the ĉ density sits on the same side as ρ and near TE
        // for moderate N; check the log-density at TE exceeds points far away.
        let (ell, tt, ee, te) = (8, 1.0, 1.0, 0.4);
        let at_te = ln_density_ell(ell, te, tt, ee, te);
        assert!(at_te > ln_density_ell(ell, te + 1.0, tt, ee, te));
        assert!(at_te > ln_density_ell(ell, te - 1.0, tt, ee, te));
    }
}
