//! Gaussian realizations of empirical power spectra.
//!
//! At each ℓ there are 2ℓ+1 independent harmonic modes. For a single field
//! the empirical spectrum is
//!
//! ```text
//! Ĉ_ℓ = C_ℓ / (2ℓ+1) · Σ_m g_m²,   g_m ~ N(0, 1)
//! ```
//!
//! i.e. a scaled chi-squared with 2ℓ+1 degrees of freedom. For the joint
//! (T, E) case we draw correlated pairs through the Cholesky factor of the
//! per-ℓ 2×2 covariance [[TT, TE], [TE, EE]] and accumulate all three
//! empirical spectra from the same modes, so TThat/TEhat/EEhat carry the
//! correct sampling covariance.

use nalgebra::{Matrix2, Vector2};
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::domain::{MeasuredJoint, TheorySpectrum};
use crate::error::EstimateError;

fn std_normal() -> Result<Normal<f64>, EstimateError> {
    Normal::new(0.0, 1.0).map_err(|e| EstimateError::evaluation(format!("noise distribution: {e}")))
}

/// Draw one empirical auto-spectrum realization from theory `cl`.
///
/// `cl` is indexed by ℓ from 0; entries must be non-negative (a negative
/// auto-spectrum has no Gaussian field behind it).
pub fn synth_auto(cl: &[f64], seed: u64) -> Result<Vec<f64>, EstimateError> {
    if let Some((ell, &bad)) = cl.iter().enumerate().find(|&(_, &v)| !(v >= 0.0)) {
        return Err(EstimateError::evaluation(format!(
            "negative or non-finite theory C_ell={bad} at ell={ell}"
        )));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let normal = std_normal()?;

    let mut out = Vec::with_capacity(cl.len());
    for (ell, &c) in cl.iter().enumerate() {
        let n = 2 * ell + 1;
        let mut sum_sq = 0.0;
        for _ in 0..n {
            let g: f64 = rng.sample(normal);
            sum_sq += g * g;
        }
        out.push(c * sum_sq / n as f64);
    }
    Ok(out)
}

/// Draw one correlated (TT, TE, EE) empirical realization from theory.
pub fn synth_joint(theory: &TheorySpectrum, seed: u64) -> Result<MeasuredJoint, EstimateError> {
    let mut rng = StdRng::seed_from_u64(seed);
    let normal = std_normal()?;

    let n_ell = theory.len();
    let mut tt = Vec::with_capacity(n_ell);
    let mut te = Vec::with_capacity(n_ell);
    let mut ee = Vec::with_capacity(n_ell);

    for ell in 0..n_ell {
        let cov = Matrix2::new(
            theory.tt[ell],
            theory.te[ell],
            theory.te[ell],
            theory.ee[ell],
        );
        let chol = cov.cholesky().ok_or_else(|| {
            EstimateError::evaluation(format!(
                "theory covariance not positive definite at ell={ell}"
            ))
        })?;
        let l = chol.l();

        let n = 2 * ell + 1;
        let mut s_tt = 0.0;
        let mut s_te = 0.0;
        let mut s_ee = 0.0;
        for _ in 0..n {
            let u = Vector2::new(rng.sample::<f64, _>(normal), rng.sample::<f64, _>(normal));
            let v = l * u;
            s_tt += v[0] * v[0];
            s_te += v[0] * v[1];
            s_ee += v[1] * v[1];
        }
        tt.push(s_tt / n as f64);
        te.push(s_te / n as f64);
        ee.push(s_ee / n as f64);
    }

    Ok(MeasuredJoint { tt, te, ee })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toy_theory(lmax: usize) -> TheorySpectrum {
        let n = lmax + 1;
        let tt: Vec<f64> = (0..n).map(|l| 10.0 / (l as f64 + 1.0)).collect();
        let ee: Vec<f64> = (0..n).map(|l| 0.1 / (l as f64 + 1.0)).collect();
        let te: Vec<f64> = (0..n).map(|l| 0.4 * (tt[l] * ee[l]).sqrt()).collect();
        TheorySpectrum { tt, te, ee }
    }

    #[test]
    fn same_seed_same_realization() {
        let cl = vec![1.0; 30];
        let a = synth_auto(&cl, 7).unwrap();
        let b = synth_auto(&cl, 7).unwrap();
        assert_eq!(a, b);

        let th = toy_theory(20);
        let j1 = synth_joint(&th, 11).unwrap();
        let j2 = synth_joint(&th, 11).unwrap();
        assert_eq!(j1, j2);
    }

    #[test]
    fn different_seeds_differ() {
        let cl = vec![1.0; 30];
        assert_ne!(synth_auto(&cl, 1).unwrap(), synth_auto(&cl, 2).unwrap());
    }

    #[test]
    fn auto_realization_scatters_around_theory() {
        // At high ℓ the estimator has relative std sqrt(2/(2ℓ+1)); a single
        // draw at ℓ = 300 should sit well within ±6σ of the theory value.
        let lmax = 300;
        let cl = vec![2.0; lmax + 1];
        let hat = synth_auto(&cl, 3).unwrap();
        let n = (2 * lmax + 1) as f64;
        let sigma = (2.0 / n).sqrt();
        let ratio = hat[lmax] / 2.0;
        assert!((ratio - 1.0).abs() < 6.0 * sigma, "ratio={ratio}");
    }

    #[test]
    fn joint_realization_respects_cauchy_schwarz() {
        let th = toy_theory(40);
        let j = synth_joint(&th, 5).unwrap();
        for ell in 0..=40 {
            assert!(j.tt[ell] >= 0.0);
            assert!(j.ee[ell] >= 0.0);
            assert!(j.te[ell] * j.te[ell] <= j.tt[ell] * j.ee[ell] * (1.0 + 1e-12));
        }
    }

    #[test]
    fn auto_rejects_negative_or_nonfinite_theory() {
        assert!(synth_auto(&[1.0, -0.5], 0).is_err());
        assert!(synth_auto(&[1.0, f64::NAN], 0).is_err());
        assert!(synth_auto(&[1.0, 0.0], 0).is_ok());
    }
}
