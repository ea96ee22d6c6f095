//! Toy analytic stand-in for a Boltzmann solver.
//!
//! The shapes are qualitative only: a low-ℓ reionization bump in EE whose
//! amplitude scales as τ² (with the primary amplitude held fixed, i.e. the
//! `A_s e^{-2τ}` convention), a smooth TT plateau, and a TE cross-spectrum
//! with a fixed correlation coefficient. That is enough structure for the
//! estimator to localize τ, and for the joint likelihood's 2×2 covariance
//! to stay positive definite at every ℓ.

use crate::domain::TheorySpectrum;
use crate::error::AppError;
use crate::theory::provider::TheoryProvider;

/// TT plateau amplitude (μK² sr scale, arbitrary normalization).
const TT_AMP: f64 = 1.0e3;

/// Reionization-bump EE amplitude at the τ = 0.06 reference point.
const EE_BUMP_AMP: f64 = 1.0e-2;

/// ℓ scale of the reionization bump; power drops steeply above ℓ ≈ 10.
const EE_BUMP_SCALE: f64 = 8.0;

/// τ-independent EE tail from recombination.
const EE_TAIL_AMP: f64 = 1.0e-3;

/// Fixed T–E correlation coefficient, safely inside (−1, 1).
const TE_CORR: f64 = 0.35;

/// Reference τ the bump amplitude is normalized at.
const TAU_REF: f64 = 0.06;

/// Analytic toy theory provider.
#[derive(Debug, Clone, Copy, Default)]
pub struct ToyBoltzmann;

impl ToyBoltzmann {
    fn tt(ell: usize) -> f64 {
        let l = ell as f64;
        TT_AMP / ((l + 1.0) * (l + 2.0))
    }

    fn ee(ell: usize, tau: f64) -> f64 {
        let l = ell as f64;
        let bump = EE_BUMP_AMP * (tau / TAU_REF).powi(2) * (-(l / EE_BUMP_SCALE).powi(2)).exp();
        let tail = EE_TAIL_AMP / ((l + 1.0) * (l + 2.0));
        bump + tail
    }
}

impl TheoryProvider for ToyBoltzmann {
    fn spectra(&self, tau: f64, lmax: usize) -> Result<TheorySpectrum, AppError> {
        if !(tau.is_finite() && tau > 0.0) {
            return Err(AppError::new(2, format!("Invalid tau for theory: {tau}")));
        }
        let n = lmax + 1;
        let mut tt = Vec::with_capacity(n);
        let mut te = Vec::with_capacity(n);
        let mut ee = Vec::with_capacity(n);
        for ell in 0..n {
            let t = Self::tt(ell);
            let e = Self::ee(ell, tau);
            tt.push(t);
            te.push(TE_CORR * (t * e).sqrt());
            ee.push(e);
        }
        Ok(TheorySpectrum { tt, te, ee })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spectra_are_positive_and_sized() {
        let s = ToyBoltzmann.spectra(0.06, 30).unwrap();
        assert_eq!(s.len(), 31);
        for ell in 0..=30 {
            assert!(s.tt[ell] > 0.0);
            assert!(s.ee[ell] > 0.0);
        }
    }

    #[test]
    fn low_ell_ee_grows_with_tau() {
        let lo = ToyBoltzmann.spectra(0.04, 20).unwrap();
        let hi = ToyBoltzmann.spectra(0.08, 20).unwrap();
        for ell in 2..=10 {
            assert!(hi.ee[ell] > lo.ee[ell], "ell={ell}");
        }
    }

    #[test]
    fn correlation_stays_below_unity() {
        let s = ToyBoltzmann.spectra(0.07, 50).unwrap();
        for ell in 2..=50 {
            let rho = s.te[ell] / (s.tt[ell] * s.ee[ell]).sqrt();
            assert!(rho.abs() < 1.0);
            assert!((rho - 0.35).abs() < 1e-12);
        }
    }

    #[test]
    fn rejects_nonpositive_tau() {
        assert!(ToyBoltzmann.spectra(0.0, 10).is_err());
        assert!(ToyBoltzmann.spectra(f64::NAN, 10).is_err());
    }
}
