//! Special functions not covered by `statrs`: the trigamma function and the
//! modified Bessel function of the second kind, evaluated in the log domain.
//!
//! Numerical notes:
//! - `K_n(x)` overflows f64 quickly as the order grows, and the TE density
//!   needs it at order ℓ with argument proportional to ℓ as well. We never
//!   form `K_n` directly: `ln_kn` runs the three-term upward recurrence
//!   `K_{n+1} = (2n/x) K_n + K_{n-1}` entirely in log space (all terms are
//!   positive, so log-sum-exp is exact in structure).
//! - `ln K_0` / `ln K_1` use the Abramowitz & Stegun 9.8 polynomial fits:
//!   the series form on `0 < x <= 2` and the scaled form `e^x K(x)` above,
//!   which keeps the large-argument branch overflow-free by construction.
//! - Trigamma uses the standard recurrence `ψ₁(x) = ψ₁(x+1) + 1/x²` to push
//!   the argument above 8, then the asymptotic Bernoulli expansion.

/// Trigamma function ψ₁(x) for x > 0.
///
/// Returns NaN for non-positive arguments; every caller in this crate
/// evaluates at half-integers ℓ + ½ ≥ ½.
pub fn trigamma(mut x: f64) -> f64 {
    if !(x > 0.0) {
        return f64::NAN;
    }

    let mut acc = 0.0;
    while x < 10.0 {
        acc += 1.0 / (x * x);
        x += 1.0;
    }

    // Asymptotic expansion; truncation error is below 1e-12 for x >= 10.
    let inv = 1.0 / x;
    let inv2 = inv * inv;
    let tail = inv
        * (1.0
            + inv * (0.5 + inv * (1.0 / 6.0 + inv2 * (-1.0 / 30.0 + inv2 * (1.0 / 42.0 - inv2 / 30.0)))));
    acc + tail
}

/// `ln(exp(a) + exp(b))` without overflow; tolerates −∞ inputs.
fn log_add_exp(a: f64, b: f64) -> f64 {
    if a == f64::NEG_INFINITY {
        return b;
    }
    if b == f64::NEG_INFINITY {
        return a;
    }
    let m = a.max(b);
    m + ((a - m).exp() + (b - m).exp()).ln()
}

/// Modified Bessel function of the first kind I₀(x), |x| < 3.75 branch only.
fn i0_small(x: f64) -> f64 {
    let t = (x / 3.75) * (x / 3.75);
    1.0 + t
        * (3.5156229
            + t * (3.0899424 + t * (1.2067492 + t * (0.2659732 + t * (0.0360768 + t * 0.0045813)))))
}

/// Modified Bessel function of the first kind I₁(x), |x| < 3.75 branch only.
fn i1_small(x: f64) -> f64 {
    let t = (x / 3.75) * (x / 3.75);
    x * (0.5
        + t * (0.87890594
            + t * (0.51498869
                + t * (0.15084934 + t * (0.02658733 + t * (0.00301532 + t * 0.00032411))))))
}

/// `ln K_0(x)` for x > 0.
pub fn ln_k0(x: f64) -> f64 {
    if !(x > 0.0) {
        return if x == 0.0 { f64::INFINITY } else { f64::NAN };
    }
    if x <= 2.0 {
        let t = x * x / 4.0;
        let k0 = -(x / 2.0).ln() * i0_small(x) - 0.57721566
            + t * (0.42278420
                + t * (0.23069756
                    + t * (0.03488590 + t * (0.00262698 + t * (0.00010750 + t * 0.00000740)))));
        k0.ln()
    } else {
        let t = 2.0 / x;
        // poly = sqrt(x) e^x K_0(x)
        let poly = 1.25331414
            + t * (-0.07832358
                + t * (0.02189568
                    + t * (-0.01062446 + t * (0.00587872 + t * (-0.00251540 + t * 0.00053208)))));
        -x - 0.5 * x.ln() + poly.ln()
    }
}

/// `ln K_1(x)` for x > 0.
pub fn ln_k1(x: f64) -> f64 {
    if !(x > 0.0) {
        return if x == 0.0 { f64::INFINITY } else { f64::NAN };
    }
    if x <= 2.0 {
        let t = x * x / 4.0;
        let k1 = (x / 2.0).ln() * i1_small(x)
            + (1.0 / x)
                * (1.0
                    + t * (0.15443144
                        + t * (-0.67278579
                            + t * (-0.18156897
                                + t * (-0.01919402 + t * (-0.00110404 + t * -0.00004686))))));
        k1.ln()
    } else {
        let t = 2.0 / x;
        let poly = 1.25331414
            + t * (0.23498619
                + t * (-0.03655620
                    + t * (0.01504268 + t * (-0.00780353 + t * (0.00325614 + t * -0.00068245)))));
        -x - 0.5 * x.ln() + poly.ln()
    }
}

/// `ln K_n(x)` for integer order n ≥ 0 and x > 0.
///
/// Upward recurrence in the log domain. The recurrence is stable for K in
/// the upward direction, and log space removes the overflow ceiling that
/// the raw recurrence hits near n ≳ 150 even for moderate x.
pub fn ln_kn(n: usize, x: f64) -> f64 {
    if !(x > 0.0) {
        return if x == 0.0 { f64::INFINITY } else { f64::NAN };
    }
    match n {
        0 => ln_k0(x),
        1 => ln_k1(x),
        _ => {
            let ln_x = x.ln();
            let mut prev = ln_k0(x); // ln K_{k-1}
            let mut cur = ln_k1(x); // ln K_k
            for k in 1..n {
                let next = log_add_exp(((2 * k) as f64).ln() - ln_x + cur, prev);
                prev = cur;
                cur = next;
            }
            cur
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trigamma_reference_values() {
        // ψ₁(1) = π²/6, ψ₁(½) = π²/2
        let pi2 = std::f64::consts::PI * std::f64::consts::PI;
        assert!((trigamma(1.0) - pi2 / 6.0).abs() < 1e-10);
        assert!((trigamma(0.5) - pi2 / 2.0).abs() < 1e-10);
        assert!(trigamma(-1.0).is_nan());
    }

    #[test]
    fn trigamma_recurrence_consistency() {
        // ψ₁(x) − ψ₁(x + 1) = 1/x²
        for &x in &[0.5, 2.5, 7.9, 12.0] {
            let lhs = trigamma(x) - trigamma(x + 1.0);
            assert!((lhs - 1.0 / (x * x)).abs() < 1e-10, "x={x}");
        }
    }

    #[test]
    fn bessel_k_reference_values() {
        // K_0(1) = 0.42102443824..., K_1(1) = 0.60190723019...
        assert!((ln_k0(1.0) - 0.4210244382_f64.ln()).abs() < 1e-6);
        assert!((ln_k1(1.0) - 0.6019072302_f64.ln()).abs() < 1e-6);
        // K_0(2) = 0.11389387274..., K_1(2) = 0.13986588181...
        assert!((ln_k0(2.0) - 0.1138938727_f64.ln()).abs() < 1e-6);
        assert!((ln_k1(2.0) - 0.1398658818_f64.ln()).abs() < 1e-6);
    }

    #[test]
    fn bessel_k_recurrence_matches_exact_chain() {
        // K_5(2) built by hand from K_0(2), K_1(2) via the recurrence:
        // K_2 = 0.25375975..., K_3 = 0.64738539..., K_4 = 2.19591592...,
        // K_5 = 9.43104910...
        let expect = 9.4310491_f64.ln();
        assert!((ln_kn(5, 2.0) - expect).abs() < 1e-5);
    }

    #[test]
    fn bessel_k_large_argument_asymptotic() {
        // K_0(x) → sqrt(π/(2x)) e^{-x} for large x.
        let x = 100.0;
        let asym = 0.5 * (std::f64::consts::PI / (2.0 * x)).ln() - x;
        assert!((ln_k0(x) - asym).abs() < 1e-2);
    }

    #[test]
    fn bessel_k_high_order_does_not_overflow() {
        // Raw K_120(3) overflows f64; the log form must stay finite.
        let v = ln_kn(120, 3.0);
        assert!(v.is_finite());
        assert!(v > 0.0); // K_n(x) >> 1 for n >> x
    }
}
