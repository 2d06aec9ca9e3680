//! Property-based tests for mx-math numerical functions.
//!
//! Uses proptest to verify mathematical properties hold across many random inputs.

use proptest::prelude::*;
use mx_math::{
    gamma_p, gamma_q, gamma_quantile, normal_cdf, normal_interval_probability, normal_quantile,
    normal_sf, std_normal_cdf, GaussLegendre, Interval,
};

/// Tolerance for floating point comparisons.
const TOL: f64 = 1e-12;

fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
    if a.is_nan() || b.is_nan() {
        return false;
    }
    (a - b).abs() <= tol.max(tol * a.abs().max(b.abs()))
}

// ============================================================================
// Normal primitives
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// The CDF is monotone.
    #[test]
    fn normal_cdf_monotone(a in -30.0..30.0f64, d in 0.0..5.0f64) {
        prop_assert!(std_normal_cdf(a) <= std_normal_cdf(a + d));
    }

    /// CDF and survival add up to one.
    #[test]
    fn normal_cdf_sf_duality(x in -20.0..20.0f64, mean in -5.0..5.0f64, sd in 0.1..10.0f64) {
        let s = normal_cdf(x, mean, sd) + normal_sf(x, mean, sd);
        prop_assert!(approx_eq(s, 1.0, TOL), "sum={}", s);
    }

    /// Quantile inverts the CDF.
    #[test]
    fn normal_quantile_round_trip(p in 1e-10..(1.0 - 1e-10), mean in -5.0..5.0f64, sd in 0.1..10.0f64) {
        let x = normal_quantile(p, mean, sd);
        prop_assert!(approx_eq(normal_cdf(x, mean, sd), p, 1e-11), "p={} x={}", p, x);
    }

    /// Interval probabilities are additive.
    #[test]
    fn normal_interval_additive(a in -8.0..8.0f64, w1 in 0.0..4.0f64, w2 in 0.0..4.0f64) {
        let b = a + w1;
        let c = b + w2;
        let whole = normal_interval_probability(a, c, 0.0, 1.0);
        let parts = normal_interval_probability(a, b, 0.0, 1.0) + normal_interval_probability(b, c, 0.0, 1.0);
        prop_assert!(approx_eq(whole, parts, TOL));
    }
}

// ============================================================================
// Incomplete gamma
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn gamma_p_q_complement(a in 0.2..40.0f64, x in 0.0..80.0f64) {
        prop_assert!(approx_eq(gamma_p(a, x) + gamma_q(a, x), 1.0, 1e-12));
    }

    #[test]
    fn gamma_quantile_round_trip(p in 0.001..0.999f64, a in 0.5..20.0f64, rate in 0.1..5.0f64) {
        let t = gamma_quantile(p, a, rate, false);
        prop_assert!(approx_eq(gamma_p(a, rate * t), p, 1e-10), "p={} t={}", p, t);
    }
}

// ============================================================================
// Interval arithmetic and quadrature
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    /// Scaling then summing contains every affine image of member points.
    #[test]
    fn interval_affine_image_contains_points(
        l1 in -10.0..0.0f64, u1 in 0.0..10.0f64,
        l2 in -10.0..0.0f64, u2 in 0.0..10.0f64,
        w1 in -3.0..3.0f64, w2 in -3.0..3.0f64,
        s in 0.0..1.0f64, t in 0.0..1.0f64,
    ) {
        let i1 = Interval::new(l1, u1);
        let i2 = Interval::new(l2, u2);
        let sum = i1.scale(w1).add(&i2.scale(w2));
        let x1 = l1 + s * (u1 - l1);
        let x2 = l2 + t * (u2 - l2);
        let y = w1 * x1 + w2 * x2;
        prop_assert!(y >= sum.lower - 1e-9 && y <= sum.upper + 1e-9);
    }

    /// A 16-point rule integrates cubic polynomials exactly on any interval.
    #[test]
    fn gauss_legendre_cubic(a in -5.0..5.0f64, w in 0.01..10.0f64, c3 in -2.0..2.0f64, c0 in -2.0..2.0f64) {
        let rule = GaussLegendre::new(16).unwrap();
        let b = a + w;
        let f = |x: f64| c3 * x * x * x + c0;
        let exact = c3 * (b.powi(4) - a.powi(4)) / 4.0 + c0 * (b - a);
        let v = rule.integrate(f, a, b);
        prop_assert!(approx_eq(v, exact, 1e-10), "v={} exact={}", v, exact);
    }
}
