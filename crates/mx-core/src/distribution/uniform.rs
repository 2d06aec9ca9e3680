use mx_math::{clamp_probability, Interval};
use num_complex::Complex64;
use serde::Serialize;

use super::{lower_tail_probability, sinc, Distribution};
use crate::error::{Error, Result};

/// Continuous uniform distribution on [lower, upper].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Uniform {
    lower: f64,
    upper: f64,
}

impl Uniform {
    pub fn new(lower: f64, upper: f64) -> Result<Self> {
        if !(lower.is_finite() && upper.is_finite() && lower < upper) {
            return Err(Error::InvalidArgument(format!(
                "uniform bounds must be finite with lower < upper, got [{lower}, {upper}]"
            )));
        }
        Ok(Self { lower, upper })
    }

    fn midpoint(&self) -> f64 {
        0.5 * (self.lower + self.upper)
    }

    fn half_width(&self) -> f64 {
        0.5 * (self.upper - self.lower)
    }
}

impl Distribution for Uniform {
    fn name(&self) -> &'static str {
        "Uniform"
    }

    // φ(t) = exp(i·t·m)·sinc(t·h) with midpoint m and half-width h
    fn characteristic_function(&self, t: f64) -> Complex64 {
        Complex64::from_polar(1.0, t * self.midpoint()) * sinc(t * self.half_width())
    }

    fn log_characteristic_function(&self, t: f64) -> Complex64 {
        Complex64::new(sinc(t * self.half_width()), 0.0).ln() + Complex64::new(0.0, t * self.midpoint())
    }

    fn pdf(&self, x: f64) -> f64 {
        if x < self.lower || x > self.upper {
            0.0
        } else {
            1.0 / (self.upper - self.lower)
        }
    }

    fn cdf(&self, x: f64) -> f64 {
        clamp_probability((x - self.lower) / (self.upper - self.lower))
    }

    fn complementary_cdf(&self, x: f64) -> f64 {
        clamp_probability((self.upper - x) / (self.upper - self.lower))
    }

    fn quantile(&self, p: f64, tail: bool) -> f64 {
        let q = lower_tail_probability(p, tail);
        self.lower + q * (self.upper - self.lower)
    }

    fn mean(&self) -> f64 {
        self.midpoint()
    }

    fn variance(&self) -> f64 {
        let w = self.upper - self.lower;
        w * w / 12.0
    }

    fn range(&self) -> Interval {
        Interval::new(self.lower, self.upper)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distribution::test_support::{numeric_cf_im, numeric_cf_re};

    #[test]
    fn rejects_degenerate_bounds() {
        assert!(Uniform::new(1.0, 1.0).is_err());
        assert!(Uniform::new(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn characteristic_function_matches_quadrature() {
        let u = Uniform::new(-0.5, 2.0).unwrap();
        for t in [0.3, 1.7, 4.0] {
            let phi = u.characteristic_function(t);
            assert!((phi.re - numeric_cf_re(&u, t, -0.5, 2.0)).abs() < 1e-12);
            assert!((phi.im - numeric_cf_im(&u, t, -0.5, 2.0)).abs() < 1e-12);
        }
    }

    #[test]
    fn log_cf_handles_negative_sinc() {
        let u = Uniform::new(-1.0, 1.0).unwrap();
        // sinc(4) < 0
        let t = 4.0;
        let direct = u.characteristic_function(t);
        let via_log = u.log_characteristic_function(t).exp();
        assert!((direct - via_log).norm() < 1e-15);
    }
}
