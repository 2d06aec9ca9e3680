use mx_math::{normal_cdf, normal_interval_probability, normal_pdf, normal_sf, std_normal_quantile, Interval};
use num_complex::Complex64;
use serde::Serialize;

use super::{AtomKind, Distribution};
use crate::error::{Error, Result};

/// Normal distribution N(mean, std_dev²).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Normal {
    mean: f64,
    std_dev: f64,
}

impl Normal {
    pub fn new(mean: f64, std_dev: f64) -> Result<Self> {
        if !mean.is_finite() {
            return Err(Error::InvalidArgument(format!(
                "normal mean must be finite, got {mean}"
            )));
        }
        if !(std_dev.is_finite() && std_dev > 0.0) {
            return Err(Error::InvalidArgument(format!(
                "normal std_dev must be finite and > 0, got {std_dev}"
            )));
        }
        Ok(Self { mean, std_dev })
    }

    pub fn standard() -> Self {
        Self {
            mean: 0.0,
            std_dev: 1.0,
        }
    }

    /// Build from moments without validation. A zero variance is allowed so
    /// that the equivalent normal of a point mass can still be represented.
    pub(crate) fn from_moments(mean: f64, variance: f64) -> Self {
        Self {
            mean,
            std_dev: variance.max(0.0).sqrt(),
        }
    }
}

impl Distribution for Normal {
    fn name(&self) -> &'static str {
        "Normal"
    }

    fn kind(&self) -> AtomKind {
        AtomKind::Normal {
            mean: self.mean,
            std_dev: self.std_dev,
        }
    }

    fn characteristic_function(&self, t: f64) -> Complex64 {
        self.log_characteristic_function(t).exp()
    }

    fn log_characteristic_function(&self, t: f64) -> Complex64 {
        Complex64::new(-0.5 * self.std_dev * self.std_dev * t * t, self.mean * t)
    }

    fn pdf(&self, x: f64) -> f64 {
        normal_pdf(x, self.mean, self.std_dev)
    }

    fn cdf(&self, x: f64) -> f64 {
        normal_cdf(x, self.mean, self.std_dev)
    }

    fn complementary_cdf(&self, x: f64) -> f64 {
        normal_sf(x, self.mean, self.std_dev)
    }

    fn interval_probability(&self, lower: f64, upper: f64, _: bool, _: bool) -> f64 {
        normal_interval_probability(lower, upper, self.mean, self.std_dev)
    }

    fn quantile(&self, p: f64, tail: bool) -> f64 {
        let z = std_normal_quantile(p);
        if tail {
            self.mean - self.std_dev * z
        } else {
            self.mean + self.std_dev * z
        }
    }

    fn mean(&self) -> f64 {
        self.mean
    }

    fn variance(&self) -> f64 {
        self.std_dev * self.std_dev
    }

    fn std_dev(&self) -> f64 {
        self.std_dev
    }

    fn range(&self) -> Interval {
        Interval::real_line()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_bad_parameters() {
        assert!(Normal::new(0.0, 0.0).is_err());
        assert!(Normal::new(f64::NAN, 1.0).is_err());
        assert!(Normal::new(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn characteristic_function_closed_form() {
        let n = Normal::new(1.5, 2.0).unwrap();
        let phi = n.characteristic_function(0.7);
        let modulus = (-0.5 * 4.0 * 0.49f64).exp();
        assert!((phi.norm() - modulus).abs() < 1e-15);
        assert!((phi.arg() - 1.05).abs() < 1e-14);
    }

    #[test]
    fn tail_quantile_mirrors_lower() {
        let n = Normal::new(-2.0, 3.0).unwrap();
        let lo = n.quantile(0.1, false);
        let hi = n.quantile(0.1, true);
        assert!((lo + hi + 4.0).abs() < 1e-12);
        assert!((n.complementary_cdf(hi) - 0.1).abs() < 1e-14);
    }
}
