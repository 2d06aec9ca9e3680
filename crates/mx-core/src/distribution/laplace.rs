use mx_math::Interval;
use num_complex::Complex64;
use serde::Serialize;

use super::Distribution;
use crate::error::{Error, Result};

/// Laplace (double exponential) distribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Laplace {
    location: f64,
    scale: f64,
}

impl Laplace {
    pub fn new(location: f64, scale: f64) -> Result<Self> {
        if !location.is_finite() || !(scale.is_finite() && scale > 0.0) {
            return Err(Error::InvalidArgument(format!(
                "laplace needs finite location and scale > 0, got location={location}, scale={scale}"
            )));
        }
        Ok(Self { location, scale })
    }

    /// Lower-tail quantile.
    fn lower_quantile(&self, p: f64) -> f64 {
        if p < 0.5 {
            self.location + self.scale * (2.0 * p).ln()
        } else {
            self.location - self.scale * (2.0 * (1.0 - p)).ln()
        }
    }
}

impl Distribution for Laplace {
    fn name(&self) -> &'static str {
        "Laplace"
    }

    fn characteristic_function(&self, t: f64) -> Complex64 {
        let bt = self.scale * t;
        Complex64::from_polar(1.0 / (1.0 + bt * bt), self.location * t)
    }

    fn log_characteristic_function(&self, t: f64) -> Complex64 {
        let bt = self.scale * t;
        Complex64::new(-(bt * bt).ln_1p(), self.location * t)
    }

    fn pdf(&self, x: f64) -> f64 {
        (-(x - self.location).abs() / self.scale).exp() / (2.0 * self.scale)
    }

    fn cdf(&self, x: f64) -> f64 {
        let z = (x - self.location) / self.scale;
        if z < 0.0 {
            0.5 * z.exp()
        } else {
            1.0 - 0.5 * (-z).exp()
        }
    }

    fn complementary_cdf(&self, x: f64) -> f64 {
        let z = (x - self.location) / self.scale;
        if z > 0.0 {
            0.5 * (-z).exp()
        } else {
            1.0 - 0.5 * z.exp()
        }
    }

    fn quantile(&self, p: f64, tail: bool) -> f64 {
        if p.is_nan() || !(0.0..=1.0).contains(&p) {
            return f64::NAN;
        }
        if tail {
            // symmetric about the location
            2.0 * self.location - self.lower_quantile(p)
        } else {
            self.lower_quantile(p)
        }
    }

    fn mean(&self) -> f64 {
        self.location
    }

    fn variance(&self) -> f64 {
        2.0 * self.scale * self.scale
    }

    fn range(&self) -> Interval {
        Interval::real_line()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distribution::test_support::integrate_pdf;

    #[test]
    fn quantile_round_trip() {
        let l = Laplace::new(1.0, 0.5).unwrap();
        for p in [0.001, 0.2, 0.5, 0.8, 0.999] {
            assert!((l.cdf(l.quantile(p, false)) - p).abs() < 1e-13, "p={p}");
            assert!((l.complementary_cdf(l.quantile(p, true)) - p).abs() < 1e-13, "p={p}");
        }
    }

    #[test]
    fn density_integrates_to_one() {
        let l = Laplace::new(-2.0, 1.5).unwrap();
        assert!((integrate_pdf(&l, -62.0, 58.0, 240) - 1.0).abs() < 1e-12);
    }
}
