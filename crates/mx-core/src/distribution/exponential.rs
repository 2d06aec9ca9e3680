use mx_math::Interval;
use num_complex::Complex64;
use serde::Serialize;

use super::Distribution;
use crate::error::{Error, Result};

/// Exponential distribution with rate λ on [0, ∞).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Exponential {
    rate: f64,
}

impl Exponential {
    pub fn new(rate: f64) -> Result<Self> {
        if !(rate.is_finite() && rate > 0.0) {
            return Err(Error::InvalidArgument(format!(
                "exponential rate must be finite and > 0, got {rate}"
            )));
        }
        Ok(Self { rate })
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }
}

impl Distribution for Exponential {
    fn name(&self) -> &'static str {
        "Exponential"
    }

    fn characteristic_function(&self, t: f64) -> Complex64 {
        Complex64::new(1.0, 0.0) / Complex64::new(1.0, -t / self.rate)
    }

    fn log_characteristic_function(&self, t: f64) -> Complex64 {
        -Complex64::new(1.0, -t / self.rate).ln()
    }

    fn pdf(&self, x: f64) -> f64 {
        if x < 0.0 {
            0.0
        } else {
            self.rate * (-self.rate * x).exp()
        }
    }

    fn cdf(&self, x: f64) -> f64 {
        if x <= 0.0 {
            0.0
        } else {
            -(-self.rate * x).exp_m1()
        }
    }

    fn complementary_cdf(&self, x: f64) -> f64 {
        if x <= 0.0 {
            1.0
        } else {
            (-self.rate * x).exp()
        }
    }

    fn quantile(&self, p: f64, tail: bool) -> f64 {
        if p.is_nan() || !(0.0..=1.0).contains(&p) {
            return f64::NAN;
        }
        if tail {
            -p.ln() / self.rate
        } else {
            -(-p).ln_1p() / self.rate
        }
    }

    fn mean(&self) -> f64 {
        1.0 / self.rate
    }

    fn variance(&self) -> f64 {
        1.0 / (self.rate * self.rate)
    }

    fn range(&self) -> Interval {
        Interval::new(0.0, f64::INFINITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantile_inverts_both_tails() {
        let e = Exponential::new(2.0).unwrap();
        for p in [1e-9, 0.3, 0.999] {
            assert!((e.cdf(e.quantile(p, false)) - p).abs() < 1e-14);
            assert!((e.complementary_cdf(e.quantile(p, true)) - p).abs() < 1e-14);
        }
        assert_eq!(e.quantile(0.0, false), 0.0);
        assert!(e.quantile(0.0, true).is_infinite());
    }

    #[test]
    fn characteristic_function_modulus() {
        let e = Exponential::new(0.5).unwrap();
        let t: f64 = 3.0;
        let expected = 1.0 / (1.0 + (t / 0.5) * (t / 0.5)).sqrt();
        assert!((e.characteristic_function(t).norm() - expected).abs() < 1e-15);
        assert!((e.log_characteristic_function(t).exp() - e.characteristic_function(t)).norm() < 1e-15);
    }
}
