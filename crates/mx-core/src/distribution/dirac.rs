use mx_math::Interval;
use num_complex::Complex64;
use serde::Serialize;

use super::{AtomKind, Distribution};
use crate::error::{Error, Result};

/// Point mass at `value`.
///
/// Has no density: `pdf` is zero everywhere and the mass is reported
/// through `cdf` and `interval_probability`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Dirac {
    value: f64,
}

impl Dirac {
    pub fn new(value: f64) -> Result<Self> {
        if !value.is_finite() {
            return Err(Error::InvalidArgument(format!(
                "dirac value must be finite, got {value}"
            )));
        }
        Ok(Self { value })
    }

    pub fn value(&self) -> f64 {
        self.value
    }
}

impl Distribution for Dirac {
    fn name(&self) -> &'static str {
        "Dirac"
    }

    fn kind(&self) -> AtomKind {
        AtomKind::Dirac { value: self.value }
    }

    fn characteristic_function(&self, t: f64) -> Complex64 {
        Complex64::from_polar(1.0, self.value * t)
    }

    fn log_characteristic_function(&self, t: f64) -> Complex64 {
        Complex64::new(0.0, self.value * t)
    }

    fn pdf(&self, _x: f64) -> f64 {
        0.0
    }

    fn cdf(&self, x: f64) -> f64 {
        if x >= self.value {
            1.0
        } else {
            0.0
        }
    }

    fn complementary_cdf(&self, x: f64) -> f64 {
        if x < self.value {
            1.0
        } else {
            0.0
        }
    }

    fn interval_probability(
        &self,
        lower: f64,
        upper: f64,
        lower_closed: bool,
        upper_closed: bool,
    ) -> f64 {
        let above = if lower_closed {
            self.value >= lower
        } else {
            self.value > lower
        };
        let below = if upper_closed {
            self.value <= upper
        } else {
            self.value < upper
        };
        if above && below {
            1.0
        } else {
            0.0
        }
    }

    fn quantile(&self, _p: f64, _tail: bool) -> f64 {
        self.value
    }

    fn mean(&self) -> f64 {
        self.value
    }

    fn variance(&self) -> f64 {
        0.0
    }

    fn range(&self) -> Interval {
        Interval::point(self.value)
    }

    fn is_continuous(&self) -> bool {
        false
    }
}
