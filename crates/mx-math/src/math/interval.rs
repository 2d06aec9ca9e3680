//! One-dimensional interval arithmetic.
//!
//! Bounds may be infinite. Arithmetic follows the Minkowski rules used to
//! propagate supports through affine combinations: `[a,b] + [c,d] = [a+c, b+d]`
//! and scaling by a negative factor swaps the bounds.

use serde::{Deserialize, Serialize};

/// A closed real interval `[lower, upper]`, possibly unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub lower: f64,
    pub upper: f64,
}

impl Interval {
    pub fn new(lower: f64, upper: f64) -> Self {
        Self { lower, upper }
    }

    /// The whole real line.
    pub fn real_line() -> Self {
        Self::new(f64::NEG_INFINITY, f64::INFINITY)
    }

    /// The degenerate interval `[x, x]`.
    pub fn point(x: f64) -> Self {
        Self::new(x, x)
    }

    pub fn is_empty(&self) -> bool {
        self.lower.is_nan() || self.upper.is_nan() || self.lower > self.upper
    }

    pub fn has_finite_lower(&self) -> bool {
        self.lower.is_finite()
    }

    pub fn has_finite_upper(&self) -> bool {
        self.upper.is_finite()
    }

    pub fn is_bounded(&self) -> bool {
        self.has_finite_lower() && self.has_finite_upper()
    }

    pub fn width(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        self.upper - self.lower
    }

    pub fn contains(&self, x: f64) -> bool {
        x >= self.lower && x <= self.upper
    }

    /// True when `other` lies entirely inside `self`.
    pub fn contains_interval(&self, other: &Interval) -> bool {
        other.lower >= self.lower && other.upper <= self.upper
    }

    /// Minkowski sum.
    pub fn add(&self, other: &Interval) -> Interval {
        Interval::new(self.lower + other.lower, self.upper + other.upper)
    }

    /// Translation by a constant.
    pub fn shift(&self, c: f64) -> Interval {
        Interval::new(self.lower + c, self.upper + c)
    }

    /// Image under `x -> factor * x`.
    ///
    /// A zero factor maps everything to `[0, 0]`, including infinite bounds.
    pub fn scale(&self, factor: f64) -> Interval {
        if factor == 0.0 {
            return Interval::point(0.0);
        }
        if factor > 0.0 {
            Interval::new(self.lower * factor, self.upper * factor)
        } else {
            Interval::new(self.upper * factor, self.lower * factor)
        }
    }

    pub fn intersect(&self, other: &Interval) -> Interval {
        Interval::new(self.lower.max(other.lower), self.upper.min(other.upper))
    }
}

impl Default for Interval {
    fn default() -> Self {
        Self::real_line()
    }
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.lower, self.upper)
    }
}
