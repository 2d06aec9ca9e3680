//! One-dimensional atom distributions.
//!
//! The mixture engine only talks to atoms through [`Distribution`]: a flat
//! capability interface with one implementation per family. Any type
//! implementing it can be mixed, including [`crate::RandomMixture`] itself.

mod dirac;
mod exponential;
mod gamma;
mod laplace;
mod normal;
mod uniform;

pub use dirac::Dirac;
pub use exponential::Exponential;
pub use gamma::Gamma;
pub use laplace::Laplace;
pub use normal::Normal;
pub use uniform::Uniform;

use mx_math::{clamp_probability, Interval};
use num_complex::Complex64;

/// How a mixture treats an atom when it flattens its atom list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AtomKind {
    /// Point mass, absorbed into the additive constant.
    Dirac { value: f64 },
    /// Normal, fused with the other normals.
    Normal { mean: f64, std_dev: f64 },
    Other,
}

/// Capabilities the mixture engine consumes from an atom.
pub trait Distribution: Send + Sync + std::fmt::Debug {
    /// Family name, for diagnostics.
    fn name(&self) -> &'static str;

    /// φ(t) = E[exp(i·t·X)].
    fn characteristic_function(&self, t: f64) -> Complex64;

    /// ln φ(t). Families override this when the logarithm has a closed form
    /// that stays finite where φ itself underflows.
    fn log_characteristic_function(&self, t: f64) -> Complex64 {
        self.characteristic_function(t).ln()
    }

    fn pdf(&self, x: f64) -> f64;

    /// P(X ≤ x).
    fn cdf(&self, x: f64) -> f64;

    /// P(X > x).
    fn complementary_cdf(&self, x: f64) -> f64 {
        clamp_probability(1.0 - self.cdf(x))
    }

    /// Probability of the interval between `lower` and `upper`.
    ///
    /// The closedness flags only matter for atoms with point masses; the
    /// default assumes a continuous distribution and ignores them.
    fn interval_probability(
        &self,
        lower: f64,
        upper: f64,
        _lower_closed: bool,
        _upper_closed: bool,
    ) -> f64 {
        if lower.is_nan() || upper.is_nan() {
            return f64::NAN;
        }
        if lower >= upper {
            return 0.0;
        }
        let from_left = self.cdf(lower);
        let p = if from_left > 0.5 {
            self.complementary_cdf(lower) - self.complementary_cdf(upper)
        } else {
            self.cdf(upper) - from_left
        };
        clamp_probability(p)
    }

    /// Quantile of order `p`; with `tail` the point exceeded with
    /// probability `p`.
    fn quantile(&self, p: f64, tail: bool) -> f64;

    fn mean(&self) -> f64;

    fn variance(&self) -> f64;

    fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    /// Support, possibly unbounded.
    fn range(&self) -> Interval;

    /// Location summary combined additively across atoms.
    fn position_indicator(&self) -> f64 {
        self.mean()
    }

    /// Scale summary combined quadratically across atoms.
    fn dispersion_indicator(&self) -> f64 {
        self.std_dev()
    }

    fn is_continuous(&self) -> bool {
        true
    }

    /// Tag read by flattening; only point masses and normals override it.
    fn kind(&self) -> AtomKind {
        AtomKind::Other
    }
}

/// `sin(x)/x`, with its Taylor expansion near zero.
pub(crate) fn sinc(x: f64) -> f64 {
    if x.abs() < 1e-4 {
        let x2 = x * x;
        1.0 - x2 / 6.0 * (1.0 - x2 / 20.0)
    } else {
        x.sin() / x
    }
}

/// Turn a lower-tail probability into the requested tail.
pub(crate) fn lower_tail_probability(p: f64, tail: bool) -> f64 {
    if tail {
        1.0 - p
    } else {
        p
    }
}
