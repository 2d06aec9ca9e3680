//! Interval probabilities.
//!
//! Small mixtures integrate the density series term by term. Large ones
//! integrate the density numerically; the series would otherwise cancel
//! across many atoms.

use std::f64::consts::PI;

use mx_math::{clamp_probability, CompensatedSum, Interval};
use tracing::debug;

use super::bandwidth::wrapped_normal_interval;
use super::{sum_blocks, Estimate, RandomMixture};
use crate::logging::{event_names, Stage};

/// Upper bound on quadrature segments over one interval.
const MAX_SEGMENTS: usize = 512;

impl RandomMixture {
    /// Probability of the interval without touching the error diagnostics.
    pub(super) fn evaluate_probability(
        &self,
        lower: f64,
        upper: f64,
        lower_closed: bool,
        upper_closed: bool,
    ) -> Estimate {
        if lower.is_nan() || upper.is_nan() {
            return Estimate::new(f64::NAN, f64::NAN);
        }
        if lower > upper {
            return Estimate::exact(0.0);
        }

        if let Some((atom, w)) = self.single_atom() {
            let a = (lower - self.constant) / w;
            let b = (upper - self.constant) / w;
            let p = if w > 0.0 {
                atom.interval_probability(a, b, lower_closed, upper_closed)
            } else {
                atom.interval_probability(b, a, upper_closed, lower_closed)
            };
            return Estimate::exact(clamp_probability(p));
        }

        let range = self.shape.range;
        if Interval::new(lower, upper).contains_interval(&range) {
            return Estimate::exact(1.0);
        }
        let a = lower.max(range.lower);
        let b = upper.min(range.upper);
        if a >= b {
            return Estimate::exact(0.0);
        }

        let estimate = if self.is_large() {
            self.quadrature_probability(a, b)
        } else {
            self.series_probability(a, b)
        };
        Estimate::new(clamp_probability(estimate.value), estimate.error)
    }

    /// `Q(a, b) + (1/π)·Σ [Re Δφ·(sin mhb − sin mha) − Im Δφ·(cos mhb − cos mha)]/m`.
    ///
    /// Both bounds are finite here: they were clipped to the range, which
    /// is bounded whenever the dispersion is positive.
    fn series_probability(&self, a: f64, b: f64) -> Estimate {
        let h = self.bandwidth;
        let period = 2.0 * PI / h;
        let base = wrapped_normal_interval(
            a,
            b,
            &self.equivalent_normal,
            period,
            self.config.max_poisson_terms,
        );
        let (step_sin_a, step_cos_a) = (h * a).sin_cos();
        let (step_sin_b, step_cos_b) = (h * b).sin_cos();

        let mut state = self.lock_state();
        let series = sum_blocks(
            base,
            self.config.cdf_precision,
            self.config.min_terms(),
            self.config.max_terms(),
            |from, to| {
                let start = (from + 1) as f64 * h;
                let (mut sin_a, mut cos_a) = (start * a).sin_cos();
                let (mut sin_b, mut cos_b) = (start * b).sin_cos();
                let mut block = CompensatedSum::new(0.0);
                for m in from + 1..=to {
                    let delta = self.cached_delta(&mut state.cache, m);
                    let term = delta.re * (sin_b - sin_a) - delta.im * (cos_b - cos_a);
                    block.add(term / m as f64);
                    (sin_a, cos_a) = (
                        sin_a * step_cos_a + cos_a * step_sin_a,
                        cos_a * step_cos_a - sin_a * step_sin_a,
                    );
                    (sin_b, cos_b) = (
                        sin_b * step_cos_b + cos_b * step_sin_b,
                        cos_b * step_cos_b - sin_b * step_sin_b,
                    );
                }
                block.value() / PI
            },
        );
        drop(state);

        if !series.converged {
            debug!(
                event = event_names::MIXTURE_PRECISION_SHORTFALL,
                stage = %Stage::Evaluate,
                query = "probability",
                lower = a,
                upper = b,
                terms = series.terms,
                error = series.error,
                "probability series hit the term cap"
            );
        }
        Estimate::new(series.value, series.error)
    }

    /// Composite Gauss-Legendre quadrature of the density over `[a, b]`,
    /// with roughly one segment per dispersion.
    fn quadrature_probability(&self, a: f64, b: f64) -> Estimate {
        let segments = ((b - a) / self.shape.dispersion).ceil();
        let segments = if segments.is_finite() {
            (segments as usize).clamp(1, MAX_SEGMENTS)
        } else {
            MAX_SEGMENTS
        };
        debug!(
            event = event_names::MIXTURE_LARGE_QUADRATURE,
            stage = %Stage::Evaluate,
            lower = a,
            upper = b,
            segments,
            nodes = self.rule.order(),
            "integrating density for large mixture"
        );

        let step = (b - a) / segments as f64;
        let mut value = CompensatedSum::new(0.0);
        let mut error = 0.0;
        for i in 0..segments {
            let lo = a + step * i as f64;
            let hi = if i + 1 == segments { b } else { lo + step };
            for (x, w) in self.rule.mapped_nodes(lo, hi) {
                let density = self.evaluate_pdf(x);
                value.add(w * density.value);
                error += w * density.error;
            }
        }
        Estimate::new(value.value(), error)
    }
}
