//! Density by Poisson summation.

use std::f64::consts::PI;

use mx_math::CompensatedSum;
use tracing::debug;

use super::bandwidth::wrapped_normal_pdf;
use super::{sum_blocks, Estimate, RandomMixture};
use crate::logging::{event_names, Stage};

impl RandomMixture {
    /// Density at `x` without touching the error diagnostics.
    ///
    /// `p(x) ≈ Σₖ q(x + 2πk/h) + (h/π)·Σ_{m≥1} Re(Δφ(m·h)·e^{-i·m·h·x})`
    /// where `q` is the equivalent normal density.
    pub(super) fn evaluate_pdf(&self, x: f64) -> Estimate {
        if x.is_nan() {
            return Estimate::new(f64::NAN, f64::NAN);
        }
        if !self.shape.range.contains(x) {
            return Estimate::exact(0.0);
        }
        if let Some((atom, w)) = self.single_atom() {
            return Estimate::exact(atom.pdf((x - self.constant) / w) / w.abs());
        }

        let h = self.bandwidth;
        let period = 2.0 * PI / h;
        let base = wrapped_normal_pdf(
            x,
            &self.equivalent_normal,
            period,
            self.config.max_poisson_terms,
        );
        let (step_sin, step_cos) = (h * x).sin_cos();

        let mut state = self.lock_state();
        let series = sum_blocks(
            base,
            self.config.pdf_precision,
            self.config.min_terms(),
            self.config.max_terms(),
            |from, to| {
                // angle addition from an exact seed at the block start
                let (mut sin, mut cos) = ((from + 1) as f64 * h * x).sin_cos();
                let mut block = CompensatedSum::new(0.0);
                for m in from + 1..=to {
                    let delta = self.cached_delta(&mut state.cache, m);
                    block.add(delta.re * cos + delta.im * sin);
                    (sin, cos) = (sin * step_cos + cos * step_sin, cos * step_cos - sin * step_sin);
                }
                block.value() * h / PI
            },
        );
        drop(state);

        if !series.converged {
            debug!(
                event = event_names::MIXTURE_PRECISION_SHORTFALL,
                stage = %Stage::Evaluate,
                query = "pdf",
                x,
                terms = series.terms,
                error = series.error,
                "density series hit the term cap"
            );
        }
        Estimate::new(series.value.max(0.0), series.error)
    }
}
