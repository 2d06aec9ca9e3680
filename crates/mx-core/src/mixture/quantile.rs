//! Quantiles by bracketed root finding on the distribution function.

use mx_math::{brentq, RootError, ScalarOptions};
use tracing::debug;

use super::RandomMixture;
use crate::error::{Error, Result};
use crate::logging::{event_names, Stage};

impl RandomMixture {
    /// Value `y` with `P(Y ≤ y) = p`, or `P(Y > y) = p` when `tail` is set.
    ///
    /// Probabilities of exactly 0 or 1 map to the bounds of the effective
    /// range, which may be infinite.
    pub fn quantile(&self, p: f64, tail: bool) -> Result<f64> {
        if p.is_nan() || !(0.0..=1.0).contains(&p) {
            return Err(Error::InvalidProbability(p));
        }
        if let Some((atom, w)) = self.single_atom() {
            let q = atom.quantile(p, tail ^ (w < 0.0));
            return Ok(self.constant + w * q);
        }

        let range = self.shape.range;
        let lower_p = if tail { 1.0 - p } else { p };
        if lower_p <= 0.0 {
            return Ok(range.lower);
        }
        if lower_p >= 1.0 {
            return Ok(range.upper);
        }

        let objective = |y: f64| {
            if tail {
                p - self.complementary_cdf(y)
            } else {
                self.cdf(y) - p
            }
        };
        let options = ScalarOptions {
            max_iter: self.config.root_max_iter,
            tol: self.config.cdf_precision * self.shape.dispersion,
            rtol: 0.0,
        };
        match brentq(objective, range.lower, range.upper, &options) {
            Ok(result) => Ok(result.root),
            Err(RootError::DidNotConverge { iterations, best }) => {
                debug!(
                    event = event_names::MIXTURE_PRECISION_SHORTFALL,
                    stage = %Stage::Evaluate,
                    query = "quantile",
                    p,
                    iterations,
                    best,
                    "quantile search hit the iteration cap"
                );
                Ok(best)
            }
            Err(e) => Err(Error::QuantileNotFound(e.to_string())),
        }
    }
}
