//! The random mixture `Y = c + Σ wᵢ·Xᵢ`.
//!
//! # Evaluation
//!
//! The density is obtained by Poisson summation: sampling the
//! characteristic function on the grid `m·h` gives the density periodized
//! with period `2π/h`. The equivalent normal (same mean and variance as
//! `Y`) is used as a control variate; its periodized density is summed
//! directly and only `Δφ = φ_Y − φ_N` goes through the Fourier series,
//! which is summed in doubling blocks until the last block is below the
//! requested precision.
//!
//! Probabilities use the integrated series for small mixtures and
//! Gauss-Legendre quadrature of the density for large ones, where the
//! Fourier series loses too much to cancellation.
//!
//! # Shared state
//!
//! The `Δφ` cache and the last error estimates sit behind a mutex, so a
//! mixture can be queried from several threads. Everything derived from
//! the atoms is recomputed eagerly by the `&mut self` mutators.

mod atom;
mod bandwidth;
mod cache;
mod pdf;
mod probability;
mod quantile;
mod range;

pub use atom::Atom;

use std::sync::{Mutex, MutexGuard, PoisonError};

use mx_config::{validate_config, MixtureConfig};
use mx_math::{CompensatedSum, GaussLegendre, Interval};
use num_complex::Complex64;
use serde::Serialize;
use tracing::{debug, info};

use crate::distribution::{Distribution, Normal};
use crate::error::{Error, Result};
use crate::logging::{event_names, Stage};

use atom::flatten;
use cache::DeltaCache;
use range::Shape;

/// A computed value with its estimated absolute error.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Estimate {
    pub value: f64,
    pub error: f64,
}

impl Estimate {
    pub fn new(value: f64, error: f64) -> Self {
        Self { value, error }
    }

    /// A value obtained in closed form.
    pub fn exact(value: f64) -> Self {
        Self { value, error: 0.0 }
    }
}

#[derive(Debug, Clone)]
struct EvalState {
    cache: DeltaCache,
    last_pdf_error: f64,
    last_cdf_error: f64,
}

/// Weighted sum of independent one-dimensional random variables plus a
/// constant.
#[derive(Debug)]
pub struct RandomMixture {
    constant: f64,
    atoms: Vec<Atom>,
    weights: Vec<f64>,
    config: MixtureConfig,
    rule: GaussLegendre,
    mean: f64,
    variance: f64,
    shape: Shape,
    bandwidth: f64,
    equivalent_normal: Normal,
    state: Mutex<EvalState>,
}

impl RandomMixture {
    /// Build a mixture from weighted atoms and an additive constant.
    ///
    /// Nested mixtures are expanded, point masses absorbed into the
    /// constant, normals fused and negligible weights dropped.
    pub fn new(entries: Vec<(Atom, f64)>, constant: f64, config: MixtureConfig) -> Result<Self> {
        validate_config(&config)?;
        let rule = GaussLegendre::new(config.integration_nodes)
            .map_err(|e| Error::InvalidArgument(e.to_string()))?;
        let flat = flatten(entries, constant, config.small_weight)?;

        let mut mixture = Self {
            constant: flat.constant,
            atoms: flat.atoms,
            weights: flat.weights,
            state: Mutex::new(EvalState {
                cache: DeltaCache::new(config.max_size),
                last_pdf_error: 0.0,
                last_cdf_error: 0.0,
            }),
            config,
            rule,
            mean: 0.0,
            variance: 0.0,
            shape: Shape {
                position: 0.0,
                dispersion: 0.0,
                beta: 0.0,
                algebraic: Interval::real_line(),
                range: Interval::real_line(),
            },
            bandwidth: 1.0,
            equivalent_normal: Normal::standard(),
        };
        mixture.recompute();

        info!(
            event = event_names::MIXTURE_BUILT,
            stage = %Stage::Build,
            atoms = mixture.atoms.len(),
            constant = mixture.constant,
            range = %mixture.shape.range,
            beta = mixture.shape.beta,
            bandwidth = mixture.bandwidth,
            "random mixture built"
        );
        Ok(mixture)
    }

    /// Build with the built-in tunables.
    pub fn with_defaults(entries: Vec<(Atom, f64)>, constant: f64) -> Result<Self> {
        Self::new(entries, constant, MixtureConfig::default())
    }

    /// Recompute everything derived from the atoms and reset the cache.
    fn recompute(&mut self) {
        let mut mean = self.constant;
        let mut variance = 0.0;
        for (atom, &w) in self.atoms.iter().zip(&self.weights) {
            let d = atom.as_distribution();
            mean += w * d.mean();
            variance += w * w * d.variance();
        }
        self.mean = mean;
        self.variance = variance;

        let algebraic = range::algebraic_range(
            self.constant,
            self.atoms
                .iter()
                .zip(&self.weights)
                .map(|(a, &w)| (a.as_distribution().range(), w)),
        );
        let indicators: Vec<(f64, f64, f64)> = self
            .atoms
            .iter()
            .zip(&self.weights)
            .map(|(a, &w)| {
                let d = a.as_distribution();
                (w, d.position_indicator(), d.dispersion_indicator())
            })
            .collect();
        let shape = range::estimate_shape(
            self.constant,
            indicators,
            algebraic,
            self.config.alpha,
            self.config.pdf_precision,
            |t| self.characteristic_function(t).norm(),
        );
        self.shape = shape;
        self.bandwidth = bandwidth::reference_bandwidth(
            self.atoms.len(),
            self.config.small_size,
            &self.shape,
            self.config.alpha,
        );
        self.equivalent_normal = Normal::from_moments(mean, variance);

        let state = self.state.get_mut().unwrap_or_else(PoisonError::into_inner);
        state.cache.reset();
        state.last_pdf_error = 0.0;
        state.last_cdf_error = 0.0;

        debug!(
            event = event_names::MIXTURE_RECOMPUTED,
            stage = %Stage::Recompute,
            position = self.shape.position,
            dispersion = self.shape.dispersion,
            beta = self.shape.beta,
            bandwidth = self.bandwidth,
            "mixture state recomputed"
        );
    }

    fn lock_state(&self) -> MutexGuard<'_, EvalState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The only atom and its weight, when the mixture is an affine image
    /// of a single distribution.
    fn single_atom(&self) -> Option<(&dyn Distribution, f64)> {
        match (self.atoms.as_slice(), self.weights.as_slice()) {
            ([atom], [w]) => Some((atom.as_distribution(), *w)),
            _ => None,
        }
    }

    /// Whether probabilities go through quadrature instead of the series.
    pub fn is_large(&self) -> bool {
        self.atoms.len() >= self.config.small_size
    }

    // ------------------------------------------------------------------
    // Characteristic function
    // ------------------------------------------------------------------

    /// `ln φ_Y(t) = i·t·c + Σ ln φᵢ(wᵢ·t)`.
    pub fn log_characteristic_function(&self, t: f64) -> Complex64 {
        self.atoms.iter().zip(&self.weights).fold(
            Complex64::new(0.0, t * self.constant),
            |acc, (atom, &w)| acc + atom.as_distribution().log_characteristic_function(w * t),
        )
    }

    pub fn characteristic_function(&self, t: f64) -> Complex64 {
        self.log_characteristic_function(t).exp()
    }

    /// `φ_Y(t) − φ_N(t)`.
    fn delta_characteristic_function(&self, t: f64) -> Complex64 {
        self.characteristic_function(t) - self.equivalent_normal.characteristic_function(t)
    }

    /// `Δφ(k·h)` through the cache.
    fn cached_delta(&self, cache: &mut DeltaCache, k: usize) -> Complex64 {
        let h = self.bandwidth;
        cache.get(k, |j| self.delta_characteristic_function(j as f64 * h))
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn pdf(&self, x: f64) -> f64 {
        self.pdf_estimate(x).value
    }

    /// Density with the error estimate of the last series block.
    pub fn pdf_estimate(&self, x: f64) -> Estimate {
        let estimate = self.evaluate_pdf(x);
        self.lock_state().last_pdf_error = estimate.error;
        estimate
    }

    /// Density at each point, in order.
    pub fn pdf_grid(&self, points: &[f64]) -> Vec<f64> {
        points.iter().map(|&x| self.pdf(x)).collect()
    }

    /// P(Y ≤ x).
    pub fn cdf(&self, x: f64) -> f64 {
        self.probability(f64::NEG_INFINITY, x, false, true)
    }

    /// P(Y ≥ x).
    pub fn complementary_cdf(&self, x: f64) -> f64 {
        self.probability(x, f64::INFINITY, true, false)
    }

    pub fn survival_function(&self, x: f64) -> f64 {
        self.complementary_cdf(x)
    }

    /// Probability of the interval between `lower` and `upper`, clamped to
    /// [0, 1].
    pub fn probability(&self, lower: f64, upper: f64, lower_closed: bool, upper_closed: bool) -> f64 {
        self.probability_estimate(lower, upper, lower_closed, upper_closed)
            .value
    }

    pub fn probability_estimate(
        &self,
        lower: f64,
        upper: f64,
        lower_closed: bool,
        upper_closed: bool,
    ) -> Estimate {
        let estimate = self.evaluate_probability(lower, upper, lower_closed, upper_closed);
        self.lock_state().last_cdf_error = estimate.error;
        estimate
    }

    /// Error estimate of the most recent `pdf` query.
    pub fn last_pdf_error(&self) -> f64 {
        self.lock_state().last_pdf_error
    }

    /// Error estimate of the most recent probability query.
    pub fn last_cdf_error(&self) -> f64 {
        self.lock_state().last_cdf_error
    }

    /// Pre-fill the `Δφ` cache up to index `k` (capped at the ceiling).
    pub fn warm_cache(&self, k: usize) {
        let mut state = self.lock_state();
        let k = k.min(state.cache.ceiling());
        self.cached_delta(&mut state.cache, k);
    }

    /// Number of cached `Δφ` values.
    pub fn cache_len(&self) -> usize {
        self.lock_state().cache.len()
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn constant(&self) -> f64 {
        self.constant
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    pub fn config(&self) -> &MixtureConfig {
        &self.config
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    pub fn variance(&self) -> f64 {
        self.variance
    }

    pub fn std_dev(&self) -> f64 {
        self.variance.sqrt()
    }

    /// Effective support: the algebraic support truncated to
    /// `position ± beta·dispersion`.
    pub fn range(&self) -> Interval {
        self.shape.range
    }

    /// Support implied by the atoms' supports alone.
    pub fn algebraic_range(&self) -> Interval {
        self.shape.algebraic
    }

    pub fn position_indicator(&self) -> f64 {
        self.shape.position
    }

    pub fn dispersion_indicator(&self) -> f64 {
        self.shape.dispersion
    }

    pub fn alpha(&self) -> f64 {
        self.config.alpha
    }

    pub fn beta(&self) -> f64 {
        self.shape.beta
    }

    /// Sampling step `h` of the characteristic function.
    pub fn reference_bandwidth(&self) -> f64 {
        self.bandwidth
    }

    pub fn equivalent_normal(&self) -> &Normal {
        &self.equivalent_normal
    }

    // ------------------------------------------------------------------
    // Mutators
    // ------------------------------------------------------------------

    /// Replace the weights of the stored atoms and rebuild.
    ///
    /// The stored atoms are already flattened, so `weights` must match
    /// [`Self::atom_count`]. Weights that become negligible drop their atom.
    pub fn set_weights(&mut self, weights: &[f64]) -> Result<()> {
        if weights.len() != self.atoms.len() {
            return Err(Error::WeightCountMismatch {
                expected: self.atoms.len(),
                actual: weights.len(),
            });
        }
        let entries = self.atoms.iter().cloned().zip(weights.iter().copied()).collect();
        let flat = flatten(entries, self.constant, self.config.small_weight)?;
        self.constant = flat.constant;
        self.atoms = flat.atoms;
        self.weights = flat.weights;
        self.recompute();
        Ok(())
    }

    pub fn set_constant(&mut self, constant: f64) -> Result<()> {
        if !constant.is_finite() {
            return Err(Error::InvalidArgument(format!(
                "constant must be finite, got {constant}"
            )));
        }
        self.constant = constant;
        self.recompute();
        Ok(())
    }

    pub fn set_alpha(&mut self, alpha: f64) -> Result<()> {
        self.update_config(|c| c.alpha = alpha)?;
        self.recompute();
        Ok(())
    }

    /// Changes the decay threshold of the range search too, so the shape
    /// is recomputed.
    pub fn set_pdf_precision(&mut self, precision: f64) -> Result<()> {
        self.update_config(|c| c.pdf_precision = precision)?;
        self.recompute();
        Ok(())
    }

    pub fn set_cdf_precision(&mut self, precision: f64) -> Result<()> {
        self.update_config(|c| c.cdf_precision = precision)
    }

    pub fn set_block_bounds(&mut self, block_min: u32, block_max: u32) -> Result<()> {
        self.update_config(|c| {
            c.block_min = block_min;
            c.block_max = block_max;
        })
    }

    /// Change the cache ceiling. Entries below the new ceiling are kept.
    pub fn set_max_size(&mut self, max_size: usize) -> Result<()> {
        self.update_config(|c| c.max_size = max_size)?;
        self.state
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .cache
            .set_ceiling(max_size);
        Ok(())
    }

    fn update_config(&mut self, change: impl FnOnce(&mut MixtureConfig)) -> Result<()> {
        let mut config = self.config.clone();
        change(&mut config);
        validate_config(&config)?;
        self.config = config;
        Ok(())
    }
}

impl Clone for RandomMixture {
    fn clone(&self) -> Self {
        let state = self.lock_state().clone();
        Self {
            constant: self.constant,
            atoms: self.atoms.clone(),
            weights: self.weights.clone(),
            config: self.config.clone(),
            rule: self.rule.clone(),
            mean: self.mean,
            variance: self.variance,
            shape: self.shape,
            bandwidth: self.bandwidth,
            equivalent_normal: self.equivalent_normal,
            state: Mutex::new(state),
        }
    }
}

/// Outcome of an adaptively summed series.
#[derive(Debug, Clone, Copy)]
struct SeriesSum {
    value: f64,
    error: f64,
    terms: usize,
    converged: bool,
}

/// Block-doubling summation.
///
/// `block(from, to)` returns the contribution of terms `from+1..=to`. The
/// first block ends at `min_terms`; each later block doubles the count. The
/// sum stops once the last block is below `precision` (absolute or
/// relative) or when `max_terms` is reached, in which case the result is
/// returned unconverged with the last block as its error.
fn sum_blocks<F>(start: f64, precision: f64, min_terms: usize, max_terms: usize, mut block: F) -> SeriesSum
where
    F: FnMut(usize, usize) -> f64,
{
    let max_terms = max_terms.max(1);
    let mut value = CompensatedSum::new(start);
    let mut done = 0;
    let mut end = min_terms.clamp(1, max_terms);
    loop {
        let contribution = block(done, end);
        value.add(contribution);
        done = end;
        let error = contribution.abs();
        let total = value.value();
        if error < precision || error < precision * total.abs() {
            return SeriesSum {
                value: total,
                error,
                terms: done,
                converged: true,
            };
        }
        if done >= max_terms {
            return SeriesSum {
                value: total,
                error,
                terms: done,
                converged: false,
            };
        }
        end = (2 * done).min(max_terms);
    }
}

impl Distribution for RandomMixture {
    fn name(&self) -> &'static str {
        "RandomMixture"
    }

    fn characteristic_function(&self, t: f64) -> Complex64 {
        RandomMixture::characteristic_function(self, t)
    }

    fn log_characteristic_function(&self, t: f64) -> Complex64 {
        RandomMixture::log_characteristic_function(self, t)
    }

    fn pdf(&self, x: f64) -> f64 {
        RandomMixture::pdf(self, x)
    }

    fn cdf(&self, x: f64) -> f64 {
        RandomMixture::cdf(self, x)
    }

    fn complementary_cdf(&self, x: f64) -> f64 {
        RandomMixture::complementary_cdf(self, x)
    }

    fn interval_probability(
        &self,
        lower: f64,
        upper: f64,
        lower_closed: bool,
        upper_closed: bool,
    ) -> f64 {
        self.probability(lower, upper, lower_closed, upper_closed)
    }

    fn quantile(&self, p: f64, tail: bool) -> f64 {
        RandomMixture::quantile(self, p, tail).unwrap_or(f64::NAN)
    }

    fn mean(&self) -> f64 {
        self.mean
    }

    fn variance(&self) -> f64 {
        self.variance
    }

    fn range(&self) -> Interval {
        self.shape.range
    }

    fn position_indicator(&self) -> f64 {
        self.shape.position
    }

    fn dispersion_indicator(&self) -> f64 {
        self.shape.dispersion
    }

    fn is_continuous(&self) -> bool {
        self.atoms.iter().any(|a| a.as_distribution().is_continuous())
    }
}
