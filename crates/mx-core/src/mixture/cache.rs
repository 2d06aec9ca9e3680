//! Append-only cache of `Δφ(k·h) = φ_mixture(k·h) − φ_normal(k·h)`.
//!
//! Entry `k - 1` holds `Δφ(k·h)`. The cache only grows by filling every
//! missing index in ascending order; indices past the ceiling are computed
//! on the fly and never stored.

use num_complex::Complex64;
use tracing::info;

use crate::logging::{event_names, Stage};

#[derive(Debug, Clone)]
pub(crate) struct DeltaCache {
    values: Vec<Complex64>,
    ceiling: usize,
    overflow_reported: bool,
}

impl DeltaCache {
    pub fn new(ceiling: usize) -> Self {
        Self {
            values: Vec::new(),
            ceiling,
            overflow_reported: false,
        }
    }

    /// Number of valid entries.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn ceiling(&self) -> usize {
        self.ceiling
    }

    /// Drop every entry and start a new generation.
    pub fn reset(&mut self) {
        self.values.clear();
        self.overflow_reported = false;
    }

    /// Change the ceiling, keeping the entries still below it.
    pub fn set_ceiling(&mut self, ceiling: usize) {
        self.ceiling = ceiling;
        self.values.truncate(ceiling);
        self.overflow_reported = false;
    }

    /// `Δφ(k·h)`, filling the cache up to `k` when allowed.
    ///
    /// `compute(j)` must return `Δφ(j·h)` for the current bandwidth.
    pub fn get<F>(&mut self, k: usize, compute: F) -> Complex64
    where
        F: Fn(usize) -> Complex64,
    {
        if k == 0 {
            return Complex64::new(0.0, 0.0);
        }
        if k <= self.values.len() {
            return self.values[k - 1];
        }
        if k <= self.ceiling {
            self.values.reserve(k - self.values.len());
            while self.values.len() < k {
                let next = self.values.len() + 1;
                self.values.push(compute(next));
            }
            return self.values[k - 1];
        }
        if !self.overflow_reported {
            self.overflow_reported = true;
            info!(
                event = event_names::MIXTURE_CACHE_CEILING,
                stage = %Stage::Evaluate,
                ceiling = self.ceiling,
                index = k,
                "cache ceiling exceeded, computing characteristic function directly"
            );
        }
        compute(k)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn zero_index_is_exactly_zero() {
        let mut cache = DeltaCache::new(8);
        assert_eq!(cache.get(0, |_| Complex64::new(1.0, 1.0)), Complex64::new(0.0, 0.0));
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn fills_sequentially_and_reuses() {
        let calls = Cell::new(0);
        let f = |j: usize| {
            calls.set(calls.get() + 1);
            Complex64::new(j as f64, 0.0)
        };
        let mut cache = DeltaCache::new(16);
        assert_eq!(cache.get(5, f).re, 5.0);
        assert_eq!(cache.len(), 5);
        assert_eq!(calls.get(), 5);
        assert_eq!(cache.get(3, f).re, 3.0);
        assert_eq!(calls.get(), 5);
        assert_eq!(cache.get(6, f).re, 6.0);
        assert_eq!(calls.get(), 6);
    }

    #[test]
    fn beyond_ceiling_is_not_stored() {
        let mut cache = DeltaCache::new(4);
        let v = cache.get(10, |j| Complex64::new(0.0, j as f64));
        assert_eq!(v.im, 10.0);
        assert_eq!(cache.len(), 0);
        assert!(cache.overflow_reported);

        cache.set_ceiling(2);
        assert!(!cache.overflow_reported);
        cache.get(2, |j| Complex64::new(j as f64, 0.0));
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.ceiling(), 2);
        cache.reset();
        assert_eq!(cache.len(), 0);
    }
}
