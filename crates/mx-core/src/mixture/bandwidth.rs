//! Reference bandwidth and the wrapped equivalent-normal sums.
//!
//! The Fourier series of the engine sample the characteristic function on
//! the grid `m·h`, which periodizes the density with period `2π/h`. The
//! equivalent normal part of that periodized density is summed directly
//! here; only the difference `φ − φ_N` goes through the series.

use std::f64::consts::PI;

use mx_math::{normal_interval_probability, normal_pdf};

use super::range::Shape;
use crate::distribution::{Distribution, Normal};

/// Choose the sampling step `h` of the characteristic function.
///
/// Small mixtures use the width of the effective range, halved when the
/// support is bounded on both sides. Large mixtures use a window of
/// `(β + 4α)` dispersions instead of the clipped range width.
pub(crate) fn reference_bandwidth(atom_count: usize, small_size: usize, shape: &Shape, alpha: f64) -> f64 {
    let large = 2.0 * PI / ((shape.beta + 4.0 * alpha) * shape.dispersion);
    if atom_count >= small_size {
        return sanitize(large);
    }
    let width = shape.range.width();
    let mut h = 2.0 * PI / width;
    if shape.algebraic.is_bounded() {
        h *= 0.5;
    }
    if h.is_finite() && h > 0.0 {
        h
    } else {
        sanitize(large)
    }
}

// Degenerate shapes (zero dispersion) only reach the single-atom shortcuts,
// which never read `h`.
fn sanitize(h: f64) -> f64 {
    if h.is_finite() && h > 0.0 {
        h
    } else {
        1.0
    }
}

/// `Σ_k q(x + k·period)` for the normal density `q`.
///
/// Summed outwards from the image of `x` closest to the mean, so terms
/// decrease monotonically and the loop stops at the first negligible one.
pub(crate) fn wrapped_normal_pdf(x: f64, normal: &Normal, period: f64, max_terms: usize) -> f64 {
    let (mean, sd) = (normal.mean(), normal.std_dev());
    let center = x + ((mean - x) / period).round() * period;
    let mut sum = normal_pdf(center, mean, sd);
    for j in 1..=max_terms {
        let shift = j as f64 * period;
        let term = normal_pdf(center + shift, mean, sd) + normal_pdf(center - shift, mean, sd);
        sum += term;
        if term <= f64::EPSILON * sum {
            break;
        }
    }
    sum
}

/// `Σ_k P(lower + k·period ≤ N ≤ upper + k·period)` for a finite interval.
pub(crate) fn wrapped_normal_interval(
    lower: f64,
    upper: f64,
    normal: &Normal,
    period: f64,
    max_terms: usize,
) -> f64 {
    let (mean, sd) = (normal.mean(), normal.std_dev());
    if !(lower.is_finite() && upper.is_finite()) {
        return normal_interval_probability(lower, upper, mean, sd);
    }
    let offset = ((mean - 0.5 * (lower + upper)) / period).round() * period;
    let (a, b) = (lower + offset, upper + offset);
    let mut sum = normal_interval_probability(a, b, mean, sd);
    for j in 1..=max_terms {
        let shift = j as f64 * period;
        let term = normal_interval_probability(a + shift, b + shift, mean, sd)
            + normal_interval_probability(a - shift, b - shift, mean, sd);
        sum += term;
        if term <= f64::EPSILON * sum {
            break;
        }
    }
    sum
}
