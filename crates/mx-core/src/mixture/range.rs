//! Position, dispersion and effective support of a mixture.
//!
//! The additive combination of position indicators and the quadratic
//! combination of dispersion indicators are heuristics. The resulting
//! `beta` and `range` are practical truncation bounds, not guarantees.

use mx_math::Interval;

/// Dispersion multiple bounding the tail search.
const MAX_EXCURSION: f64 = 100.0;

/// Initial search step as a fraction of the dispersion.
const INITIAL_STEP: f64 = 0.1;

/// Geometric growth of the search step.
const STEP_GROWTH: f64 = 1.1;

/// Shape summary derived from the flattened atoms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Shape {
    pub position: f64,
    pub dispersion: f64,
    pub beta: f64,
    /// `constant + Σ wᵢ·range(Xᵢ)`; carries the true finiteness of each side.
    pub algebraic: Interval,
    /// `algebraic ∩ [position ± beta·dispersion]`.
    pub range: Interval,
}

/// `constant + Σ wᵢ·range(Xᵢ)` by interval arithmetic.
pub(crate) fn algebraic_range(constant: f64, ranges: impl IntoIterator<Item = (Interval, f64)>) -> Interval {
    ranges
        .into_iter()
        .fold(Interval::point(constant), |acc, (range, weight)| acc.add(&range.scale(weight)))
}

/// Estimate the shape of the mixture.
///
/// `indicators` yields `(weight, position indicator, dispersion indicator)`
/// per atom; `modulus` evaluates |φ_mixture(t)|.
pub(crate) fn estimate_shape<F>(
    constant: f64,
    indicators: impl IntoIterator<Item = (f64, f64, f64)>,
    algebraic: Interval,
    alpha: f64,
    pdf_precision: f64,
    modulus: F,
) -> Shape
where
    F: Fn(f64) -> f64,
{
    let mut position = constant;
    let mut dispersion_sq = 0.0;
    for (weight, pos, disp) in indicators {
        position += weight * pos;
        let d = weight * disp;
        dispersion_sq += d * d;
    }
    let dispersion = dispersion_sq.sqrt();

    if !(dispersion.is_finite() && dispersion > 0.0) {
        return Shape {
            position,
            dispersion: 0.0,
            beta: 0.0,
            algebraic,
            range: algebraic,
        };
    }

    let beta = search_beta(position, dispersion, alpha, pdf_precision, modulus);
    let half_width = beta * dispersion;
    let window = Interval::new(position - half_width, position + half_width);
    let mut range = algebraic.intersect(&window);
    if range.is_empty() {
        // The heuristic window missed the support entirely; fall back to
        // whatever finite part of the support is known.
        range = algebraic;
    }

    Shape {
        position,
        dispersion,
        beta,
        algebraic,
        range,
    }
}

/// Walk outwards until the characteristic function has decayed below the
/// working precision, capped at `MAX_EXCURSION` dispersions.
fn search_beta<F>(position: f64, dispersion: f64, alpha: f64, pdf_precision: f64, modulus: F) -> f64
where
    F: Fn(f64) -> f64,
{
    let limit = position + MAX_EXCURSION * dispersion;
    let mut x = position + alpha * dispersion;
    let mut step = INITIAL_STEP * dispersion;
    while x < limit && modulus(x) > pdf_precision {
        x = (x + step).min(limit);
        step *= STEP_GROWTH;
    }
    2.0 * (x - position) / dispersion
}
