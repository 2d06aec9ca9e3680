//! Bracketed scalar root finding.
//!
//! The quantile solvers of the engine only ever need one method: Brent's
//! inverse-quadratic/bisection hybrid on a sign-changing bracket.

use thiserror::Error;

const SINGULAR_THRESHOLD: f64 = 1e-300;

/// Options for scalar root finding.
#[derive(Debug, Clone)]
pub struct ScalarOptions {
    /// Maximum number of iterations
    pub max_iter: usize,
    /// Absolute tolerance on the root
    pub tol: f64,
    /// Relative tolerance on the root
    pub rtol: f64,
}

impl Default for ScalarOptions {
    fn default() -> Self {
        Self {
            max_iter: 100,
            tol: 1e-12,
            rtol: 1e-12,
        }
    }
}

/// Result from a root finding method.
#[derive(Debug, Clone)]
pub struct RootResult {
    /// The root found
    pub root: f64,
    /// Function value at root
    pub function_value: f64,
    /// Number of iterations used
    pub iterations: usize,
    /// Final bracket width
    pub bracket_width: f64,
}

/// Root finding failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RootError {
    #[error("invalid bracket [{a}, {b}]")]
    InvalidInterval { a: f64, b: f64 },

    #[error("bracket endpoints have the same sign: f(a)={fa}, f(b)={fb}")]
    SameSignBracket { fa: f64, fb: f64 },

    #[error("did not converge within {iterations} iterations")]
    DidNotConverge { iterations: usize, best: f64 },
}

/// Brent's method on the bracket [a, b].
///
/// # Errors
/// * `InvalidInterval` if a >= b or a bound is not finite
/// * `SameSignBracket` if f(a) and f(b) have the same strict sign
/// * `DidNotConverge` if iterations exceed `max_iter` (carries the best point)
pub fn brentq<F>(f: F, a: f64, b: f64, options: &ScalarOptions) -> Result<RootResult, RootError>
where
    F: Fn(f64) -> f64,
{
    if a.is_nan() || b.is_nan() || a >= b || !a.is_finite() || !b.is_finite() {
        return Err(RootError::InvalidInterval { a, b });
    }

    let mut xa = a;
    let mut xb = b;
    let mut fa = f(xa);
    let mut fb = f(xb);

    if fa == 0.0 {
        return Ok(RootResult {
            root: xa,
            function_value: fa,
            iterations: 0,
            bracket_width: b - a,
        });
    }
    if fb == 0.0 {
        return Ok(RootResult {
            root: xb,
            function_value: fb,
            iterations: 0,
            bracket_width: b - a,
        });
    }
    if (fa > 0.0) == (fb > 0.0) {
        return Err(RootError::SameSignBracket { fa, fb });
    }

    let mut xc = xa;
    let mut fc = fa;
    let mut d = xb - xa;
    let mut e = d;

    for iter in 0..options.max_iter {
        if (fb > 0.0 && fc > 0.0) || (fb < 0.0 && fc < 0.0) {
            xc = xa;
            fc = fa;
            d = xb - xa;
            e = d;
        }

        if fc.abs() < fb.abs() {
            xa = xb;
            xb = xc;
            xc = xa;
            fa = fb;
            fb = fc;
            fc = fa;
        }

        let tol1 = 2.0 * f64::EPSILON * xb.abs() + 0.5 * options.tol.max(options.rtol * xb.abs());
        let xm = 0.5 * (xc - xb);

        if xm.abs() <= tol1 || fb == 0.0 {
            return Ok(RootResult {
                root: xb,
                function_value: fb,
                iterations: iter + 1,
                bracket_width: (xc - xb).abs(),
            });
        }

        if e.abs() >= tol1 && fa.abs() > fb.abs() {
            let s = fb / fa;
            let (p, q) = if (xa - xc).abs() < SINGULAR_THRESHOLD {
                // secant
                (2.0 * xm * s, 1.0 - s)
            } else {
                // inverse quadratic interpolation
                let q_temp = fa / fc;
                let r = fb / fc;
                (
                    s * (2.0 * xm * q_temp * (q_temp - r) - (xb - xa) * (r - 1.0)),
                    (q_temp - 1.0) * (r - 1.0) * (s - 1.0),
                )
            };

            let (p, q) = if p > 0.0 { (p, -q) } else { (-p, q) };

            if 2.0 * p < (3.0 * xm * q - (tol1 * q).abs()).min((e * q).abs()) {
                e = d;
                d = p / q;
            } else {
                d = xm;
                e = d;
            }
        } else {
            d = xm;
            e = d;
        }

        xa = xb;
        fa = fb;

        if d.abs() > tol1 {
            xb += d;
        } else {
            xb += if xm > 0.0 { tol1 } else { -tol1 };
        }

        fb = f(xb);
    }

    Err(RootError::DidNotConverge {
        iterations: options.max_iter,
        best: xb,
    })
}
