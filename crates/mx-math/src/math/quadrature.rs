//! Gauss-Legendre quadrature.
//!
//! An n-point rule exactly integrates polynomials of degree 2n-1 on [-1, 1].
//! Low orders are tabulated; higher orders are computed by Newton iteration
//! on the Legendre polynomial, starting from Chebyshev-like guesses.

use std::f64::consts::PI;

use thiserror::Error;

/// Quadrature construction failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QuadratureError {
    #[error("need at least 1 quadrature point")]
    ZeroOrder,
}

/// Gauss-Legendre quadrature rule on [-1, 1].
#[derive(Debug, Clone)]
pub struct GaussLegendre {
    /// Quadrature nodes on [-1, 1], ascending
    pub nodes: Vec<f64>,
    /// Quadrature weights
    pub weights: Vec<f64>,
}

impl GaussLegendre {
    /// Create an `n`-point rule.
    pub fn new(n: usize) -> Result<Self, QuadratureError> {
        match n {
            0 => Err(QuadratureError::ZeroOrder),
            1 => Ok(Self {
                nodes: vec![0.0],
                weights: vec![2.0],
            }),
            2 => {
                let x = 0.577_350_269_189_625_8_f64; // 1/sqrt(3)
                Ok(Self {
                    nodes: vec![-x, x],
                    weights: vec![1.0, 1.0],
                })
            }
            3 => {
                let x = 0.774_596_669_241_483_4_f64; // sqrt(3/5)
                Ok(Self {
                    nodes: vec![-x, 0.0, x],
                    weights: vec![5.0 / 9.0, 8.0 / 9.0, 5.0 / 9.0],
                })
            }
            _ => Ok(Self::compute_nodes_weights(n)),
        }
    }

    /// Number of nodes.
    pub fn order(&self) -> usize {
        self.nodes.len()
    }

    /// Nodes and weights mapped onto [a, b]; the weights include the
    /// Jacobian `(b - a) / 2`.
    pub fn mapped_nodes(&self, a: f64, b: f64) -> impl Iterator<Item = (f64, f64)> + '_ {
        let mid = 0.5 * (a + b);
        let half_width = 0.5 * (b - a);
        self.nodes
            .iter()
            .zip(&self.weights)
            .map(move |(&node, &weight)| (mid + half_width * node, weight * half_width))
    }

    /// Integrate `f` over [a, b] with a single application of the rule.
    pub fn integrate<F>(&self, f: F, a: f64, b: f64) -> f64
    where
        F: Fn(f64) -> f64,
    {
        self.mapped_nodes(a, b).map(|(x, w)| w * f(x)).sum()
    }

    /// Integrate `f` over [a, b] split into `segments` equal pieces.
    pub fn integrate_composite<F>(&self, f: F, a: f64, b: f64, segments: usize) -> f64
    where
        F: Fn(f64) -> f64,
    {
        let segments = segments.max(1);
        let step = (b - a) / segments as f64;
        (0..segments)
            .map(|i| {
                let lo = a + step * i as f64;
                let hi = if i + 1 == segments { b } else { lo + step };
                self.integrate(&f, lo, hi)
            })
            .sum()
    }

    fn compute_nodes_weights(n: usize) -> Self {
        let mut pairs: Vec<(f64, f64)> = Vec::with_capacity(n);
        let eps = 1e-15;
        let max_iter = 100;

        // Only the positive half is solved for; the rule is symmetric.
        let m = n.div_ceil(2);
        for i in 0..m {
            let mut x = ((4 * i + 3) as f64 / (4 * n + 2) as f64 * PI).cos();
            for _ in 0..max_iter {
                let (p, dp) = legendre_eval(n, x);
                let dx = p / dp;
                x -= dx;
                if dx.abs() < eps {
                    break;
                }
            }
            let (_, dp) = legendre_eval(n, x);
            let w = 2.0 / ((1.0 - x * x) * dp * dp);

            if i != n - 1 - i {
                pairs.push((x, w));
                pairs.push((-x, w));
            } else {
                // middle node for odd n
                pairs.push((0.0, w));
            }
        }

        pairs.sort_by(|a, b| a.0.total_cmp(&b.0));
        let (nodes, weights) = pairs.into_iter().unzip();
        Self { nodes, weights }
    }
}

/// Evaluate P_n(x) and P_n'(x) with the three-term recurrence.
fn legendre_eval(n: usize, x: f64) -> (f64, f64) {
    let mut p0 = 1.0;
    let mut p1 = x;
    for k in 2..=n {
        let kf = k as f64;
        let p2 = ((2.0 * kf - 1.0) * x * p1 - (kf - 1.0) * p0) / kf;
        p0 = p1;
        p1 = p2;
    }
    let dp = n as f64 * (x * p1 - p0) / (x * x - 1.0);
    (p1, dp)
}
