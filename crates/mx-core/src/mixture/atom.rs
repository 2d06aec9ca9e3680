//! Tagged atoms and the flattening pass run at construction.
//!
//! Flattening expands nested mixtures, absorbs point masses into the
//! additive constant, fuses every normal atom into a single one and drops
//! atoms whose weight is negligible relative to the total.

use std::sync::Arc;

use crate::distribution::{AtomKind, Dirac, Distribution, Exponential, Gamma, Laplace, Normal, Uniform};
use crate::error::{Error, Result};

use super::RandomMixture;

/// An atom of a random mixture, tagged by the cases flattening treats
/// specially.
#[derive(Debug, Clone)]
pub enum Atom {
    /// Point mass; absorbed into the constant.
    Dirac(Dirac),
    /// Normal; all normals are fused into one.
    Normal(Normal),
    /// Nested mixture; expanded into its own atoms.
    Mixture(Arc<RandomMixture>),
    /// Any other distribution, used as is.
    Other(Arc<dyn Distribution>),
}

impl Atom {
    /// Wrap any distribution. Point masses and normals are recognised
    /// through [`Distribution::kind`] and tagged accordingly.
    pub fn other<D: Distribution + 'static>(distribution: D) -> Self {
        Atom::Other(Arc::new(distribution)).retagged()
    }

    /// Re-tag an `Other` atom whose distribution reports a special kind.
    fn retagged(self) -> Self {
        let kind = match &self {
            Atom::Other(d) => d.kind(),
            _ => AtomKind::Other,
        };
        let tagged = match kind {
            AtomKind::Dirac { value } => Dirac::new(value).map(Atom::Dirac).ok(),
            AtomKind::Normal { mean, std_dev } => Normal::new(mean, std_dev).map(Atom::Normal).ok(),
            AtomKind::Other => None,
        };
        tagged.unwrap_or(self)
    }

    pub fn as_distribution(&self) -> &dyn Distribution {
        match self {
            Atom::Dirac(d) => d,
            Atom::Normal(n) => n,
            Atom::Mixture(m) => m.as_ref(),
            Atom::Other(d) => d.as_ref(),
        }
    }
}

impl From<Dirac> for Atom {
    fn from(d: Dirac) -> Self {
        Atom::Dirac(d)
    }
}

impl From<Normal> for Atom {
    fn from(n: Normal) -> Self {
        Atom::Normal(n)
    }
}

impl From<RandomMixture> for Atom {
    fn from(m: RandomMixture) -> Self {
        Atom::Mixture(Arc::new(m))
    }
}

impl From<Arc<RandomMixture>> for Atom {
    fn from(m: Arc<RandomMixture>) -> Self {
        Atom::Mixture(m)
    }
}

impl From<Uniform> for Atom {
    fn from(d: Uniform) -> Self {
        Atom::other(d)
    }
}

impl From<Exponential> for Atom {
    fn from(d: Exponential) -> Self {
        Atom::other(d)
    }
}

impl From<Gamma> for Atom {
    fn from(d: Gamma) -> Self {
        Atom::other(d)
    }
}

impl From<Laplace> for Atom {
    fn from(d: Laplace) -> Self {
        Atom::other(d)
    }
}

/// Result of flattening: parallel atom and weight lists plus the constant.
#[derive(Debug, Clone)]
pub(crate) struct Flattened {
    pub atoms: Vec<Atom>,
    pub weights: Vec<f64>,
    pub constant: f64,
}

/// Normalize a list of weighted atoms.
///
/// Invariants of the result: `atoms` is non-empty, no atom is a nested
/// mixture, at most one atom is normal, and Dirac atoms only appear in the
/// degenerate case where the whole mixture is a single point mass (stored
/// with weight 1 and constant 0).
pub(crate) fn flatten(entries: Vec<(Atom, f64)>, constant: f64, small_weight: f64) -> Result<Flattened> {
    if !constant.is_finite() {
        return Err(Error::InvalidArgument(format!(
            "constant must be finite, got {constant}"
        )));
    }
    if entries.is_empty() {
        return Err(Error::EmptyMixture);
    }

    let mut expanded = Vec::with_capacity(entries.len());
    let mut constant = constant;
    for (atom, weight) in entries {
        if !weight.is_finite() {
            return Err(Error::InvalidArgument(format!(
                "weights must be finite, got {weight}"
            )));
        }
        expand(atom, weight, &mut expanded, &mut constant);
    }

    let total: f64 = expanded.iter().map(|(_, w)| w.abs()).sum();
    if !total.is_finite() || total <= f64::MIN_POSITIVE {
        return Err(Error::NegligibleWeights);
    }
    let threshold = small_weight * total;

    let mut atoms = Vec::with_capacity(expanded.len());
    let mut weights = Vec::with_capacity(expanded.len());
    let mut normal_slot: Option<usize> = None;
    let mut fused_mean = 0.0;
    let mut fused_variance = 0.0;

    for (atom, weight) in expanded {
        // Point masses are absorbed exactly, however small their weight.
        if let Atom::Dirac(d) = &atom {
            constant += weight * d.value();
            continue;
        }
        if weight == 0.0 || weight.abs() < threshold {
            continue;
        }
        match atom {
            Atom::Normal(n) => {
                fused_mean += weight * n.mean();
                fused_variance += weight * weight * n.variance();
                if normal_slot.is_none() {
                    normal_slot = Some(atoms.len());
                }
            }
            other => {
                atoms.push(other);
                weights.push(weight);
            }
        }
    }

    if let Some(slot) = normal_slot {
        let fused = Normal::new(fused_mean, fused_variance.sqrt())?;
        atoms.insert(slot, Atom::Normal(fused));
        weights.insert(slot, 1.0);
    }

    if atoms.is_empty() {
        return Ok(Flattened {
            atoms: vec![Atom::Dirac(Dirac::new(constant)?)],
            weights: vec![1.0],
            constant: 0.0,
        });
    }

    Ok(Flattened {
        atoms,
        weights,
        constant,
    })
}

fn expand(atom: Atom, weight: f64, out: &mut Vec<(Atom, f64)>, constant: &mut f64) {
    match atom {
        Atom::Mixture(mixture) => {
            *constant += weight * mixture.constant();
            for (inner, inner_weight) in mixture.atoms().iter().zip(mixture.weights()) {
                expand(inner.clone(), weight * inner_weight, out, constant);
            }
        }
        leaf => out.push((leaf.retagged(), weight)),
    }
}
