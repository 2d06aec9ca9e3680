//! Engine tunables.
//!
//! Every field has a built-in default so a config file only needs to name
//! the keys it overrides.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::validate::{ValidationError, ValidationResult};

/// Numerical tunables of a random mixture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MixtureConfig {
    /// Atom count below which the Fourier interval formula and the
    /// range-based bandwidth are used.
    pub small_size: usize,

    /// `2^block_min` terms must be summed before convergence is declared.
    pub block_min: u32,

    /// `2^block_max` caps the number of series terms.
    pub block_max: u32,

    /// Cache ceiling; characteristic function differences beyond this
    /// index are computed directly.
    pub max_size: usize,

    /// Tail-search start multiplier.
    pub alpha: f64,

    /// Target error of PDF series; also the CF decay threshold of the
    /// range search.
    pub pdf_precision: f64,

    /// Target error of probability series and quantile root finding.
    pub cdf_precision: f64,

    /// Relative weight below which an atom is dropped.
    pub small_weight: f64,

    /// Gauss-Legendre nodes per segment of the large-mixture quadrature.
    pub integration_nodes: usize,

    /// Cap on wrap-around terms of the equivalent-normal sums.
    pub max_poisson_terms: usize,

    /// Iteration cap of the quantile root finder.
    pub root_max_iter: usize,
}

impl Default for MixtureConfig {
    fn default() -> Self {
        Self {
            small_size: 100,
            block_min: 3,
            block_max: 16,
            max_size: 65_536,
            alpha: 5.0,
            pdf_precision: 1e-10,
            cdf_precision: 1e-10,
            small_weight: 1e-12,
            integration_nodes: 16,
            max_poisson_terms: 1000,
            root_max_iter: 200,
        }
    }
}

impl MixtureConfig {
    /// Minimum number of series terms, `2^block_min`.
    pub fn min_terms(&self) -> usize {
        1usize << self.block_min
    }

    /// Maximum number of series terms, `2^block_max`.
    pub fn max_terms(&self) -> usize {
        1usize << self.block_max
    }

    /// Load from a JSON or TOML file, chosen by extension (JSON otherwise).
    pub fn from_file(path: &Path) -> ValidationResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ValidationError::IoError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Self::from_toml_str(&content),
            _ => Self::from_json_str(&content),
        }
    }

    /// Parse from a JSON string.
    pub fn from_json_str(json: &str) -> ValidationResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| ValidationError::ParseError(format!("Invalid JSON: {}", e)))
    }

    /// Parse from a TOML string.
    pub fn from_toml_str(text: &str) -> ValidationResult<Self> {
        toml::from_str(text).map_err(|e| ValidationError::ParseError(format!("Invalid TOML: {}", e)))
    }
}
