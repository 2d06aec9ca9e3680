//! Stable event names and stages for engine logging.
//!
//! Every engine event carries an `event` field taken from [`event_names`]
//! and a `stage` field, so JSONL consumers can filter without parsing
//! messages.

use serde::{Deserialize, Serialize};

/// Where in the mixture lifecycle an event was emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Atom flattening and first shape estimation.
    Build,
    /// Shape, bandwidth and cache reset after a mutation.
    Recompute,
    /// PDF, probability and quantile queries.
    Evaluate,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Stage::Build => "build",
            Stage::Recompute => "recompute",
            Stage::Evaluate => "evaluate",
        };
        write!(f, "{}", s)
    }
}

/// Standard event names used in logging.
pub mod event_names {
    pub const MIXTURE_BUILT: &str = "mixture.built";
    pub const MIXTURE_RECOMPUTED: &str = "mixture.recomputed";
    pub const MIXTURE_CACHE_CEILING: &str = "mixture.cache_ceiling";
    pub const MIXTURE_PRECISION_SHORTFALL: &str = "mixture.precision_shortfall";
    pub const MIXTURE_LARGE_QUADRATURE: &str = "mixture.large_quadrature";

    // CLI events
    pub const CONFIG_LOADED: &str = "config.loaded";
    pub const DESCRIPTION_LOADED: &str = "description.loaded";
}
