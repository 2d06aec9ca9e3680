//! Error types for the random mixture engine.
//!
//! Only configuration and argument problems are errors. Precision
//! shortfalls and cache-ceiling overflow are recovered locally and surface
//! through diagnostics and logs instead.

use mx_config::ValidationError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for mixture operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error categories for grouping related errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Invalid construction arguments or tunables.
    Config,
    /// Numerical queries that cannot be answered.
    Numerical,
    /// File I/O and (de)serialization errors.
    Io,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Config => write!(f, "config"),
            ErrorCategory::Numerical => write!(f, "numerical"),
            ErrorCategory::Io => write!(f, "io"),
        }
    }
}

/// Unified error type for the engine.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors (10-19)
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("weight count mismatch: expected {expected}, got {actual}")]
    WeightCountMismatch { expected: usize, actual: usize },

    #[error("a random mixture needs at least one atom")]
    EmptyMixture,

    #[error("the sum of absolute weights is negligible")]
    NegligibleWeights,

    #[error("configuration error: {0}")]
    Config(#[from] ValidationError),

    // Numerical errors (30-39)
    #[error("probability must be in [0, 1], got {0}")]
    InvalidProbability(f64),

    #[error("quantile search failed: {0}")]
    QuantileNotFound(String),

    // I/O errors (60-69)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl Error {
    /// Returns the error code for this error type.
    ///
    /// Error codes are stable and grouped by category:
    /// - 10-19: Configuration errors
    /// - 30-39: Numerical errors
    /// - 60-69: I/O errors
    pub fn code(&self) -> u32 {
        match self {
            Error::InvalidArgument(_) => 10,
            Error::WeightCountMismatch { .. } => 11,
            Error::EmptyMixture => 12,
            Error::NegligibleWeights => 13,
            Error::Config(_) => 14,
            Error::InvalidProbability(_) => 30,
            Error::QuantileNotFound(_) => 31,
            Error::Io(_) => 60,
            Error::Json(_) => 61,
            Error::Toml(_) => 62,
        }
    }

    /// Returns the error category for grouping and filtering.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::InvalidArgument(_)
            | Error::WeightCountMismatch { .. }
            | Error::EmptyMixture
            | Error::NegligibleWeights
            | Error::Config(_) => ErrorCategory::Config,

            Error::InvalidProbability(_) | Error::QuantileNotFound(_) => ErrorCategory::Numerical,

            Error::Io(_) | Error::Json(_) | Error::Toml(_) => ErrorCategory::Io,
        }
    }

    /// Whether the caller can fix this by changing its input.
    pub fn is_user_error(&self) -> bool {
        !matches!(self, Error::QuantileNotFound(_))
    }

    /// Structured form for machine-readable output.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "code": self.code(),
            "category": self.category(),
            "message": self.to_string(),
        })
    }
}
