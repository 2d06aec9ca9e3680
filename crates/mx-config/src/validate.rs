//! Configuration validation errors and semantic validation.

use thiserror::Error;

use crate::tunables::MixtureConfig;

/// Validation result type.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Largest accepted `block_max`; `2^30` series terms is already far past
/// any useful precision.
pub const BLOCK_MAX_LIMIT: u32 = 30;

/// Configuration validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Semantic validation failed: {0}")]
    SemanticError(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

impl ValidationError {
    /// Error code for structured error reporting.
    pub fn code(&self) -> u32 {
        match self {
            ValidationError::IoError(_) => 60,
            ValidationError::ParseError(_) => 61,
            ValidationError::SemanticError(_) => 63,
            ValidationError::InvalidValue { .. } => 65,
        }
    }

    fn invalid(field: &str, message: String) -> Self {
        ValidationError::InvalidValue {
            field: field.to_string(),
            message,
        }
    }
}

/// Validate the tunables semantically.
pub fn validate_config(config: &MixtureConfig) -> ValidationResult<()> {
    if !(config.alpha.is_finite() && config.alpha > 0.0) {
        return Err(ValidationError::invalid(
            "alpha",
            format!("Must be finite and > 0, got {}", config.alpha),
        ));
    }
    validate_precision("pdf_precision", config.pdf_precision)?;
    validate_precision("cdf_precision", config.cdf_precision)?;

    if config.block_max > BLOCK_MAX_LIMIT {
        return Err(ValidationError::invalid(
            "block_max",
            format!("Must be <= {}, got {}", BLOCK_MAX_LIMIT, config.block_max),
        ));
    }
    if config.block_min > config.block_max {
        return Err(ValidationError::SemanticError(format!(
            "block_min ({}) must not exceed block_max ({})",
            config.block_min, config.block_max
        )));
    }

    for (field, value) in [
        ("small_size", config.small_size),
        ("max_size", config.max_size),
        ("integration_nodes", config.integration_nodes),
        ("max_poisson_terms", config.max_poisson_terms),
        ("root_max_iter", config.root_max_iter),
    ] {
        if value == 0 {
            return Err(ValidationError::invalid(field, "Must be > 0".to_string()));
        }
    }

    if !(0.0..1.0).contains(&config.small_weight) {
        return Err(ValidationError::invalid(
            "small_weight",
            format!("Must be in [0, 1), got {}", config.small_weight),
        ));
    }

    Ok(())
}

fn validate_precision(field: &str, value: f64) -> ValidationResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ValidationError::invalid(
            field,
            format!("Must be finite and > 0, got {}", value),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        validate_config(&MixtureConfig::default()).unwrap();
    }

    #[test]
    fn rejects_non_positive_alpha() {
        for alpha in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let c = MixtureConfig {
                alpha,
                ..Default::default()
            };
            let err = validate_config(&c).unwrap_err();
            assert_eq!(err.code(), 65, "alpha={alpha}");
        }
    }

    #[test]
    fn rejects_inverted_blocks() {
        let c = MixtureConfig {
            block_min: 10,
            block_max: 4,
            ..Default::default()
        };
        assert!(matches!(
            validate_config(&c),
            Err(ValidationError::SemanticError(_))
        ));
    }

    #[test]
    fn rejects_huge_block_max() {
        let c = MixtureConfig {
            block_max: 31,
            ..Default::default()
        };
        assert!(validate_config(&c).is_err());
    }

    #[test]
    fn rejects_zero_counts_and_bad_weight() {
        let c = MixtureConfig {
            integration_nodes: 0,
            ..Default::default()
        };
        assert!(validate_config(&c).is_err());

        let c = MixtureConfig {
            small_weight: 1.0,
            ..Default::default()
        };
        assert!(validate_config(&c).is_err());
    }
}
