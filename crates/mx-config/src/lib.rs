//! Random mixture engine configuration loading and validation.
//!
//! This crate provides:
//! - The typed tunables table (`MixtureConfig`) with built-in defaults
//! - Config resolution (CLI → env → XDG → defaults)
//! - Semantic validation with stable error codes

pub mod resolve;
pub mod tunables;
pub mod validate;

pub use resolve::{load_config, resolve_config_path, ConfigSource, ResolvedConfig};
pub use tunables::MixtureConfig;
pub use validate::{validate_config, ValidationError, ValidationResult};
