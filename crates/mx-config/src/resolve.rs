//! Configuration resolution and path discovery.
//!
//! Resolution order: CLI argument → environment variable → XDG path → defaults.

use std::path::{Path, PathBuf};

use crate::tunables::MixtureConfig;
use crate::validate::{validate_config, ValidationResult};

/// Where the configuration was found.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConfigSource {
    /// Explicitly provided via CLI argument.
    CliArgument,

    /// Set via environment variable.
    Environment,

    /// Found in XDG config directory.
    XdgConfig,

    /// Using built-in defaults.
    #[default]
    BuiltinDefault,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::CliArgument => write!(f, "CLI argument"),
            ConfigSource::Environment => write!(f, "environment variable"),
            ConfigSource::XdgConfig => write!(f, "XDG config"),
            ConfigSource::BuiltinDefault => write!(f, "builtin default"),
        }
    }
}

/// A resolved configuration file location.
#[derive(Debug, Clone, Default)]
pub struct ResolvedConfig {
    /// Path to the config file (None when using defaults).
    pub path: Option<PathBuf>,

    /// Source of the config (for diagnostics).
    pub source: ConfigSource,
}

/// Environment variable holding an explicit config file path.
pub const ENV_CONFIG_PATH: &str = "MX_CONFIG";

/// Config file names probed in the XDG directory, in order.
const CONFIG_FILENAMES: [&str; 2] = ["config.json", "config.toml"];

/// Application name for XDG directories.
const APP_NAME: &str = "mixture-engine";

/// Resolve the configuration file path.
///
/// An explicit CLI path always wins, even if it does not exist, so that a
/// typo surfaces as an I/O error instead of silently falling back. The
/// environment variable is only honoured when it points at a file.
pub fn resolve_config_path(cli_path: Option<&Path>) -> ResolvedConfig {
    if let Some(path) = cli_path {
        return ResolvedConfig {
            path: Some(path.to_path_buf()),
            source: ConfigSource::CliArgument,
        };
    }

    if let Ok(env_path) = std::env::var(ENV_CONFIG_PATH) {
        let path = PathBuf::from(env_path);
        if path.is_file() {
            return ResolvedConfig {
                path: Some(path),
                source: ConfigSource::Environment,
            };
        }
    }

    if let Some(dir) = xdg_config_dir() {
        for name in CONFIG_FILENAMES {
            let path = dir.join(name);
            if path.is_file() {
                return ResolvedConfig {
                    path: Some(path),
                    source: ConfigSource::XdgConfig,
                };
            }
        }
    }

    ResolvedConfig::default()
}

/// Resolve, parse and validate the configuration.
pub fn load_config(cli_path: Option<&Path>) -> ValidationResult<(MixtureConfig, ConfigSource)> {
    let resolved = resolve_config_path(cli_path);
    let config = match &resolved.path {
        Some(path) => MixtureConfig::from_file(path)?,
        None => MixtureConfig::default(),
    };
    validate_config(&config)?;
    Ok((config, resolved.source))
}

/// Get the XDG config directory for the engine.
pub fn xdg_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_source_display() {
        assert_eq!(format!("{}", ConfigSource::CliArgument), "CLI argument");
        assert_eq!(
            format!("{}", ConfigSource::Environment),
            "environment variable"
        );
        assert_eq!(format!("{}", ConfigSource::XdgConfig), "XDG config");
        assert_eq!(
            format!("{}", ConfigSource::BuiltinDefault),
            "builtin default"
        );
    }

    #[test]
    fn test_cli_path_wins_even_when_missing() {
        let resolved = resolve_config_path(Some(Path::new("/nonexistent/mx.json")));
        assert_eq!(resolved.source, ConfigSource::CliArgument);
        assert!(load_config(Some(Path::new("/nonexistent/mx.json"))).is_err());
    }

    #[test]
    fn test_xdg_config_dir() {
        if let Some(path) = xdg_config_dir() {
            assert!(path.ends_with(APP_NAME));
        }
    }
}
