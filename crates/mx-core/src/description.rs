//! Serializable mixture descriptions.
//!
//! A description names each atom's family and parameters, so a mixture
//! can be read from a JSON or TOML file and built against a configuration.

use std::path::Path;

use mx_config::MixtureConfig;
use serde::{Deserialize, Serialize};

use crate::distribution::{Dirac, Exponential, Gamma, Laplace, Normal, Uniform};
use crate::error::Result;
use crate::mixture::{Atom, RandomMixture};

/// `constant + Σ weight·distribution`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MixtureDescription {
    #[serde(default)]
    pub constant: f64,
    pub atoms: Vec<AtomDescription>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtomDescription {
    #[serde(default = "default_weight")]
    pub weight: f64,
    pub distribution: DistributionDescription,
}

fn default_weight() -> f64 {
    1.0
}

/// One atom family with its parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "snake_case")]
pub enum DistributionDescription {
    Normal { mean: f64, std_dev: f64 },
    Dirac { value: f64 },
    Uniform { lower: f64, upper: f64 },
    Exponential { rate: f64 },
    Gamma { shape: f64, rate: f64 },
    Laplace { location: f64, scale: f64 },
    Mixture(MixtureDescription),
}

impl DistributionDescription {
    fn build(&self, config: &MixtureConfig) -> Result<Atom> {
        let atom: Atom = match self {
            Self::Normal { mean, std_dev } => Normal::new(*mean, *std_dev)?.into(),
            Self::Dirac { value } => Dirac::new(*value)?.into(),
            Self::Uniform { lower, upper } => Uniform::new(*lower, *upper)?.into(),
            Self::Exponential { rate } => Exponential::new(*rate)?.into(),
            Self::Gamma { shape, rate } => Gamma::new(*shape, *rate)?.into(),
            Self::Laplace { location, scale } => Laplace::new(*location, *scale)?.into(),
            Self::Mixture(inner) => inner.build(config)?.into(),
        };
        Ok(atom)
    }
}

impl MixtureDescription {
    /// Load from a file; `.toml` is parsed as TOML, anything else as JSON.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Self::from_toml_str(&content),
            _ => Self::from_json_str(&content),
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Build the mixture. Nested descriptions use the same configuration.
    pub fn build(&self, config: &MixtureConfig) -> Result<RandomMixture> {
        let entries = self
            .atoms
            .iter()
            .map(|a| Ok((a.distribution.build(config)?, a.weight)))
            .collect::<Result<Vec<_>>>()?;
        RandomMixture::new(entries, self.constant, config.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    const JSON: &str = r#"{
        "constant": 1.5,
        "atoms": [
            {"weight": 2.0, "distribution": {"family": "normal", "mean": 0.0, "std_dev": 1.0}},
            {"distribution": {"family": "uniform", "lower": -1.0, "upper": 1.0}},
            {"weight": -1.0, "distribution": {"family": "exponential", "rate": 2.0}}
        ]
    }"#;

    #[test]
    fn parses_json_with_defaults() {
        let d = MixtureDescription::from_json_str(JSON).unwrap();
        assert_eq!(d.constant, 1.5);
        assert_eq!(d.atoms.len(), 3);
        assert_eq!(d.atoms[1].weight, 1.0);
        assert_eq!(
            d.atoms[2].distribution,
            DistributionDescription::Exponential { rate: 2.0 }
        );
    }

    #[test]
    fn parses_toml() {
        let text = r#"
            [[atoms]]
            weight = 0.5
            distribution = { family = "gamma", shape = 2.0, rate = 1.0 }

            [[atoms]]
            distribution = { family = "laplace", location = 0.0, scale = 1.0 }
        "#;
        let d = MixtureDescription::from_toml_str(text).unwrap();
        assert_eq!(d.constant, 0.0);
        assert_eq!(
            d.atoms[0].distribution,
            DistributionDescription::Gamma { shape: 2.0, rate: 1.0 }
        );
    }

    #[test]
    fn builds_nested_mixture() {
        let text = r#"{
            "atoms": [
                {"weight": 2.0, "distribution": {"family": "mixture", "constant": 1.0, "atoms": [
                    {"distribution": {"family": "uniform", "lower": 0.0, "upper": 1.0}},
                    {"distribution": {"family": "dirac", "value": 3.0}}
                ]}},
                {"distribution": {"family": "exponential", "rate": 1.0}}
            ]
        }"#;
        let m = MixtureDescription::from_json_str(text)
            .unwrap()
            .build(&MixtureConfig::default())
            .unwrap();
        // 2·(1 + U + 3) + E: constants absorbed, two atoms left
        assert_eq!(m.constant(), 8.0);
        assert_eq!(m.atom_count(), 2);
        assert!((m.mean() - (8.0 + 1.0 + 1.0)).abs() < 1e-14);
    }

    #[test]
    fn invalid_parameters_fail_to_build() {
        let d = MixtureDescription {
            constant: 0.0,
            atoms: vec![AtomDescription {
                weight: 1.0,
                distribution: DistributionDescription::Uniform { lower: 1.0, upper: 0.0 },
            }],
        };
        assert!(matches!(
            d.build(&MixtureConfig::default()),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn unknown_family_is_a_parse_error() {
        let err = MixtureDescription::from_json_str(
            r#"{"atoms": [{"distribution": {"family": "cauchy"}}]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }
}
