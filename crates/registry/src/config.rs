//! Construction-time configuration for a registry instance.
//!
//! Values come from an optional TOML file layered under `DOMAINS_*`
//! environment variables, e.g. `DOMAINS_NAMESPACE=mango` or
//! `DOMAINS_MIN_PRICE=0.1`.

use crate::types::{LabelRules, DEFAULT_MAX_LABEL_LEN, DEFAULT_MIN_LABEL_LEN};
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File};
use domains_types::{AccountId, Amount};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Environment variable prefix for configuration overrides.
pub const ENV_PREFIX: &str = "DOMAINS";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Configuration file {0} not found")]
    MissingFile(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Parent namespace every label is registered under
    pub namespace: String,
    /// Flat registration floor
    pub min_price: Amount,
    /// Account allowed to withdraw accumulated funds
    pub administrator: AccountId,
    #[serde(default = "default_min_label_len")]
    pub min_label_len: usize,
    #[serde(default = "default_max_label_len")]
    pub max_label_len: usize,
}

fn default_min_label_len() -> usize {
    DEFAULT_MIN_LABEL_LEN
}

fn default_max_label_len() -> usize {
    DEFAULT_MAX_LABEL_LEN
}

impl RegistryConfig {
    pub fn new(namespace: impl Into<String>, min_price: Amount, administrator: AccountId) -> Self {
        Self {
            namespace: namespace.into(),
            min_price,
            administrator,
            min_label_len: DEFAULT_MIN_LABEL_LEN,
            max_label_len: DEFAULT_MAX_LABEL_LEN,
        }
    }

    pub fn with_label_bounds(mut self, min_len: usize, max_len: usize) -> Self {
        self.min_label_len = min_len;
        self.max_label_len = max_len;
        self
    }

    /// Load configuration from an optional file plus `DOMAINS_*` variables.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_from(Config::builder(), path)
    }

    /// Like [`RegistryConfig::load`], with `defaults` filling any value the
    /// file and environment leave unset.
    pub fn load_with_defaults(defaults: &RegistryConfig, path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_from(Config::builder().add_source(Config::try_from(defaults)?), path)
    }

    fn load_from(
        mut builder: ConfigBuilder<DefaultState>,
        path: Option<&Path>,
    ) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            if !path.exists() {
                return Err(ConfigError::MissingFile(path.display().to_string()));
            }
            builder = builder.add_source(File::from(path));
        }

        builder = builder.add_source(Environment::with_prefix(ENV_PREFIX));

        let config: RegistryConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn label_rules(&self) -> LabelRules {
        LabelRules::new(self.min_label_len, self.max_label_len)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_label_len == 0 {
            return Err(ConfigError::Invalid("min_label_len must be at least 1".into()));
        }
        if self.min_label_len > self.max_label_len {
            return Err(ConfigError::Invalid(format!(
                "min_label_len {} exceeds max_label_len {}",
                self.min_label_len, self.max_label_len
            )));
        }
        if self.min_price.is_zero() {
            return Err(ConfigError::Invalid("min_price must be greater than zero".into()));
        }
        // The namespace follows the same character rules as labels, with no length cap.
        LabelRules::new(1, usize::MAX)
            .validate(&self.namespace)
            .map_err(|e| ConfigError::Invalid(format!("namespace: {}", e)))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn admin() -> AccountId {
        AccountId::new([9u8; 32])
    }

    #[test]
    fn test_default_bounds() {
        let config = RegistryConfig::new("mango", Amount::parse("0.1").unwrap(), admin());
        assert!(config.validate().is_ok());
        assert_eq!(config.label_rules(), LabelRules::default());
    }

    #[test]
    fn test_rejects_zero_price() {
        let config = RegistryConfig::new("mango", Amount::ZERO, admin());
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_rejects_bad_namespace() {
        let config = RegistryConfig::new("Mango.eth", Amount::from_units(1), admin());
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
        let config = RegistryConfig::new("", Amount::from_units(1), admin());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_inverted_bounds() {
        let config =
            RegistryConfig::new("mango", Amount::from_units(1), admin()).with_label_bounds(8, 4);
        assert!(config.validate().is_err());
        let config =
            RegistryConfig::new("mango", Amount::from_units(1), admin()).with_label_bounds(0, 4);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "namespace = \"mango\"\nmin_price = \"0.1\"\nadministrator = \"{}\"\nmax_label_len = 12",
            admin()
        )
        .unwrap();

        let config = RegistryConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.namespace, "mango");
        assert_eq!(config.min_price, Amount::parse("0.1").unwrap());
        assert_eq!(config.administrator, admin());
        assert_eq!(config.min_label_len, DEFAULT_MIN_LABEL_LEN);
        assert_eq!(config.max_label_len, 12);
    }

    #[test]
    fn test_defaults_fill_unset_values() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "namespace = \"kiwi\"").unwrap();

        let defaults = RegistryConfig::new("mango", Amount::parse("0.1").unwrap(), admin());
        let config = RegistryConfig::load_with_defaults(&defaults, Some(file.path())).unwrap();
        assert_eq!(config.namespace, "kiwi");
        assert_eq!(config.min_price, defaults.min_price);
        assert_eq!(config.administrator, admin());
    }

    #[test]
    fn test_load_missing_file() {
        let err = RegistryConfig::load(Some(Path::new("/nonexistent/domains.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::MissingFile(_)));
    }
}
