use crate::core::pricing::PricingInputs;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CurrencyConfig {
    /// Currency procurement costs are paid in.
    pub source: String,
    /// Currency listings are sold in.
    pub target: String,
}

impl Default for CurrencyConfig {
    fn default() -> Self {
        CurrencyConfig {
            source: "MYR".to_string(),
            target: "USD".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub currency: CurrencyConfig,
    /// Baseline pricing inputs; falls back to the built-in baseline.
    pub defaults: Option<PricingInputs>,
    /// JSON export of the product table used by `stats`.
    pub products_path: Option<String>,
    pub data_path: Option<String>,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        Self::load_from_path(&config_path)
    }

    /// Loads the default config file, or built-in defaults when there is none.
    pub fn load_or_default() -> Result<Self> {
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(
                "No config at {}, using built-in defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("in", "resale", "resale")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn default_data_path(&self) -> Result<PathBuf> {
        if let Some(custom_path) = &self.data_path {
            return Ok(PathBuf::from(custom_path));
        }
        let proj_dirs = ProjectDirs::from("in", "resale", "resale")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.data_dir().to_path_buf())
    }

    pub fn baseline(&self) -> PricingInputs {
        self.defaults.unwrap_or_default()
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        if let Some(defaults) = &config.defaults {
            defaults
                .validate()
                .with_context(|| format!("Invalid defaults in {}", path.as_ref().display()))?;
        }
        debug!("Successfully loaded config");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialization() {
        let yaml_str = r#"
currency:
  source: "MYR"
  target: "USD"
defaults:
  productCost: 12
  shipping: 25.5
  conversionRate: 4.45
  markupPercent: 40
  ebayFeePercent: 13.25
  adFeePercent: 2
products_path: "/tmp/products.json"
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(config.currency.source, "MYR");
        assert_eq!(config.currency.target, "USD");
        let defaults = config.defaults.expect("Expected defaults");
        assert_eq!(defaults.product_cost, 12.0);
        assert_eq!(defaults.conversion_rate, 4.45);
        assert_eq!(defaults.ad_fee_percent, 2.0);
        assert_eq!(config.products_path.as_deref(), Some("/tmp/products.json"));
        assert!(config.data_path.is_none());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: AppConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config.currency, CurrencyConfig::default());
        assert_eq!(config.baseline(), PricingInputs::BASELINE);
    }

    #[test]
    fn test_invalid_defaults_are_rejected() -> Result<()> {
        let file = tempfile::NamedTempFile::new()?;
        fs::write(
            file.path(),
            r#"
defaults:
  productCost: 3
  shipping: 40
  conversionRate: 0
  markupPercent: 60
  ebayFeePercent: 13
  adFeePercent: 0
"#,
        )?;

        let err = AppConfig::load_from_path(file.path()).unwrap_err();
        assert!(err.to_string().contains("Invalid defaults"));
        Ok(())
    }

    #[test]
    fn test_custom_data_path() -> Result<()> {
        let config = AppConfig {
            data_path: Some("/var/lib/resale".to_string()),
            ..AppConfig::default()
        };
        assert_eq!(config.default_data_path()?, PathBuf::from("/var/lib/resale"));
        Ok(())
    }
}
