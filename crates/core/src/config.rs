//! Application configuration.
//!
//! The emission factor table and the carbon credit constants are the
//! only "persisted" artifacts of the application. They are loaded once
//! at startup — defaults, then an optional TOML file under the user's
//! config directory, then `ECOTRIP_*` environment overrides — and
//! injected into [`crate::Calculator`] and [`crate::RouteTable`] as
//! immutable values.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Directory under the platform config root holding ecotrip files.
pub const CONFIG_DIR: &str = "ecotrip";
/// File name of the user configuration.
pub const CONFIG_FILE: &str = "config.toml";

/// Default configuration, also written verbatim by
/// [`ensure_default_config`] so users have a commented file to edit.
const DEFAULT_CONFIG_TOML: &str = r#"# ecotrip configuration
#
# Emission factors are kg of CO2 emitted per kilometre travelled.
# Entry order is significant: comparison ties keep this order, and the
# entry named "car" is the savings baseline.

# Simulated processing delay before results are shown (milliseconds).
processing_delay_ms = 1500

[[factors]]
mode = "bicycle"
factor = 0.0
label = "Bicicleta"
icon = "🚲"

[[factors]]
mode = "car"
factor = 0.12
label = "Carro"
icon = "🚗"

[[factors]]
mode = "bus"
factor = 0.089
label = "Ônibus"
icon = "🚌"

[[factors]]
mode = "truck"
factor = 0.96
label = "Caminhão"
icon = "🚛"

[carbon_credit]
kg_per_credit = 1000.0
price_min_brl = 50.0
price_max_brl = 150.0
"#;

/// Errors raised while loading or validating the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The underlying source could not be read or deserialized.
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
    /// An emission factor was negative.
    #[error("emission factor for '{mode}' must be non-negative (got {value})")]
    NegativeFactor {
        /// Offending mode key.
        mode: String,
        /// Configured value.
        value: f64,
    },
    /// The mass of CO₂ per credit must be positive (it divides emissions).
    #[error("carbon_credit.kg_per_credit must be positive (got {0})")]
    NonPositiveKgPerCredit(f64),
    /// A credit unit price was negative.
    #[error("carbon_credit.{name} must be non-negative (got {value})")]
    NegativePrice {
        /// Offending constant name.
        name: &'static str,
        /// Configured value.
        value: f64,
    },
    /// The min/max unit prices are inverted.
    #[error("carbon credit price range is inverted (min {min} > max {max})")]
    InvertedPriceRange {
        /// Configured minimum unit price.
        min: f64,
        /// Configured maximum unit price.
        max: f64,
    },
}

/// One transport mode with its emission factor and display metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModeFactor {
    /// Mode identifier used as lookup key (e.g. `car`).
    pub mode: String,
    /// Emission factor in kg CO₂ per km.
    pub factor: f64,
    /// Human-readable Portuguese label for the UI.
    #[serde(default)]
    pub label: Option<String>,
    /// Icon shown next to the label.
    #[serde(default)]
    pub icon: Option<String>,
}

/// Ordered, read-only mapping from transport mode to emission factor.
///
/// Declaration order is preserved: it decides comparison tie-breaks.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmissionFactorTable {
    entries: Vec<ModeFactor>,
}

impl EmissionFactorTable {
    /// Build a table from mode entries, keeping their order.
    pub fn new(entries: Vec<ModeFactor>) -> Self {
        Self { entries }
    }

    /// Entries in declaration order.
    pub fn entries(&self) -> &[ModeFactor] {
        &self.entries
    }

    /// Emission factor for `mode`, or `None` for an unknown mode.
    pub fn factor(&self, mode: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|entry| entry.mode == mode)
            .map(|entry| entry.factor)
    }

    /// Display label for `mode`, falling back to the raw key.
    pub fn label<'a>(&'a self, mode: &'a str) -> &'a str {
        self.entries
            .iter()
            .find(|entry| entry.mode == mode)
            .and_then(|entry| entry.label.as_deref())
            .unwrap_or(mode)
    }

    /// Icon for `mode`, if configured.
    pub fn icon(&self, mode: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.mode == mode)
            .and_then(|entry| entry.icon.as_deref())
    }

    /// True when no modes are configured.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Constants for carbon credit estimation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CarbonCreditConfig {
    /// Mass of CO₂ (kg) represented by one credit.
    pub kg_per_credit: f64,
    /// Minimum unit price in BRL.
    pub price_min_brl: f64,
    /// Maximum unit price in BRL.
    pub price_max_brl: f64,
}

/// Top-level application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Simulated processing delay applied by the UI before rendering.
    pub processing_delay_ms: u64,
    /// Emission factor table.
    pub factors: EmissionFactorTable,
    /// Carbon credit constants.
    pub carbon_credit: CarbonCreditConfig,
    /// Optional JSON file with a custom route dataset; the built-in
    /// Brazilian routes are used when unset.
    #[serde(default)]
    pub routes_file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG_TOML, FileFormat::Toml))
            .build()
            .and_then(|settings| settings.try_deserialize())
            .expect("built-in default configuration must parse")
    }
}

impl AppConfig {
    /// Load configuration from the default file location plus
    /// `ECOTRIP_*` environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(default_config_path())
    }

    /// Load configuration layering defaults, the given file (when it
    /// exists) and environment overrides, then validate.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let settings = Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG_TOML, FileFormat::Toml))
            .add_source(File::from(path).required(false))
            .add_source(Environment::with_prefix("ECOTRIP"))
            .build()?;

        let config: AppConfig = settings.try_deserialize()?;
        config.validate()?;
        debug!(
            "configuration loaded ({} modes, source {})",
            config.factors.entries().len(),
            path.display()
        );
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for entry in self.factors.entries() {
            if entry.factor < 0.0 {
                return Err(ConfigError::NegativeFactor {
                    mode: entry.mode.clone(),
                    value: entry.factor,
                });
            }
        }

        let credit = &self.carbon_credit;
        if credit.kg_per_credit <= 0.0 {
            return Err(ConfigError::NonPositiveKgPerCredit(credit.kg_per_credit));
        }
        if credit.price_min_brl < 0.0 {
            return Err(ConfigError::NegativePrice {
                name: "price_min_brl",
                value: credit.price_min_brl,
            });
        }
        if credit.price_max_brl < 0.0 {
            return Err(ConfigError::NegativePrice {
                name: "price_max_brl",
                value: credit.price_max_brl,
            });
        }
        if credit.price_min_brl > credit.price_max_brl {
            return Err(ConfigError::InvertedPriceRange {
                min: credit.price_min_brl,
                max: credit.price_max_brl,
            });
        }

        Ok(())
    }
}

/// Default path of the user configuration file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR)
        .join(CONFIG_FILE)
}

/// Write the commented default configuration file when none exists,
/// returning its path.
pub fn ensure_default_config() -> Result<PathBuf> {
    let path = default_config_path();
    if path.exists() {
        return Ok(path);
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(&path, DEFAULT_CONFIG_TOML)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn default_config_parses_with_original_constants() {
        let config = AppConfig::default();
        assert_eq!(config.processing_delay_ms, 1500);
        assert_eq!(config.factors.factor("car"), Some(0.12));
        assert_eq!(config.factors.factor("bus"), Some(0.089));
        assert_eq!(config.factors.factor("bicycle"), Some(0.0));
        assert_eq!(config.factors.factor("truck"), Some(0.96));
        assert_eq!(config.factors.factor("spaceship"), None);
        assert_eq!(config.factors.label("car"), "Carro");
        assert_eq!(config.carbon_credit.kg_per_credit, 1000.0);
        assert_eq!(config.carbon_credit.price_min_brl, 50.0);
        assert_eq!(config.carbon_credit.price_max_brl, 150.0);
        assert!(config.routes_file.is_none());
    }

    #[test]
    fn factor_table_preserves_declaration_order() {
        let config = AppConfig::default();
        let modes: Vec<&str> = config
            .factors
            .entries()
            .iter()
            .map(|entry| entry.mode.as_str())
            .collect();
        assert_eq!(modes, vec!["bicycle", "car", "bus", "truck"]);
    }

    #[test]
    fn file_overrides_defaults() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("config.toml");
        fs::write(&path, "processing_delay_ms = 10\n")?;

        let config = AppConfig::load_from(&path)?;
        assert_eq!(config.processing_delay_ms, 10);
        // untouched sections keep their defaults
        assert_eq!(config.factors.factor("car"), Some(0.12));
        Ok(())
    }

    #[test]
    fn missing_file_falls_back_to_defaults() -> Result<(), ConfigError> {
        let config = AppConfig::load_from("/nonexistent/ecotrip.toml")?;
        assert_eq!(config, AppConfig::default());
        Ok(())
    }

    #[test]
    fn rejects_negative_emission_factor() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
[[factors]]
mode = "car"
factor = -0.5
"#,
        )?;

        let err = AppConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::NegativeFactor { .. }));
        Ok(())
    }

    #[test]
    fn rejects_inverted_price_range() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
[carbon_credit]
kg_per_credit = 1000.0
price_min_brl = 200.0
price_max_brl = 150.0
"#,
        )?;

        let err = AppConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::InvertedPriceRange { .. }));
        Ok(())
    }
}
