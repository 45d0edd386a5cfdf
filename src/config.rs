//! Optional TOML configuration
//!
//! Every key has a default, so running without a config file downloads
//! S&P 500 and MSCI World adjusted closes since 1900-01-01.

use anyhow::Context;
use chrono::NaiveDate;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::{PriceError, Result};
use crate::series::{PriceField, SeriesDefinition};

const CONFIG_DIR: &str = "index-prices";
const CONFIG_FILENAME: &str = "config.toml";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// First date requested from the provider (inclusive)
    pub start: NaiveDate,
    pub price_field: PriceField,
    /// HTTP request timeout in seconds
    pub timeout_secs: u64,
    /// Series to download, in output column order
    pub series: Vec<SeriesDefinition>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            start: default_start(),
            price_field: PriceField::default(),
            timeout_secs: 30,
            series: SeriesDefinition::defaults(),
        }
    }
}

fn default_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(1900, 1, 1).unwrap_or_default()
}

impl Config {
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)
            .map_err(|e| PriceError::Config(format!("parse config TOML: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, the default location is
    /// used when a file is there, otherwise built-in defaults apply. A file
    /// picked up implicitly is logged at warn level since it changes the
    /// output without any flag saying so.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => {
                info!("Loading config from {:?}", p);
                p.to_path_buf()
            }
            None => match discover() {
                Some(p) => {
                    warn!("Using config file found at {:?}", p);
                    p
                }
                None => {
                    debug!("No config file found, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("Invalid config file {}", path.display()))
    }

    fn validate(&self) -> Result<()> {
        if self.series.is_empty() {
            return Err(PriceError::Config("at least one series is required".into()).into());
        }
        for def in &self.series {
            if def.symbol.trim().is_empty() {
                return Err(PriceError::Config(format!("series '{}' has an empty symbol", def.label)).into());
            }
            if def.label.trim().is_empty() {
                return Err(PriceError::Config(format!("series {} has an empty label", def.symbol)).into());
            }
        }
        if self.timeout_secs == 0 {
            return Err(PriceError::Config("timeout_secs must be positive".into()).into());
        }
        Ok(())
    }
}

/// Default config file, if one exists
pub fn discover() -> Option<PathBuf> {
    default_config_path().filter(|p| p.is_file())
}

/// `$XDG_CONFIG_HOME/index-prices/config.toml`, or the platform config home
pub fn default_config_path() -> Option<PathBuf> {
    std::env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(dir_spec::config_home)
        .map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILENAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_match_index_pair() {
        let config = Config::default();
        assert_eq!(config.start, NaiveDate::from_ymd_opt(1900, 1, 1).unwrap());
        assert_eq!(config.price_field, PriceField::AdjustedClose);
        assert_eq!(config.series, SeriesDefinition::defaults());
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml("price_field = \"close\"\n").unwrap();
        assert_eq!(config.price_field, PriceField::Close);
        assert_eq!(config.series.len(), 2);
        assert_eq!(config.start, default_start());
    }

    #[test]
    fn test_series_list_replaces_defaults() {
        let toml = r#"
start = "2000-01-01"

[[series]]
symbol = "^STOXX50E"
label = "Euro Stoxx 50"
"#;
        let config = Config::from_toml(toml).unwrap();
        assert_eq!(config.start, NaiveDate::from_ymd_opt(2000, 1, 1).unwrap());
        assert_eq!(config.series, vec![SeriesDefinition::new("^STOXX50E", "Euro Stoxx 50")]);
    }

    #[test]
    fn test_invalid_configs_are_rejected() {
        assert!(Config::from_toml("series = []").is_err());
        assert!(Config::from_toml("timeout_secs = 0").is_err());
        assert!(Config::from_toml("unknown_key = 1").is_err());
        assert!(Config::from_toml("[[series]]\nsymbol = \"\"\nlabel = \"X\"\n").is_err());
    }

    #[test]
    fn test_load_explicit_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.toml");
        fs::write(&path, "timeout_secs = 5\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.timeout_secs, 5);

        assert!(Config::load(Some(&dir.path().join("missing.toml"))).is_err());
    }
}
