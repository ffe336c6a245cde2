//! Configuration management for babycare.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Directory name under the platform config and data directories.
const APP_DIR_NAME: &str = "babycare";

/// Default database file name.
const DATABASE_FILE_NAME: &str = "babycare.db";

/// Prefix for environment overrides, e.g. `BABYCARE_RECORDS__LIST_LIMIT`.
/// Sections and keys are separated by a double underscore.
const ENV_PREFIX: &str = "BABYCARE_";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `BABYCARE_`)
/// 2. TOML config file at `~/.config/babycare/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Record listing configuration.
    pub records: RecordsConfig,
    /// Feeding goals.
    pub feeding: FeedingConfig,
}

/// Storage-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the database file.
    /// Defaults to `~/.local/share/babycare/babycare.db`
    pub database_path: Option<PathBuf>,
}

/// Record listing configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordsConfig {
    /// Number of records shown by `records list` when `--limit` is absent.
    pub list_limit: usize,
}

/// Feeding goals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedingConfig {
    /// Daily milk target in millilitres, used by summaries.
    pub daily_milk_target_ml: f64,
}

impl Default for RecordsConfig {
    fn default() -> Self {
        Self { list_limit: 20 }
    }
}

impl Default for FeedingConfig {
    fn default() -> Self {
        Self {
            daily_milk_target_ml: 800.0,
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading, parsing, or validation fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// A missing config file is not an error; defaults and environment
    /// variables still apply.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading, parsing, or validation fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let config: Config = Self::figment(&config_file).extract()?;
        config.validate()?;
        Ok(config)
    }

    fn figment(config_file: &std::path::Path) -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(config_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(APP_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(APP_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigValidation`] if any value is out of range.
    pub fn validate(&self) -> Result<()> {
        if self.records.list_limit == 0 {
            return Err(Error::ConfigValidation {
                message: "records.list_limit must be greater than 0".to_string(),
            });
        }

        let target = self.feeding.daily_milk_target_ml;
        if !(target.is_finite() && target > 0.0) {
            return Err(Error::ConfigValidation {
                message: format!(
                    "feeding.daily_milk_target_ml must be a positive number, got {target}"
                ),
            });
        }

        if let Some(path) = &self.storage.database_path {
            if path.as_os_str().is_empty() {
                return Err(Error::ConfigValidation {
                    message: "storage.database_path must not be empty".to_string(),
                });
            }
        }

        Ok(())
    }

    /// Get the database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }

    /// Render the effective configuration as TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::ConfigValidation {
            message: format!("cannot render configuration: {e}"),
        })
    }
}
