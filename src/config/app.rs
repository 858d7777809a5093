//! Application configuration loading from config.toml
//!
//! Every section and field is optional; anything left out falls back to the
//! defaults below. A missing file means "all defaults", a malformed file is an error.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::{path::Path, time::Duration};
use tracing::{debug, info};

/// Environment variable that overrides the config file location
pub const CONFIG_PATH_ENV: &str = "EXPENSEWISE_CONFIG";

const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Record Store behaviour
    pub store: StoreConfig,
    /// PIN storage
    pub security: SecurityConfig,
    /// Budget alerting
    pub budget: BudgetConfig,
    /// Export formatting
    pub export: ExportConfig,
}

/// `[store]` section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Seconds a remote write may take before it is reported as failed
    pub write_timeout_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            write_timeout_secs: 10,
        }
    }
}

impl StoreConfig {
    /// Write timeout as a [`Duration`].
    #[must_use]
    pub const fn write_timeout(&self) -> Duration {
        Duration::from_secs(self.write_timeout_secs)
    }
}

/// Hash format used when a new PIN hash is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PinHashScheme {
    /// 32-bit rolling hash, compatible with existing installations
    #[default]
    Legacy,
    /// Salted Argon2id PHC string
    Argon2,
}

/// `[security]` section
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Scheme for newly written PIN hashes
    pub pin_hash_scheme: PinHashScheme,
}

/// `[budget]` section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BudgetConfig {
    /// Percentage of the limit at which the "approaching" alert fires
    pub near_limit_percent: u32,
}

impl Default for BudgetConfig {
    fn default() -> Self {
        Self {
            near_limit_percent: 80,
        }
    }
}

/// `[export]` section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Title printed at the top of exported documents
    pub app_name: String,
    /// Currency symbol used in exported documents
    pub currency_symbol: String,
    /// Table rows per document page
    pub rows_per_page: usize,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            app_name: "ExpenseWise".to_string(),
            currency_symbol: "₹".to_string(),
            rows_per_page: 25,
        }
    }
}

/// Loads application configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - A field has the wrong type
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path_ref = path.as_ref();
    debug!("Loading configuration from {}", path_ref.display());
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path_ref.display()),
    })?;

    parse_config(&contents)
}

/// Parses configuration from TOML text.
pub fn parse_config(contents: &str) -> Result<AppConfig> {
    let config: AppConfig = toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })?;

    if config.store.write_timeout_secs == 0 {
        return Err(Error::Config {
            message: "store.write_timeout_secs must be at least 1".to_string(),
        });
    }
    if config.export.rows_per_page == 0 {
        return Err(Error::Config {
            message: "export.rows_per_page must be at least 1".to_string(),
        });
    }

    Ok(config)
}

/// Loads configuration from `$EXPENSEWISE_CONFIG` or `./config.toml`.
///
/// A missing file is not an error: defaults are used instead.
pub fn load_default_config() -> Result<AppConfig> {
    let path =
        std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    if Path::new(&path).exists() {
        load_config(&path)
    } else {
        info!("No configuration file at {path}, using defaults");
        Ok(AppConfig::default())
    }
}
