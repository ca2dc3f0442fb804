//! Service settings loaded from config.toml
//!
//! Every key is optional; a missing file or section falls back to the
//! built-in defaults (coach share 60%, dues window one week, port 3001).

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Longest look-ahead accepted for the upcoming-dues report.
pub const MAX_UPCOMING_WINDOW_DAYS: i64 = 3650;

/// Environment variable that overrides the config file location.
pub const CONFIG_PATH_ENV: &str = "ACADEMICO_CONFIG";

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP listener settings
    pub server: ServerConfig,
    /// Ledger defaults
    pub ledger: LedgerConfig,
}

/// `[server]` section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address the REST surface binds to
    pub bind_address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:3001".to_string(),
        }
    }
}

/// `[ledger]` section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Coach share used when a payment cannot be attributed to a coach
    pub default_share_percentage: f64,
    /// How many days ahead the upcoming-dues report looks
    pub upcoming_window_days: i64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            default_share_percentage: 60.0,
            upcoming_window_days: 7,
        }
    }
}

impl AppConfig {
    /// Checks the values that the ledger relies on being in range.
    pub fn validate(&self) -> Result<()> {
        let share = self.ledger.default_share_percentage;
        if !(0.0..=100.0).contains(&share) {
            return Err(Error::Config {
                message: format!("default_share_percentage must be within 0-100, got {share}"),
            });
        }
        let window = self.ledger.upcoming_window_days;
        if !(0..=MAX_UPCOMING_WINDOW_DAYS).contains(&window) {
            return Err(Error::Config {
                message: format!(
                    "upcoming_window_days must be within 0-{MAX_UPCOMING_WINDOW_DAYS}, got {window}"
                ),
            });
        }
        Ok(())
    }
}

/// Parses and validates configuration from a TOML string.
pub fn parse_config(contents: &str) -> Result<AppConfig> {
    let config: AppConfig = toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })?;
    config.validate()?;
    Ok(config)
}

/// Loads configuration from a TOML file.
///
/// A file that does not exist yields [`AppConfig::default`]; a file that exists
/// but cannot be read or parsed is an error.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path = path.as_ref();
    if !path.exists() {
        tracing::info!("No config file at {}, using defaults", path.display());
        return Ok(AppConfig::default());
    }

    tracing::debug!("Loading configuration from {}", path.display());
    let contents = std::fs::read_to_string(path).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path.display()),
    })?;
    parse_config(&contents)
}

/// Loads configuration from `$ACADEMICO_CONFIG`, or ./config.toml when unset.
pub fn load_default_config() -> Result<AppConfig> {
    let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| "config.toml".to_string());
    load_config(path)
}
