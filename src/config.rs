use std::time::Duration;
use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::currency::Currency;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_retry_limit")]
    pub retry_limit: u32,
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            base_url: "http://api.evp.lt".to_string(),
            timeout_secs: default_timeout_secs(),
            retry_limit: default_retry_limit(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,
    #[serde(default = "default_decimal_separator")]
    pub decimal_separator: char,
    #[serde(default = "default_available_currencies")]
    pub available_currencies: Vec<Currency>,
    #[serde(default = "default_from_currency")]
    pub from_currency: Currency,
    #[serde(default = "default_to_currency")]
    pub to_currency: Currency,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            api: ApiConfig::default(),
            refresh_interval_secs: default_refresh_interval_secs(),
            decimal_separator: default_decimal_separator(),
            available_currencies: default_available_currencies(),
            from_currency: default_from_currency(),
            to_currency: default_to_currency(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_retry_limit() -> u32 {
    1
}

fn default_refresh_interval_secs() -> u64 {
    10
}

fn default_decimal_separator() -> char {
    '.'
}

fn default_available_currencies() -> Vec<Currency> {
    Currency::ALL.to_vec()
}

fn default_from_currency() -> Currency {
    Currency::Eur
}

fn default_to_currency() -> Currency {
    Currency::Usd
}

impl AppConfig {
    /// Loads the config from the default location, falling back to built-in
    /// defaults when no file exists.
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!("No config file found, using defaults");
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("io", "fxwatch", "fxwatch")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    /// The configured subset of the catalog, in catalog order.
    pub fn available_currencies(&self) -> Vec<Currency> {
        Currency::available(&self.available_currencies)
    }
}
