//! # Configuration Management Module
//!
//! Tinkertales reads a single TOML file (default `config.toml`) organized into
//! sections:
//!
//! - [`GeneralConfig`] - community name, data directory, fuzzy threshold, session price
//! - [`SecretsConfig`] - the Telegram bot token
//! - [`TelegramConfig`] - Bot API endpoint and polling timeouts
//! - [`LoggingConfig`] - log level and optional log file
//!
//! ## Usage
//!
//! ```rust,no_run
//! use tinkertales::config::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.toml").await?;
//!     println!("Data dir: {}", config.general.data_dir());
//!     Config::create_default("config.toml").await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration File Format
//!
//! ```toml
//! [general]
//! community_name = "Tinkertales"
//! data_dir = "./data"
//! lv_threshold = 80
//! session_price = 30
//!
//! [secrets]
//! token = "123456:ABC..."
//! ```
//!
//! `lv_threshold` and `data_dir` may be omitted; their defaults are logged
//! when the file is loaded.

use anyhow::{anyhow, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::ledger::{DEFAULT_LV_THRESHOLD, DEFAULT_SESSION_PRICE};

pub const DEFAULT_DATA_DIR: &str = "./data";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Name used in balance replies ("Your Tinkertales balance is ...").
    #[serde(default = "default_community_name")]
    pub community_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<String>,
    /// Minimum fuzzy score (0-100) for an item name to alias an existing item.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lv_threshold: Option<u8>,
    #[serde(default = "default_session_price")]
    pub session_price: i64,
}

fn default_community_name() -> String {
    "Tinkertales".to_string()
}

fn default_session_price() -> i64 {
    DEFAULT_SESSION_PRICE
}

impl GeneralConfig {
    pub fn data_dir(&self) -> &str {
        self.data_dir.as_deref().unwrap_or(DEFAULT_DATA_DIR)
    }

    pub fn lv_threshold(&self) -> u8 {
        self.lv_threshold.unwrap_or(DEFAULT_LV_THRESHOLD)
    }
}

/// A missing `[general]` section leaves the optional keys unset so the
/// defaults get reported on load.
fn unset_general() -> GeneralConfig {
    GeneralConfig {
        data_dir: None,
        lv_threshold: None,
        ..GeneralConfig::default()
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            community_name: default_community_name(),
            data_dir: Some(DEFAULT_DATA_DIR.to_string()),
            lv_threshold: Some(DEFAULT_LV_THRESHOLD),
            session_price: DEFAULT_SESSION_PRICE,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SecretsConfig {
    #[serde(default)]
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Long-poll duration passed to getUpdates.
    #[serde(default = "default_poll_timeout")]
    pub poll_timeout_seconds: u64,
    /// Client-side cap on a single HTTP request; must exceed the poll timeout.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

fn default_api_base() -> String {
    "https://api.telegram.org".to_string()
}

fn default_poll_timeout() -> u64 {
    30
}

fn default_request_timeout() -> u64 {
    40
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            poll_timeout_seconds: default_poll_timeout(),
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub file: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: Some("tinkertales.log".to_string()),
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "unset_general")]
    pub general: GeneralConfig,
    #[serde(default)]
    pub secrets: SecretsConfig,
    #[serde(default)]
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a file
    pub async fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| anyhow!("Failed to read config file {}: {}", path, e))?;

        let config = Self::from_toml(&content)
            .map_err(|e| anyhow!("Failed to parse config file {}: {}", path, e))?;

        if config.general.lv_threshold.is_none() {
            warn!(
                "lv_threshold not specified in {}; defaulting to {}",
                path, DEFAULT_LV_THRESHOLD
            );
        }
        if config.general.data_dir.is_none() {
            warn!(
                "data_dir not specified in {}; defaulting to {}",
                path, DEFAULT_DATA_DIR
            );
        }

        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make command handling meaningless.
    pub fn validate(&self) -> Result<()> {
        if let Some(threshold) = self.general.lv_threshold {
            if threshold > 100 {
                return Err(anyhow!(
                    "general.lv_threshold must be between 0 and 100 (got {})",
                    threshold
                ));
            }
        }
        if self.general.session_price <= 0 {
            return Err(anyhow!(
                "general.session_price must be positive (got {})",
                self.general.session_price
            ));
        }
        if self.telegram.request_timeout_seconds <= self.telegram.poll_timeout_seconds {
            return Err(anyhow!(
                "telegram.request_timeout_seconds must exceed poll_timeout_seconds"
            ));
        }
        Ok(())
    }

    /// Checks needed only when actually talking to Telegram.
    pub fn validate_for_start(&self) -> Result<()> {
        if self.secrets.token.trim().is_empty() {
            return Err(anyhow!("secrets.token is empty; set your bot token first"));
        }
        Ok(())
    }

    /// Create a default configuration file
    pub async fn create_default(path: &str) -> Result<()> {
        let config = Config::default();
        let content = toml::to_string_pretty(&config)
            .map_err(|e| anyhow!("Failed to serialize default config: {}", e))?;

        fs::write(path, content)
            .await
            .map_err(|e| anyhow!("Failed to write config file {}: {}", path, e))?;

        Ok(())
    }
}
