//! TOML configuration for the console (`instabot.toml`)
//!
//! Every field has a default, so the file itself is optional. Values are
//! layered in this order, later wins:
//!
//! 1. built-in defaults
//! 2. `instabot.toml`
//! 3. environment (`INSTABOT_API_URL`, `INSTABOT_TOKEN_PATH`, `INSTABOT_LOG`),
//!    including variables loaded from `.env`
//! 4. command line flags
//!
//! ```toml
//! [api]
//! base_url = "https://instagram-chatbot-platform.onrender.com/api"
//! timeout_secs = 30
//!
//! [storage]
//! token_path = ".instabot/session.json"
//!
//! [logging]
//! level = "warn"
//! format = "pretty"
//! ```

use crate::types::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable overriding `api.base_url`.
pub const ENV_API_URL: &str = "INSTABOT_API_URL";
/// Environment variable overriding `storage.token_path`.
pub const ENV_TOKEN_PATH: &str = "INSTABOT_TOKEN_PATH";
/// Environment variable overriding `logging.level`.
pub const ENV_LOG: &str = "INSTABOT_LOG";

/// Root configuration loaded from `instabot.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleConfig {
    /// `[api]`
    #[serde(default)]
    pub api: ApiConfig,

    /// `[storage]`
    #[serde(default)]
    pub storage: StorageConfig,

    /// `[logging]`
    #[serde(default)]
    pub logging: LoggingConfig,
}

// ============= API Configuration =============

/// Backend connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Backend base URL, `/api` suffix included
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout; none when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

fn default_base_url() -> String {
    "https://instagram-chatbot-platform.onrender.com/api".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: None,
        }
    }
}

// ============= Storage Configuration =============

/// Where the session token is kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// File holding the session token
    #[serde(default = "default_token_path")]
    pub token_path: PathBuf,
}

fn default_token_path() -> PathBuf {
    PathBuf::from(".instabot/session.json")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            token_path: default_token_path(),
        }
    }
}

// ============= Logging Configuration =============

/// Log line format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable compact lines
    #[default]
    Pretty,
    /// One JSON object per line
    Json,
}

/// Log level and format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format
    #[serde(default)]
    pub format: LogFormat,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

impl ConsoleConfig {
    /// Load configuration from a TOML file.
    ///
    /// A missing file yields the defaults unless `required` is set.
    pub fn load<P: AsRef<Path>>(path: P, required: bool) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            if required {
                return Err(AppError::Config(format!(
                    "Configuration file not found: {}",
                    path.display()
                )));
            }
            debug!(path = %path.display(), "No configuration file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let config: ConsoleConfig = toml::from_str(&content).map_err(|e| {
            AppError::Config(format!("Failed to parse {}: {}", path.display(), e))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load `path`, then `.env`, then apply environment overrides.
    pub fn from_env_and_file<P: AsRef<Path>>(path: P, required: bool) -> Result<Self> {
        dotenvy::dotenv().ok();

        let mut config = Self::load(path, required)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides looked up by variable name; empty values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = get(ENV_API_URL) {
            self.api.base_url = url;
        }
        if let Some(path) = get(ENV_TOKEN_PATH) {
            self.storage.token_path = PathBuf::from(path);
        }
        if let Some(level) = get(ENV_LOG) {
            self.logging.level = level;
        }
    }

    /// Check values the backend client cannot work without.
    pub fn validate(&self) -> Result<()> {
        let url = self.api.base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(AppError::Config(format!(
                "api.base_url must be an http(s) URL, got '{}'",
                self.api.base_url
            )));
        }
        if self.api.timeout_secs == Some(0) {
            return Err(AppError::Config(
                "api.timeout_secs must be greater than zero".to_string(),
            ));
        }
        if self.storage.token_path.as_os_str().is_empty() {
            return Err(AppError::Config(
                "storage.token_path must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
