//! Configuration Store
//!
//! Loads the TOML config file and applies environment and CLI overrides on
//! top. Validation runs once, after every layer has been applied.

use crate::error::{CapdirError, Result};
use crate::query::SortKey;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Unified capdir configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Directory service connection
    #[serde(default)]
    pub backend: BackendConfig,

    /// Interactive view settings
    #[serde(default)]
    pub ui: UiConfig,

    /// Debug log settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl BackendConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiConfig {
    /// Seconds a feedback message stays visible
    #[serde(default = "default_dismiss_secs")]
    pub feedback_dismiss_secs: u64,

    /// Sort applied on startup. Clearing filters always returns to name
    /// ascending.
    #[serde(default = "default_sort")]
    pub default_sort: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            feedback_dismiss_secs: default_dismiss_secs(),
            default_sort: default_sort(),
        }
    }
}

impl UiConfig {
    pub fn feedback_dismiss_after(&self) -> Duration {
        Duration::from_secs(self.feedback_dismiss_secs)
    }

    pub fn default_sort_key(&self) -> SortKey {
        SortKey::parse(&self.default_sort)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// One of error, warn, info, debug, trace, off
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Directory for debug.log; the platform data dir when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            dir: None,
        }
    }
}

impl LoggingConfig {
    pub fn level_filter(&self) -> log::LevelFilter {
        self.level.parse().unwrap_or(log::LevelFilter::Info)
    }

    pub fn log_dir(&self) -> PathBuf {
        self.dir.clone().unwrap_or_else(super::get_data_dir)
    }
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_dismiss_secs() -> u64 {
    5
}

fn default_sort() -> String {
    SortKey::NameAsc.as_str().to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| CapdirError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = toml::from_str(&content).map_err(|e| CapdirError::ConfigParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok(config)
    }

    /// Load from the first standard location that exists, or defaults.
    ///
    /// A file that exists but does not parse is an error, not a silent
    /// fallback.
    pub fn load_or_default() -> Result<Self> {
        match super::find_config_file() {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Get default config file path
    pub fn default_path() -> Option<PathBuf> {
        super::get_config_dir().map(|d| d.join("config.toml"))
    }

    /// Apply `CAPDIR_BASE_URL` if set and non-empty.
    pub fn apply_env(&mut self) {
        if let Ok(url) = std::env::var(super::BASE_URL_ENV) {
            if !url.trim().is_empty() {
                self.backend.base_url = url.trim().to_string();
            }
        }
    }

    /// Apply a command-line base URL override.
    pub fn with_base_url(mut self, base_url: Option<String>) -> Self {
        if let Some(url) = base_url {
            self.backend.base_url = url;
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        let url = self.backend.base_url.trim();
        if url.is_empty() {
            return Err(CapdirError::InvalidConfig {
                message: "backend.base_url must not be empty".to_string(),
            });
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(CapdirError::InvalidConfig {
                message: format!("backend.base_url must be an http(s) URL, got {}", url),
            });
        }
        if self.backend.timeout_secs == 0 {
            return Err(CapdirError::InvalidConfig {
                message: "backend.timeout_secs must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}
