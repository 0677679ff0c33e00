//! Configuration management
//!
//! TOML configuration for capdir. All configuration types are exported from
//! this module.

pub mod store;

pub use store::{BackendConfig, Config, LoggingConfig, UiConfig};

use std::path::PathBuf;

/// File name looked up in the working directory before the config dir.
pub const LOCAL_CONFIG_FILE: &str = "capdir.toml";

/// Environment variable that overrides `[backend] base_url`.
pub const BASE_URL_ENV: &str = "CAPDIR_BASE_URL";

/// Find the configuration file in standard locations
pub fn find_config_file() -> Option<PathBuf> {
    if let Ok(cwd) = std::env::current_dir() {
        let path = cwd.join(LOCAL_CONFIG_FILE);
        if path.exists() {
            return Some(path);
        }
    }

    if let Some(dir) = get_config_dir() {
        let path = dir.join("config.toml");
        if path.exists() {
            return Some(path);
        }
    }

    None
}

/// Get the configuration directory path
pub fn get_config_dir() -> Option<PathBuf> {
    use dirs::config_dir;
    use home::home_dir;

    if let Some(dir) = config_dir() {
        return Some(dir.join("capdir"));
    }

    if let Some(home) = home_dir() {
        return Some(home.join(".config").join("capdir"));
    }

    None
}

/// Where `debug.log` goes when the config does not say otherwise
pub fn get_data_dir() -> PathBuf {
    dirs::data_dir()
        .or_else(|| home::home_dir().map(|h| h.join(".local").join("share")))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("capdir")
}
