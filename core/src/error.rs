//! Structured error types for capdir
//!
//! Separates transport failures (the backend could not be reached or spoke
//! garbage) from application failures (the backend answered and said no),
//! plus the configuration errors raised before any request.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Primary error type for capdir operations
#[derive(Error, Debug)]
pub enum CapdirError {
    // =========================================================================
    // Transport Errors
    // =========================================================================
    /// Request could not be sent or the connection dropped
    #[error("HTTP error: {0}")]
    Http(String),

    /// No response within the configured timeout
    #[error("request timed out after {duration:?}")]
    Timeout { duration: Duration },

    /// Response body was not the JSON shape we expected
    #[error("malformed response: {0}")]
    Decode(String),

    // =========================================================================
    // Application Errors
    // =========================================================================
    /// Backend answered with a non-success status
    #[error("backend returned {status}: {detail}")]
    Status { status: u16, detail: String },

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid configuration value
    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Config file could not be read or written
    #[error("config file {path}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for our schema
    #[error("config file {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },
}

impl CapdirError {
    /// True when the backend was never heard from properly.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Http(_) | Self::Timeout { .. } | Self::Decode(_)
        )
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::Status { detail, .. } => detail.clone(),
            Self::Timeout { .. } => "The directory service did not respond in time.".to_string(),
            Self::Http(_) | Self::Decode(_) => {
                "Could not reach the directory service.".to_string()
            }
            _ => self.to_string(),
        }
    }
}

impl From<reqwest::Error> for CapdirError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Http(err.to_string())
        }
    }
}

impl From<serde_json::Error> for CapdirError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

/// Result type alias using CapdirError
pub type Result<T> = std::result::Result<T, CapdirError>;
