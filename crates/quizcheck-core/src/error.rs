//! Core error types for quizcheck-core.
//!
//! Only loading the quiz source and reading configuration can fail.
//! Structural problems in a quiz are findings, never errors.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for quizcheck-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Quiz source could not be loaded
    #[error("Load error: {0}")]
    Load(#[from] LoadError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised while reading a quiz source file.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The file does not exist
    #[error("Quiz source not found: {path}")]
    NotFound { path: PathBuf },

    /// The file exists but could not be read
    #[error("Failed to read quiz source {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid UTF-8 text
    #[error("Quiz source {path} is not valid UTF-8 text")]
    NotUtf8 { path: PathBuf },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::ParseFailed(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
