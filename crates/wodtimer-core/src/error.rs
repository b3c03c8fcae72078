//! Core error types for wodtimer-core.
//!
//! The timer itself never fails mid-session: everything that can go wrong is
//! either rejected up front (configuration) or swallowed and logged at the
//! side-effect boundary (wake-lock). The types here cover those two edges plus
//! the settings file.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for wodtimer-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// A timer configuration was rejected while building a session.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(#[from] ValidationError),

    /// Settings-file errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Settings-file errors.
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

    /// Key does not exist in the settings tree
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),

    /// The data directory could not be located or created
    #[error("Failed to access data directory: {0}")]
    DataDir(String),
}

/// Validation errors raised by the plan builder.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A numeric field is below its minimum
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },

    /// No discipline was selected before building
    #[error("No timer discipline selected")]
    MissingDiscipline,
}

impl ValidationError {
    pub(crate) fn below_minimum(field: &str, min: u32, got: u32) -> Self {
        ValidationError::InvalidValue {
            field: field.to_string(),
            message: format!("must be at least {min}, got {got}"),
        }
    }
}

/// Wake-lock acquisition failures. Never fatal to a session.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WakeLockError {
    /// The platform has no screen wake-lock capability
    #[error("Screen wake-lock is not supported on this platform")]
    Unsupported,

    /// The platform refused the request
    #[error("Screen wake-lock request denied: {0}")]
    Denied(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::ParseFailed(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_wraps_as_invalid_configuration() {
        let err: CoreError = ValidationError::below_minimum("rounds", 1, 0).into();
        assert!(matches!(err, CoreError::InvalidConfiguration(_)));
        assert_eq!(
            err.to_string(),
            "Invalid configuration: Invalid value for 'rounds': must be at least 1, got 0"
        );
    }

    #[test]
    fn wake_lock_errors_render() {
        assert_eq!(
            WakeLockError::Denied("battery saver".into()).to_string(),
            "Screen wake-lock request denied: battery saver"
        );
    }
}
