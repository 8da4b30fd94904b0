//! Error types for configuration handling

use thiserror::Error;

/// Errors raised while validating a configuration snapshot
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    /// A required setting is missing or empty
    #[error("Missing required setting: {0}")]
    MissingSetting(&'static str),

    /// A setting holds a value outside its accepted range
    #[error("Invalid value for {setting}: {reason}")]
    InvalidValue {
        setting: &'static str,
        reason: String,
    },
}
