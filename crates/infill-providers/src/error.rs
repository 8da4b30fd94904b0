//! Error types for the providers crate

use thiserror::Error;

/// Errors raised while shaping requests or consuming a stream
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// The configured provider identifier matches no supported protocol
    #[error("Unknown provider: {0}")]
    UnknownProvider(String),

    /// Connection refused, reset or timed out
    #[error("Network error: {0}")]
    Network(String),

    /// The server answered with a non-success status
    #[error("Server returned HTTP {status}")]
    Http { status: u16 },

    /// A stream chunk did not match the provider's schema
    #[error("Failed to decode stream chunk: {0}")]
    Decode(String),

    /// A request body could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for ProviderError {
    fn from(err: serde_json::Error) -> Self {
        ProviderError::Serialization(err.to_string())
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        ProviderError::Network(err.to_string())
    }
}
