//! Error types for the completion engine

use thiserror::Error;

/// Errors a completion request can fail with
///
/// None of these reach the editor user as a dialog: every failure surfaces
/// as "no suggestion", and the status indicator carries the alert.
#[derive(Debug, Error)]
pub enum CompletionError {
    /// The configuration snapshot is unusable
    #[error("Configuration error: {0}")]
    Config(#[from] infill_config::ConfigError),

    /// Request shaping or transport failed
    #[error(transparent)]
    Provider(#[from] infill_providers::ProviderError),
}
