//! Configuration for the infill completion engine
//!
//! The engine consumes an immutable [`CompletionConfig`] snapshot. The editor
//! host owns the settings store; whenever a setting changes it builds a fresh
//! snapshot and hands it to the engine wholesale via `update_config`. Nothing
//! here is mutated field-by-field while a completion request is live.

pub mod error;
pub mod types;

pub use error::ConfigError;
pub use types::CompletionConfig;
