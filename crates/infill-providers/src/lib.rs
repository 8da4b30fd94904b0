//! Inference-server providers for infill
//!
//! Each supported inference server speaks its own wire protocol: request
//! path, request-body schema and streaming chunk schema all differ. This
//! crate maps an abstract provider identifier onto those concrete shapes and
//! drives the streaming read loop under cooperative cancellation.
//!
//! The adapter never guesses: an unknown provider identifier is a
//! configuration error, not a fallback.

pub mod adapter;
pub mod error;
pub mod stream;

pub use adapter::{Endpoint, GenerationParams, Provider, StreamRequest};
pub use error::ProviderError;
pub use stream::{stream_lines, ChunkAction, StreamEnd};
