//! infill completion engine
//!
//! Turns a cursor position inside a source file into a single accepted text
//! insertion, sourced from a locally or remotely hosted inference server.
//!
//! # Architecture
//!
//! A completion request flows through five stages:
//!
//! 1. **Context**: prefix/suffix windows around the cursor, optionally
//!    augmented with related open files ranked by path similarity
//! 2. **Prompt**: a fill-in-the-middle prompt rendered by the model-specific
//!    template, together with its stop-sequence list
//! 3. **Cache**: an exact `(prefix, suffix)` hit skips the network entirely
//! 4. **Stream**: the provider-shaped request is opened and consumed chunk by
//!    chunk under stopping heuristics and cooperative cancellation
//! 5. **Format**: the raw model text is balanced, deduplicated against the
//!    document, and trimmed into a safe insertion
//!
//! The [`CompletionEngine`] owns the request lifecycle: triggers are
//! debounced, at most one stream is in flight per engine, and a newer trigger
//! cancels whatever came before it.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use infill_completion::{CompletionEngine, CompletionRequest, DocumentSnapshot, Position, TriggerKind};
//! use infill_config::CompletionConfig;
//!
//! let engine = Arc::new(CompletionEngine::new(CompletionConfig::default()));
//! let request = CompletionRequest {
//!     document: DocumentSnapshot::new("src/main.rs", "rust", "fn main() {\n    \n}"),
//!     position: Position { line: 1, character: 4 },
//!     trigger: TriggerKind::Invoked,
//!     open_documents: vec![],
//! };
//! let result = engine.complete(request).await;
//! ```

pub mod context;
pub mod engine;
pub mod error;
pub mod format;
pub mod language;
pub mod similarity;
pub mod template;
pub mod types;

pub use engine::{CompletionEngine, EngineStatus};
pub use error::CompletionError;
pub use format::{format_completion, strip_stop_sequences, FormatOptions};
pub use language::LanguageInfo;
pub use template::{FimPrompt, FimTemplate, TemplateInputs};
pub use types::{
    CompletionRequest, CompletionResult, CursorContext, DocumentSnapshot, Position, TriggerKind,
};
