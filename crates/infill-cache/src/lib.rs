//! Completion result cache
//!
//! Maps an exact `(prefix, suffix)` cursor context to the final formatted
//! completion produced for it, so retyping into an identical context skips
//! the network round trip entirely. Entries live for the editor session; the
//! host may clear the cache at any time.

pub mod cache;

pub use cache::{CacheStats, CompletionCache};
