//! In-memory cache implementation

use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use tracing::debug;

/// Cache key: the exact text surrounding the cursor
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    prefix: String,
    suffix: String,
}

/// Snapshot of cache counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

/// Session-lifetime completion cache
///
/// Writes are last-writer-wins per key. Growth is unbounded; the host clears
/// the cache when it wants to reclaim memory or invalidate stale results.
#[derive(Debug, Default)]
pub struct CompletionCache {
    entries: DashMap<CacheKey, String>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl CompletionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the completion previously produced for this context
    pub fn get(&self, prefix: &str, suffix: &str) -> Option<String> {
        let key = CacheKey {
            prefix: prefix.to_string(),
            suffix: suffix.to_string(),
        };
        match self.entries.get(&key) {
            Some(entry) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                debug!(entries = self.entries.len(), "completion cache hit");
                Some(entry.value().clone())
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Store the final formatted completion for this context
    pub fn insert(&self, prefix: &str, suffix: &str, completion: &str) {
        let key = CacheKey {
            prefix: prefix.to_string(),
            suffix: suffix.to_string(),
        };
        self.entries.insert(key, completion.to_string());
    }

    /// Drop every cached entry
    pub fn clear(&self) {
        self.entries.clear();
        debug!("completion cache cleared");
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Current counter values
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.entries.len(),
        }
    }
}
