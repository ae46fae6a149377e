//! In-memory cache of provider results keyed by exact query text.
//!
//! Uses [`moka`] for async-friendly storage with an LRU capacity bound.
//! Freshness is decided here rather than by moka: an entry is expired once
//! `now - inserted_at >= ttl`, measured on tokio's clock, and is never
//! returned after that point.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use moka::future::Cache;
use tokio::time::Instant;

use crate::config::SearchConfig;
use crate::types::RawResult;

/// A cached provider response.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub query_text: String,
    pub results: Arc<Vec<RawResult>>,
    pub inserted_at: Instant,
}

impl CacheEntry {
    fn is_expired(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.inserted_at) >= ttl
    }
}

/// Snapshot of cache counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: u64,
}

/// Short-TTL result cache shared across lookups.
///
/// A TTL of zero disables the cache: every lookup misses and inserts are
/// dropped.
#[derive(Debug)]
pub struct ResultCache {
    ttl: Duration,
    entries: Cache<String, CacheEntry>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl ResultCache {
    /// Create a cache holding at most `max_entries` queries for `ttl`.
    pub fn new(ttl: Duration, max_entries: u64) -> Self {
        let mut builder = Cache::builder().max_capacity(max_entries);
        if !ttl.is_zero() {
            // Backstop eviction; freshness is still checked on every get.
            builder = builder.time_to_live(ttl);
        }
        Self {
            ttl,
            entries: builder.build(),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn from_config(config: &SearchConfig) -> Self {
        Self::new(config.cache_ttl(), config.cache_max_entries)
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Look up fresh results for `query_text`.
    ///
    /// Expired entries are removed and reported as a miss.
    pub async fn get(&self, query_text: &str) -> Option<Arc<Vec<RawResult>>> {
        if self.ttl.is_zero() {
            self.misses.fetch_add(1, Ordering::Relaxed);
            return None;
        }

        match self.entries.get(query_text).await {
            Some(entry) if !entry.is_expired(Instant::now(), self.ttl) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(entry.results)
            }
            Some(_) => {
                self.entries.invalidate(query_text).await;
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Store `results` for `query_text`, replacing any existing entry.
    pub async fn put(&self, query_text: &str, results: impl Into<Arc<Vec<RawResult>>>) {
        if self.ttl.is_zero() {
            return;
        }
        let entry = CacheEntry {
            query_text: query_text.to_string(),
            results: results.into(),
            inserted_at: Instant::now(),
        };
        self.entries.insert(entry.query_text.clone(), entry).await;
    }

    /// Drop every entry. Counters are kept.
    pub fn invalidate_all(&self) {
        self.entries.invalidate_all();
    }

    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits(),
            misses: self.misses(),
            entries: self.entries.entry_count(),
        }
    }
}
