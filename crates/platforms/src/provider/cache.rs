//! Status cache shared by every provider adapter.
//!
//! Entries are keyed by `(service, user)` and carry the instant they were
//! fetched. Entries older than the TTL read as a miss but are left in place;
//! the next successful fetch overwrites them.

use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::trace;

use crate::media::StreamerStatus;

/// Default freshness window (5 minutes).
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

type CacheKey = (String, String);

#[derive(Clone)]
struct CacheEntry {
    status: StreamerStatus,
    fetched_at: Instant,
}

impl CacheEntry {
    fn age(&self) -> Duration {
        self.fetched_at.elapsed()
    }
}

/// Thread-safe cache of the last successful fetch per `(service, user)`.
///
/// Concurrent renders may race on the same key; the last `put` wins. A stale
/// overwrite only means a later render fetches again.
#[derive(Clone)]
pub struct StatusCache {
    entries: Arc<DashMap<CacheKey, CacheEntry>>,
    ttl: Duration,
}

impl StatusCache {
    /// Create a new cache with default TTL.
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_TTL)
    }

    /// Create a new cache with specified TTL.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Get the cached status for a channel together with its age.
    ///
    /// Returns None if not cached or older than the TTL.
    pub fn get(&self, service: &str, user: &str) -> Option<(StreamerStatus, Duration)> {
        let key = (service.to_owned(), user.to_owned());
        let entry = self.entries.get(&key)?;

        let age = entry.age();
        if age >= self.ttl {
            trace!(service, user, ?age, "cached status is stale");
            return None;
        }

        Some((entry.status.clone(), age))
    }

    /// Store a freshly fetched status, replacing whatever was there.
    pub fn put(&self, service: &str, user: &str, status: StreamerStatus) {
        let entry = CacheEntry {
            status,
            fetched_at: Instant::now(),
        };
        self.entries
            .insert((service.to_owned(), user.to_owned()), entry);
    }

    /// Get the number of cached entries, stale ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for StatusCache {
    fn default() -> Self {
        Self::new()
    }
}
