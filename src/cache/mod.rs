//! In-memory cache of serialized analysis results.
//!
//! Entries are keyed by manifest path and carry the manifest's modification
//! time at analysis time. An entry is served only while it is younger than the
//! TTL and the manifest has not been touched since; anything else is a miss.
//! Stale entries are removed lazily, on lookup or by [`ResultCache::sweep`].
//!
//! The map is a [`DashMap`], so requests for different manifests never
//! contend on one lock.

use dashmap::DashMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant, SystemTime};

/// One cached payload.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// Serialized analysis result
    pub payload: String,
    /// When the entry was stored
    pub created_at: Instant,
    /// Manifest modification time the payload was computed from
    pub source_mtime: SystemTime,
}

impl CacheEntry {
    fn is_valid(&self, ttl: Duration, current_mtime: SystemTime) -> bool {
        self.created_at.elapsed() < ttl && self.source_mtime == current_mtime
    }
}

/// TTL and mtime gated result cache.
#[derive(Debug)]
pub struct ResultCache {
    entries: DashMap<PathBuf, CacheEntry>,
    ttl: Duration,
}

impl ResultCache {
    /// Create an empty cache with the given time-to-live.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    /// The configured time-to-live.
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Payload for `path` if still valid for the manifest's current mtime.
    pub fn get(&self, path: &Path, current_mtime: SystemTime) -> Option<String> {
        if let Some(entry) = self.entries.get(path) {
            if entry.is_valid(self.ttl, current_mtime) {
                tracing::debug!("Result cache hit for {}", path.display());
                return Some(entry.payload.clone());
            }
        }

        // Guard released above; evict only if still stale
        if self
            .entries
            .remove_if(path, |_, entry| !entry.is_valid(self.ttl, current_mtime))
            .is_some()
        {
            tracing::debug!("Evicted stale result for {}", path.display());
        }
        tracing::debug!("Result cache miss for {}", path.display());
        None
    }

    /// Store a payload computed from the manifest at `source_mtime`.
    pub fn insert(&self, path: PathBuf, payload: String, source_mtime: SystemTime) {
        self.entries.insert(path, CacheEntry {
            payload,
            created_at: Instant::now(),
            source_mtime,
        });
    }

    /// Drop entries older than the TTL. Returns how many were removed.
    pub fn sweep(&self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.created_at.elapsed() < self.ttl);
        let removed = before.saturating_sub(self.entries.len());
        if removed > 0 {
            tracing::debug!("Swept {} expired results", removed);
        }
        removed
    }

    /// Drop one manifest's entry.
    pub fn invalidate(&self, path: &Path) {
        self.entries.remove(path);
    }

    /// Drop everything.
    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Number of stored entries, valid or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
