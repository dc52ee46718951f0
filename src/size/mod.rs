//! Jar size lookups against the local repository.
//!
//! Sizes are memoized per jar path in a [`DashMap`] shared by every request
//! of the process, so concurrent preloads and synchronous lookups never block
//! each other on unrelated keys. A missing jar counts as size 0.
//!
//! [`SizeOracle::preload_parallel`] warms the cache before a projection with a
//! bounded pool of metadata lookups, each under its own deadline. A lookup that
//! misses the deadline is logged and dropped; the next [`SizeOracle::size_of`]
//! for that artifact simply reads the file system synchronously.

use crate::models::ArtifactCoordinate;
use dashmap::DashMap;
use futures::stream::{self, StreamExt};
use std::collections::HashSet;
use std::fs::Metadata;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Outcome counters of one preload run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PreloadStats {
    /// Paths that were not cached when the preload started
    pub requested: usize,
    /// Paths whose size landed in the cache
    pub loaded: usize,
    /// Lookups abandoned at the deadline
    pub timed_out: usize,
}

/// Memoized jar size resolver.
#[derive(Debug)]
pub struct SizeOracle {
    local_repository: PathBuf,
    sizes: DashMap<PathBuf, u64>,
    workers: usize,
    timeout: Duration,
}

enum Lookup {
    Found(PathBuf, u64),
    Failed,
    TimedOut,
}

impl SizeOracle {
    /// Create an oracle over a local repository root.
    pub fn new(local_repository: impl Into<PathBuf>, workers: usize, timeout: Duration) -> Self {
        Self {
            local_repository: local_repository.into(),
            sizes: DashMap::new(),
            workers: workers.max(1),
            timeout,
        }
    }

    /// Root of the local repository jars are looked up in.
    #[must_use]
    pub fn local_repository(&self) -> &Path {
        &self.local_repository
    }

    /// Byte size of the coordinate's jar, 0 when it is not in the repository.
    pub fn size_of(&self, coordinate: &ArtifactCoordinate) -> u64 {
        let path = coordinate.jar_path(&self.local_repository);
        if let Some(size) = self.sizes.get(&path) {
            return *size;
        }

        let size = match std::fs::metadata(&path) {
            Ok(meta) if meta.is_file() => meta.len(),
            Ok(_) => 0,
            Err(e) => {
                if e.kind() != ErrorKind::NotFound {
                    tracing::debug!("Size lookup failed for {}: {}", path.display(), e);
                }
                0
            }
        };
        *self.sizes.entry(path).or_insert(size)
    }

    /// Populate the cache for every coordinate not cached yet.
    ///
    /// Never fails: errors and timeouts only leave the cache unpopulated.
    pub async fn preload_parallel<'a>(
        &self,
        coordinates: impl IntoIterator<Item = &'a ArtifactCoordinate>,
    ) -> PreloadStats {
        self.preload_with(coordinates, |path| tokio::fs::metadata(path)).await
    }

    async fn preload_with<'a, F, Fut>(
        &self,
        coordinates: impl IntoIterator<Item = &'a ArtifactCoordinate>,
        metadata: F,
    ) -> PreloadStats
    where
        F: Fn(PathBuf) -> Fut,
        Fut: Future<Output = io::Result<Metadata>>,
    {
        let pending: HashSet<PathBuf> = coordinates
            .into_iter()
            .map(|c| c.jar_path(&self.local_repository))
            .filter(|path| !self.sizes.contains_key(path))
            .collect();

        let mut stats = PreloadStats {
            requested: pending.len(),
            ..PreloadStats::default()
        };
        if pending.is_empty() {
            return stats;
        }

        tracing::debug!(
            "Preloading {} jar sizes with {} workers",
            stats.requested,
            self.workers
        );

        let deadline = self.timeout;
        let results = stream::iter(pending)
            .map(|path| {
                let lookup = metadata(path.clone());
                lookup_within(path, deadline, lookup)
            })
            .buffer_unordered(self.workers)
            .collect::<Vec<_>>()
            .await;

        for result in results {
            match result {
                Lookup::Found(path, size) => {
                    self.sizes.entry(path).or_insert(size);
                    stats.loaded += 1;
                }
                Lookup::TimedOut => stats.timed_out += 1,
                Lookup::Failed => {}
            }
        }
        stats
    }

    /// Whether a size is memoized for the coordinate.
    #[must_use]
    pub fn is_cached(&self, coordinate: &ArtifactCoordinate) -> bool {
        self.sizes.contains_key(&coordinate.jar_path(&self.local_repository))
    }

    /// Number of memoized sizes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    /// Whether nothing is memoized.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    /// Drop every memoized size.
    pub fn clear(&self) {
        self.sizes.clear();
    }
}

/// Run one metadata lookup under `deadline`.
async fn lookup_within<Fut>(path: PathBuf, deadline: Duration, metadata: Fut) -> Lookup
where
    Fut: Future<Output = io::Result<Metadata>>,
{
    match tokio::time::timeout(deadline, metadata).await {
        Ok(Ok(meta)) => {
            let size = if meta.is_file() {
                meta.len()
            } else {
                0
            };
            Lookup::Found(path, size)
        }
        Ok(Err(e)) if e.kind() == ErrorKind::NotFound => Lookup::Found(path, 0),
        Ok(Err(e)) => {
            tracing::debug!("Size lookup failed for {}: {}", path.display(), e);
            Lookup::Failed
        }
        Err(_) => {
            tracing::warn!("Size lookup timed out after {:?} for {}", deadline, path.display());
            Lookup::TimedOut
        }
    }
}
