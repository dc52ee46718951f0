//! Request orchestration.
//!
//! [`DependencyService`] is what an editor backend talks to. It owns the
//! process-wide state (result cache, size cache, per-manifest write locks) and
//! the collaborator adapters, and exposes one async method per request:
//!
//! | request | method | payload |
//! |---|---|---|
//! | analyze | [`analyze`](DependencyService::analyze) | projected tree or `{"error"}` |
//! | insert exclusion | [`insert_exclusion`](DependencyService::insert_exclusion) | [`ExclusionPayload`] |
//! | conflicts | [`conflicts`](DependencyService::conflicts) | `[ConflictEntry]` or `{"error"}` |
//! | dependency path | [`dependency_path`](DependencyService::dependency_path) | [`DependencyPathPayload`] |
//!
//! Requests never fail at the transport level: every error is turned into a
//! payload. Analysis and exclusion are independent; a failed analysis leaves
//! no cache entry and a failed patch leaves the manifest untouched.

mod payload;

pub use payload::{CacheStats, DependencyPathPayload, ErrorPayload, ExclusionPayload};

use crate::collaborators::{ClasspathLister, DependencyResolver, ModelBuilder, ResolveRequest};
use crate::cache::ResultCache;
use crate::config::AssistConfig;
use crate::core::AssistError;
use crate::index::{CoordinateIndex, ExclusionMap};
use crate::models::{
    ArtifactCoordinate, DependencyTarget, EffectiveArtifact, GroupArtifact, ManifestModel,
    RawDependencyNode, TreeRoot,
};
use crate::pom::{InsertOutcome, patch};
use crate::projector::{GraphProjector, conflict_report, locate_dependency, locate_in_pom};
use crate::size::SizeOracle;
use crate::utils::fs::modified_time;
use anyhow::{Context, Result};
use dashmap::DashMap;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Inputs gathered from the collaborators for one manifest.
struct Collected {
    model: ManifestModel,
    graph: RawDependencyNode,
    effective: Vec<EffectiveArtifact>,
}

/// Long-lived service answering dependency requests.
pub struct DependencyService {
    resolver: Arc<dyn DependencyResolver>,
    model_builder: Arc<dyn ModelBuilder>,
    classpath: Arc<dyn ClasspathLister>,
    results: ResultCache,
    sizes: SizeOracle,
    write_locks: DashMap<PathBuf, Arc<Mutex<()>>>,
    default_scope: String,
}

impl DependencyService {
    /// Create a service from configuration and collaborator adapters.
    pub fn new(
        config: &AssistConfig,
        resolver: Arc<dyn DependencyResolver>,
        model_builder: Arc<dyn ModelBuilder>,
        classpath: Arc<dyn ClasspathLister>,
    ) -> Result<Self> {
        let repository = config.local_repository_path()?;
        tracing::debug!(
            "Starting dependency service (repository {}, ttl {:?}, {} size workers)",
            repository.display(),
            config.cache_ttl(),
            config.size_workers()
        );

        Ok(Self {
            resolver,
            model_builder,
            classpath,
            results: ResultCache::new(config.cache_ttl()),
            sizes: SizeOracle::new(repository, config.size_workers(), config.size_timeout()),
            write_locks: DashMap::new(),
            default_scope: config.default_scope.clone(),
        })
    }

    /// Projected dependency tree of the manifest as JSON.
    ///
    /// Served from the result cache while the manifest's mtime is unchanged
    /// and the entry is younger than the TTL.
    pub async fn analyze(&self, manifest: &Path) -> String {
        if !manifest.is_file() {
            return ErrorPayload::json(
                AssistError::ManifestNotFound {
                    path: manifest.display().to_string(),
                }
                .to_string(),
            );
        }

        let key = cache_key(manifest);
        let mtime = match modified_time(manifest) {
            Ok(mtime) => mtime,
            Err(e) => return ErrorPayload::json(format!("{e:#}")),
        };
        if let Some(payload) = self.results.get(&key, mtime) {
            return payload;
        }
        self.results.sweep();

        match self.project(manifest).await {
            Ok(payload) => {
                self.results.insert(key, payload.clone(), mtime);
                payload
            }
            Err(e) => {
                tracing::warn!("Analysis of {} failed: {:#}", manifest.display(), e);
                ErrorPayload::json(
                    AssistError::AnalysisFailed {
                        reason: format!("{e:#}"),
                    }
                    .to_string(),
                )
            }
        }
    }

    /// Add `exclusion` to the declaration of `dependency` in the manifest.
    ///
    /// Insertions into the same manifest run one at a time.
    pub async fn insert_exclusion(
        &self,
        manifest: &Path,
        dependency: &DependencyTarget,
        exclusion: &GroupArtifact,
    ) -> ExclusionPayload {
        let key = cache_key(manifest);
        let lock = Arc::clone(&*self.write_locks.entry(key.clone()).or_default());
        let guard = lock.lock().await;

        let builder = Arc::clone(&self.model_builder);
        let path = manifest.to_path_buf();
        let (dependency, exclusion) = (dependency.clone(), exclusion.clone());
        let outcome = blocking(move || {
            let resolved = match builder.build(&path) {
                Ok(model) => model.resolved_versions(),
                Err(e) => {
                    tracing::debug!("No interpolated versions for {}: {:#}", path.display(), e);
                    HashMap::new()
                }
            };
            patch::insert_exclusion(&path, &dependency, &exclusion, &resolved)
        })
        .await;

        drop(guard);
        drop(lock);
        // Only the map holds the mutex once no insert is queued on it
        self.write_locks.remove_if(&key, |_, lock| Arc::strong_count(lock) == 1);

        match outcome {
            Ok(InsertOutcome::Inserted {
                line,
            }) => {
                self.results.invalidate(&key);
                ExclusionPayload::inserted(line)
            }
            Ok(InsertOutcome::AlreadyExists {
                line,
            }) => ExclusionPayload::already_exists(line),
            Err(e) => {
                tracing::info!("Exclusion insert into {} failed: {:#}", manifest.display(), e);
                ExclusionPayload::failed(format!("{e:#}"))
            }
        }
    }

    /// Every distinct release of the raw graph with its conflict flag, as JSON.
    pub async fn conflicts(&self, manifest: &Path) -> String {
        let report = async {
            let collected = self.collect(manifest).await?;
            let index = CoordinateIndex::build(&collected.effective);
            let entries = conflict_report(&collected.graph, &index, &self.default_scope);
            Ok::<_, anyhow::Error>(serde_json::to_string(&entries)?)
        };

        match report.await {
            Ok(payload) => payload,
            Err(e) => ErrorPayload::json(
                AssistError::AnalysisFailed {
                    reason: format!("{e:#}"),
                }
                .to_string(),
            ),
        }
    }

    /// The dependency that pulled `target` into the graph, and where its POM
    /// declares it.
    pub async fn dependency_path(
        &self,
        manifest: &Path,
        target: &DependencyTarget,
    ) -> DependencyPathPayload {
        let graph = match self.resolve_graph(manifest).await {
            Ok(graph) => graph,
            Err(e) => {
                return DependencyPathPayload::failed(format!(
                    "Failed to get dependency path: {e:#}"
                ));
            }
        };

        let Some(path) = locate_dependency(&graph, target) else {
            return DependencyPathPayload::failed("Dependency path not found");
        };
        let (Some(parent), Some(found)) = (path.parent(), path.target()) else {
            return DependencyPathPayload::failed("Dependency path not found");
        };

        let parent_pom = parent.pom_path(self.sizes.local_repository());
        let payload = DependencyPathPayload {
            success: true,
            parent_pom_path: Some(parent_pom.display().to_string()),
            parent_group_id: Some(parent.group_id.clone()),
            parent_artifact_id: Some(parent.artifact_id.clone()),
            parent_version: Some(parent.version.clone()),
            ..DependencyPathPayload::default()
        };

        let location = tokio::fs::read_to_string(&parent_pom)
            .await
            .map_err(|e| format!("{}: {}", parent_pom.display(), e))
            .and_then(|content| locate_in_pom(&content, &found.ga()).map_err(|e| e.to_string()));
        match location {
            Ok(location) => payload.at(location),
            Err(reason) => DependencyPathPayload {
                error: Some(format!("Failed to parse POM file location: {reason}")),
                ..payload
            },
        }
    }

    /// Entry counts of the result and size caches.
    #[must_use]
    pub fn cache_stats(&self) -> CacheStats {
        CacheStats {
            results: self.results.len(),
            sizes: self.sizes.len(),
        }
    }

    /// Drop all process-wide state.
    pub fn shutdown(&self) {
        let stats = self.cache_stats();
        self.results.clear();
        self.sizes.clear();
        self.write_locks.clear();
        tracing::info!(
            "Dependency service stopped ({} results, {} sizes dropped)",
            stats.results,
            stats.sizes
        );
    }

    async fn project(&self, manifest: &Path) -> Result<String> {
        let collected = self.collect(manifest).await?;
        let index = CoordinateIndex::build(&collected.effective);
        let exclusions = ExclusionMap::from_model(&collected.model);

        let mut reachable: Vec<&ArtifactCoordinate> = Vec::new();
        collected.graph.for_each_artifact(&mut |coordinate| {
            if index.is_effective_ga(&coordinate.ga()) {
                reachable.push(coordinate);
            }
        });
        let stats = self.sizes.preload_parallel(reachable).await;
        if stats.timed_out > 0 {
            tracing::info!("{} of {} size lookups timed out", stats.timed_out, stats.requested);
        }

        let projector = GraphProjector::new(&index, &exclusions, &self.sizes, &self.default_scope);
        let tree = projector.project(&collected.graph).unwrap_or(TreeRoot::Synthetic {
            children: Vec::new(),
        });
        Ok(serde_json::to_string(&tree)?)
    }

    async fn collect(&self, manifest: &Path) -> Result<Collected> {
        let model = self.build_model(manifest).await?;
        let graph = self.resolve(&model).await?;

        let lister = Arc::clone(&self.classpath);
        let path = manifest.to_path_buf();
        let effective = blocking(move || lister.list(&path)).await?;
        tracing::debug!(
            "Collected {} effective artifacts for {}",
            effective.len(),
            manifest.display()
        );

        Ok(Collected {
            model,
            graph,
            effective,
        })
    }

    async fn resolve_graph(&self, manifest: &Path) -> Result<RawDependencyNode> {
        let model = self.build_model(manifest).await?;
        self.resolve(&model).await
    }

    async fn build_model(&self, manifest: &Path) -> Result<ManifestModel> {
        let builder = Arc::clone(&self.model_builder);
        let path = manifest.to_path_buf();
        blocking(move || builder.build(&path))
            .await
            .with_context(|| format!("Failed to build model of {}", manifest.display()))
    }

    async fn resolve(&self, model: &ManifestModel) -> Result<RawDependencyNode> {
        let resolver = Arc::clone(&self.resolver);
        let request = ResolveRequest::from_model(model);
        blocking(move || resolver.resolve(&request)).await
    }
}

/// Run a synchronous collaborator call on the blocking pool.
async fn blocking<T, F>(task: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(task).await.context("Collaborator task panicked")?
}

/// Canonical path when available so `./pom.xml` and `pom.xml` share state.
fn cache_key(manifest: &Path) -> PathBuf {
    std::fs::canonicalize(manifest).unwrap_or_else(|_| manifest.to_path_buf())
}
