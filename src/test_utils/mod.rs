//! Test utilities for mvn-assist
//!
//! Shared by unit tests and, through the `test-utils` feature, by the
//! integration suite:
//! - [`init_test_logging`] for tracing output inside tests
//! - in-memory collaborators ([`FixedResolver`], [`FixedModel`], [`FixedClasspath`])
//! - coordinate shorthands ([`gav`], [`effective`])
//! - a local repository fixture ([`LocalRepo`])
//!
//! # Example
//!
//! ```rust,no_run
//! use mvn_assist::test_utils::{FixedClasspath, effective, gav};
//!
//! let classpath = FixedClasspath::new(effective(&[("org.x:core:1.0", "compile")]));
//! assert_eq!(gav("org.x:core:1.0").artifact_id, "core");
//! ```

use crate::collaborators::{ClasspathLister, DependencyResolver, ModelBuilder, ResolveRequest};
use crate::config::AssistConfig;
use crate::models::{ArtifactCoordinate, EffectiveArtifact, ManifestModel, RawDependencyNode};
use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::Once;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Only the first call has an effect. `level` wins over `RUST_LOG`; with
/// neither set no subscriber is installed.
///
/// ```bash
/// RUST_LOG=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .with_ansi(true)
            .try_init();
    });
}

/// Parse `group:artifact:version`.
///
/// # Panics
///
/// Panics when the text does not have exactly three parts.
#[must_use]
pub fn gav(text: &str) -> ArtifactCoordinate {
    let parts: Vec<&str> = text.split(':').collect();
    assert_eq!(parts.len(), 3, "expected group:artifact:version, got {text}");
    ArtifactCoordinate::new(parts[0], parts[1], parts[2])
}

/// Effective classpath entries from `(coordinate, scope)` pairs.
#[must_use]
pub fn effective(entries: &[(&str, &str)]) -> Vec<EffectiveArtifact> {
    entries
        .iter()
        .map(|(coordinate, scope)| EffectiveArtifact::new(gav(coordinate), Some(scope)))
        .collect()
}

/// Raw node for `group:artifact:version` with a declared scope.
#[must_use]
pub fn raw(text: &str, scope: &str) -> RawDependencyNode {
    RawDependencyNode::artifact(gav(text), Some(scope))
}

/// Resolver returning a fixed graph and counting calls.
#[derive(Debug, Default)]
pub struct FixedResolver {
    graph: RawDependencyNode,
    calls: AtomicUsize,
}

impl FixedResolver {
    /// Resolver that always returns `graph`.
    #[must_use]
    pub fn new(graph: RawDependencyNode) -> Self {
        Self {
            graph,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of `resolve` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl DependencyResolver for FixedResolver {
    fn resolve(&self, _request: &ResolveRequest) -> Result<RawDependencyNode> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.graph.clone())
    }
}

/// Model builder returning a fixed model.
#[derive(Debug, Default)]
pub struct FixedModel(pub ManifestModel);

impl ModelBuilder for FixedModel {
    fn build(&self, _manifest: &Path) -> Result<ManifestModel> {
        Ok(self.0.clone())
    }
}

/// Classpath lister returning a fixed list.
#[derive(Debug, Default)]
pub struct FixedClasspath(Vec<EffectiveArtifact>);

impl FixedClasspath {
    /// Lister that always returns `artifacts`.
    #[must_use]
    pub const fn new(artifacts: Vec<EffectiveArtifact>) -> Self {
        Self(artifacts)
    }
}

impl ClasspathLister for FixedClasspath {
    fn list(&self, _manifest: &Path) -> Result<Vec<EffectiveArtifact>> {
        Ok(self.0.clone())
    }
}

/// A local Maven repository under a test directory.
#[derive(Debug, Clone)]
pub struct LocalRepo {
    root: PathBuf,
}

impl LocalRepo {
    /// Repository rooted at `root`; created lazily.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
        }
    }

    /// Repository root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Config pointing at this repository.
    #[must_use]
    pub fn config(&self) -> AssistConfig {
        AssistConfig {
            local_repository: self.root.display().to_string(),
            ..AssistConfig::default()
        }
    }

    /// Install a jar of `bytes` bytes for `coordinate`.
    pub fn install_jar(&self, coordinate: &ArtifactCoordinate, bytes: usize) -> Result<PathBuf> {
        let path = coordinate.jar_path(&self.root);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, vec![0u8; bytes])?;
        Ok(path)
    }

    /// Install a POM for `coordinate`.
    pub fn install_pom(&self, coordinate: &ArtifactCoordinate, content: &str) -> Result<PathBuf> {
        let path = coordinate.pom_path(&self.root);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, content)?;
        Ok(path)
    }
}
