//! Seams to the external collaborators.
//!
//! Dependency resolution, model building and the effective classpath are
//! owned by the build tool. The core only depends on these traits:
//!
//! - [`DependencyResolver`] - raw dependency graph for a project
//! - [`ModelBuilder`] - interpolated manifest model
//! - [`ClasspathLister`] - artifacts that actually reached the classpath
//!
//! Bundled adapters read artifacts the build tool already produced:
//! [`GraphFileResolver`] loads an exported graph, [`DependencyListReport`]
//! parses saved `mvn dependency:list` output, and
//! [`PomModelBuilder`](crate::pom::PomModelBuilder) reads the POM itself.
//!
//! All traits are synchronous and object safe. The service runs them on the
//! blocking pool.

mod dependency_list;
mod graph_file;

pub use dependency_list::{DependencyListReport, parse_dependency_list};
pub use graph_file::{GraphFileResolver, apply_scope_policy};

use crate::constants::{CENTRAL_REPOSITORY_ID, CENTRAL_REPOSITORY_URL};
use crate::models::{ArtifactCoordinate, DeclaredDependency, EffectiveArtifact, ManifestModel, RawDependencyNode};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A remote artifact repository handed to the resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteRepository {
    /// Repository id as used in settings and POMs
    pub id: String,
    /// Base URL
    pub url: String,
}

impl RemoteRepository {
    /// Maven Central.
    #[must_use]
    pub fn central() -> Self {
        Self {
            id: CENTRAL_REPOSITORY_ID.to_string(),
            url: CENTRAL_REPOSITORY_URL.to_string(),
        }
    }
}

/// Input of one resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveRequest {
    /// The project being analyzed
    pub root: ArtifactCoordinate,
    /// Direct dependency declarations
    pub direct: Vec<DeclaredDependency>,
    /// Dependency management overrides
    pub managed: Vec<DeclaredDependency>,
    /// Repositories to resolve from
    pub repositories: Vec<RemoteRepository>,
}

impl ResolveRequest {
    /// Request for a model's project against Maven Central.
    #[must_use]
    pub fn from_model(model: &ManifestModel) -> Self {
        Self {
            root: model.coordinate.clone(),
            direct: model.dependencies.clone(),
            managed: model.dependency_management.clone(),
            repositories: vec![RemoteRepository::central()],
        }
    }
}

/// Produces the raw dependency graph of a project.
///
/// Implementations must already apply the scope-depth policy: direct
/// dependencies in any scope, deeper ones only in `compile` or `runtime`.
pub trait DependencyResolver: Send + Sync {
    /// Resolve the graph for `request`.
    fn resolve(&self, request: &ResolveRequest) -> Result<RawDependencyNode>;
}

/// Builds the interpolated model of a manifest.
pub trait ModelBuilder: Send + Sync {
    /// Build the model of the manifest at `manifest`.
    fn build(&self, manifest: &Path) -> Result<ManifestModel>;
}

/// Lists the artifacts the build tool actually put on the classpath.
pub trait ClasspathLister: Send + Sync {
    /// Effective classpath of the project at `manifest`.
    fn list(&self, manifest: &Path) -> Result<Vec<EffectiveArtifact>>;
}
