//! Lookup indices built from collaborator output.
//!
//! [`CoordinateIndex`] answers "did this exact release reach the classpath"
//! and "did any version of this library reach it", plus the scope the build
//! tool assigned. [`ExclusionMap`] answers "which libraries does the manifest
//! exclude from this dependency". Both are built once per request and are
//! read-only afterwards.

use crate::models::{ArtifactCoordinate, EffectiveArtifact, GroupArtifact, ManifestModel};
use std::collections::{BTreeSet, HashMap, HashSet};

/// Effective triples, effective GA pairs and scope by triple.
#[derive(Debug, Clone, Default)]
pub struct CoordinateIndex {
    triples: HashSet<ArtifactCoordinate>,
    pairs: HashSet<GroupArtifact>,
    scopes: HashMap<ArtifactCoordinate, String>,
}

impl CoordinateIndex {
    /// Aggregate the effective classpath into the three lookups.
    ///
    /// Entries without a scope still count as effective; they just do not
    /// contribute to the scope map.
    #[must_use]
    pub fn build(effective: &[EffectiveArtifact]) -> Self {
        let mut index = Self::default();
        for artifact in effective {
            index.pairs.insert(artifact.coordinate.ga());
            if let Some(scope) = &artifact.scope {
                index.scopes.insert(artifact.coordinate.clone(), scope.clone());
            }
            index.triples.insert(artifact.coordinate.clone());
        }
        index
    }

    /// Whether this exact release is on the classpath.
    #[must_use]
    pub fn is_effective(&self, coordinate: &ArtifactCoordinate) -> bool {
        self.triples.contains(coordinate)
    }

    /// Whether some version of this library is on the classpath.
    #[must_use]
    pub fn is_effective_ga(&self, ga: &GroupArtifact) -> bool {
        self.pairs.contains(ga)
    }

    /// Scope the build tool assigned to this release.
    #[must_use]
    pub fn scope_of(&self, coordinate: &ArtifactCoordinate) -> Option<&str> {
        self.scopes.get(coordinate).map(String::as_str)
    }

    /// Number of distinct effective releases.
    #[must_use]
    pub fn len(&self) -> usize {
        self.triples.len()
    }

    /// Whether the classpath is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }
}

/// Exclusions declared in the manifest, keyed by the excluding dependency.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionMap {
    entries: HashMap<GroupArtifact, BTreeSet<GroupArtifact>>,
}

impl ExclusionMap {
    /// Union of the exclusions under `<dependencies>` and
    /// `<dependencyManagement>` for each GA pair.
    #[must_use]
    pub fn from_model(model: &ManifestModel) -> Self {
        let mut map = Self::default();
        for dep in model.dependencies.iter().chain(&model.dependency_management) {
            if dep.exclusions.is_empty() {
                continue;
            }
            map.entries.entry(dep.ga()).or_default().extend(dep.exclusions.iter().cloned());
        }
        map
    }

    /// Exclusions declared for this dependency, if any.
    #[must_use]
    pub fn get(&self, ga: &GroupArtifact) -> Option<&BTreeSet<GroupArtifact>> {
        self.entries.get(ga)
    }

    /// Number of dependencies carrying exclusions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no dependency carries exclusions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
