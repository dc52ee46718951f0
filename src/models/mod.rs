//! Shared data models for dependency analysis
//!
//! This module holds the value types that flow between the collaborators, the
//! indices, the graph projector and the POM patch engine:
//!
//! - [`ArtifactCoordinate`] - the `(groupId, artifactId, version)` triple (GAV)
//! - [`GroupArtifact`] - the coarser `(groupId, artifactId)` pair (GA)
//! - [`DependencyTarget`] - a GA with an optional version, used to address a
//!   declaration inside a POM
//! - [`graph`] - raw resolver output and the projected tree
//! - [`manifest`] - the interpolated manifest model and the effective classpath
//!
//! Coordinates are structural value types. They are never concatenated into
//! `"group:artifact:version"` strings for lookups, so artifact names containing
//! colons cannot collide.

pub mod graph;
pub mod manifest;

pub use graph::{ProjectedNode, RawDependencyNode, TreeRoot};
pub use manifest::{DeclaredDependency, EffectiveArtifact, ManifestModel};

use crate::core::AssistError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// A fully qualified artifact release: `groupId:artifactId:version`.
///
/// Equality and hashing are structural over all three fields. Serialized with
/// Maven's field names so it can be flattened into JSON payloads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactCoordinate {
    /// Maven `groupId`
    pub group_id: String,
    /// Maven `artifactId`
    pub artifact_id: String,
    /// Resolved version string
    pub version: String,
}

impl ArtifactCoordinate {
    /// Create a coordinate from its three parts.
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: version.into(),
        }
    }

    /// The version-less GA pair of this coordinate.
    #[must_use]
    pub fn ga(&self) -> GroupArtifact {
        GroupArtifact::new(&self.group_id, &self.artifact_id)
    }

    /// Directory of this release inside a Maven local repository.
    ///
    /// `org.slf4j:slf4j-api:2.0.9` maps to `org/slf4j/slf4j-api/2.0.9`.
    #[must_use]
    pub fn repository_dir(&self, local_repository: &Path) -> PathBuf {
        let mut dir = local_repository.to_path_buf();
        for segment in self.group_id.split('.') {
            dir.push(segment);
        }
        dir.push(&self.artifact_id);
        dir.push(&self.version);
        dir
    }

    /// Path of the packaged jar inside a Maven local repository.
    #[must_use]
    pub fn jar_path(&self, local_repository: &Path) -> PathBuf {
        self.repository_dir(local_repository)
            .join(format!("{}-{}.jar", self.artifact_id, self.version))
    }

    /// Path of the published POM inside a Maven local repository.
    #[must_use]
    pub fn pom_path(&self, local_repository: &Path) -> PathBuf {
        self.repository_dir(local_repository)
            .join(format!("{}-{}.pom", self.artifact_id, self.version))
    }
}

impl fmt::Display for ArtifactCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group_id, self.artifact_id, self.version)
    }
}

/// A `(groupId, artifactId)` pair identifying a library across versions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupArtifact {
    /// Maven `groupId`
    pub group_id: String,
    /// Maven `artifactId`
    pub artifact_id: String,
}

impl GroupArtifact {
    /// Create a GA pair.
    pub fn new(group_id: impl Into<String>, artifact_id: impl Into<String>) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
        }
    }

    /// Whether this pair names the given group and artifact.
    #[must_use]
    pub fn matches(&self, group_id: &str, artifact_id: &str) -> bool {
        self.group_id == group_id && self.artifact_id == artifact_id
    }
}

impl fmt::Display for GroupArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group_id, self.artifact_id)
    }
}

impl FromStr for GroupArtifact {
    type Err = AssistError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split(':').collect::<Vec<_>>().as_slice() {
            [group, artifact] if !group.is_empty() && !artifact.is_empty() => {
                Ok(Self::new(*group, *artifact))
            }
            _ => Err(AssistError::InvalidCoordinate {
                input: s.to_string(),
                expected: "groupId:artifactId".to_string(),
            }),
        }
    }
}

/// Addresses a dependency declaration: GA plus an optional version.
///
/// When no version is supplied the first declaration with a matching GA wins,
/// so callers that may face several versions of the same GA should always pass
/// one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyTarget {
    /// Maven `groupId`
    pub group_id: String,
    /// Maven `artifactId`
    pub artifact_id: String,
    /// Literal version to match; `None` or empty matches any version
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl DependencyTarget {
    /// Create a target with an optional version.
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: Option<&str>,
    ) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: version.map(str::to_string),
        }
    }

    /// The version to match, treating an empty string as absent.
    #[must_use]
    pub fn requested_version(&self) -> Option<&str> {
        self.version.as_deref().filter(|v| !v.is_empty())
    }

    /// The GA pair of this target.
    #[must_use]
    pub fn ga(&self) -> GroupArtifact {
        GroupArtifact::new(&self.group_id, &self.artifact_id)
    }
}

impl fmt::Display for DependencyTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.requested_version() {
            Some(version) => write!(f, "{}:{}:{}", self.group_id, self.artifact_id, version),
            None => write!(f, "{}:{}", self.group_id, self.artifact_id),
        }
    }
}

impl FromStr for DependencyTarget {
    type Err = AssistError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split(':').collect::<Vec<_>>().as_slice() {
            [group, artifact] if !group.is_empty() && !artifact.is_empty() => {
                Ok(Self::new(*group, *artifact, None))
            }
            [group, artifact, version]
                if !group.is_empty() && !artifact.is_empty() && !version.is_empty() =>
            {
                Ok(Self::new(*group, *artifact, Some(*version)))
            }
            _ => Err(AssistError::InvalidCoordinate {
                input: s.to_string(),
                expected: "groupId:artifactId[:version]".to_string(),
            }),
        }
    }
}
