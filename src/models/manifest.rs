//! Manifest model and effective classpath entries.
//!
//! These types mirror what the external model builder and classpath lister
//! hand back: an interpolated view of the POM, and the flat list of artifacts
//! that actually ended up on the build classpath.

use super::{ArtifactCoordinate, GroupArtifact};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// One artifact placed on the build classpath by the build tool itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectiveArtifact {
    /// The exact GAV that won mediation
    #[serde(flatten)]
    pub coordinate: ArtifactCoordinate,
    /// JPMS module name reported by the build tool, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module_name: Option<String>,
    /// Classpath scope (`compile`, `runtime`, `test`, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

impl EffectiveArtifact {
    /// Create an entry with a scope and no module name.
    pub fn new(coordinate: ArtifactCoordinate, scope: Option<&str>) -> Self {
        Self {
            coordinate,
            module_name: None,
            scope: scope.map(str::to_string),
        }
    }
}

/// A `<dependency>` declaration as seen in the interpolated model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeclaredDependency {
    /// Maven `groupId`
    pub group_id: String,
    /// Maven `artifactId`
    pub artifact_id: String,
    /// Interpolated version; absent when managed elsewhere
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Declared scope
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    /// Packaging type (`jar` when absent)
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub dep_type: Option<String>,
    /// Classifier, e.g. `sources` or `tests`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classifier: Option<String>,
    /// `<optional>true</optional>`
    #[serde(default)]
    pub optional: bool,
    /// GA pairs listed under `<exclusions>`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclusions: Vec<GroupArtifact>,
}

impl DeclaredDependency {
    /// A declaration with only group, artifact and version set.
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: Option<&str>,
    ) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: version.map(str::to_string),
            ..Self::default()
        }
    }

    /// The GA pair of this declaration.
    #[must_use]
    pub fn ga(&self) -> GroupArtifact {
        GroupArtifact::new(&self.group_id, &self.artifact_id)
    }

    /// Builder-style exclusion.
    #[must_use]
    pub fn excluding(mut self, group_id: &str, artifact_id: &str) -> Self {
        self.exclusions.push(GroupArtifact::new(group_id, artifact_id));
        self
    }
}

/// The effective, interpolated model of a manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestModel {
    /// The project's own coordinate
    pub coordinate: ArtifactCoordinate,
    /// Properties after interpolation
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
    /// `<dependencies>` of the project
    #[serde(default)]
    pub dependencies: Vec<DeclaredDependency>,
    /// `<dependencyManagement><dependencies>` of the project
    #[serde(default)]
    pub dependency_management: Vec<DeclaredDependency>,
}

impl ManifestModel {
    /// Literal versions of the declared dependencies, keyed by GA.
    ///
    /// Used to compare placeholder versions such as `${jackson.version}` in
    /// the raw POM text against a caller-supplied literal version. A GA only
    /// declared under `dependencyManagement` takes the managed version.
    #[must_use]
    pub fn resolved_versions(&self) -> HashMap<GroupArtifact, String> {
        let mut versions: HashMap<GroupArtifact, String> = self
            .dependencies
            .iter()
            .filter_map(|dep| dep.version.as_ref().map(|v| (dep.ga(), v.clone())))
            .collect();
        for dep in &self.dependency_management {
            if let Some(version) = &dep.version {
                versions.entry(dep.ga()).or_insert_with(|| version.clone());
            }
        }
        versions
    }
}
