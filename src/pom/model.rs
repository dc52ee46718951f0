//! In-file POM model builder.
//!
//! Builds a [`ManifestModel`] from a single `pom.xml`: project coordinate
//! (falling back to `<parent>` for group and version), `<properties>`, direct
//! dependencies and `<dependencyManagement>`. Placeholders of the form
//! `${name}` are interpolated from the properties and the built-in project
//! values. Parent POM inheritance and profiles are not evaluated here.

use super::document::{XmlDocument, XmlElement};
use crate::collaborators::ModelBuilder;
use crate::constants::MAX_INTERPOLATION_DEPTH;
use crate::core::AssistError;
use crate::models::{ArtifactCoordinate, DeclaredDependency, GroupArtifact, ManifestModel};
use anyhow::{Context, Result};
use regex::Regex;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

/// [`ModelBuilder`] that reads the POM file itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct PomModelBuilder;

impl PomModelBuilder {
    /// Create a builder.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Build the model from POM text. `file` is only used in error messages.
    pub fn parse(&self, source: &str, file: &str) -> Result<ManifestModel> {
        let parse_error = |reason: String| AssistError::ManifestParseError {
            file: file.to_string(),
            reason,
        };

        let doc = XmlDocument::parse(source).map_err(|e| parse_error(e.to_string()))?;
        let project = doc
            .root()
            .filter(|root| root.local_name() == "project")
            .ok_or_else(|| parse_error("missing <project> root element".to_string()))?;

        let parent = project.find_child("parent").map(|(_, p)| p);
        let inherited = |name: &str| {
            project.child_text(name).or_else(|| parent.and_then(|p| p.child_text(name)))
        };
        let group_id = inherited("groupId").unwrap_or_default();
        let artifact_id = project.child_text("artifactId").unwrap_or_default();
        let version = inherited("version").unwrap_or_default();

        let mut values: HashMap<String, String> = HashMap::new();
        if let Some((_, properties)) = project.find_child("properties") {
            for (_, property) in properties.child_elements() {
                values.insert(property.name().to_string(), property.text());
            }
        }
        for prefix in ["project", "pom"] {
            values.insert(format!("{prefix}.groupId"), group_id.clone());
            values.insert(format!("{prefix}.artifactId"), artifact_id.clone());
            values.insert(format!("{prefix}.version"), version.clone());
        }
        values.entry("version".to_string()).or_insert_with(|| version.clone());
        if let Some(parent) = parent {
            for field in ["groupId", "artifactId", "version"] {
                if let Some(value) = parent.child_text(field) {
                    values.insert(format!("project.parent.{field}"), value);
                }
            }
        }

        let interpolator = Interpolator::new(values)?;
        let properties: BTreeMap<String, String> = project
            .find_child("properties")
            .map(|(_, properties)| {
                properties
                    .child_elements()
                    .map(|(_, p)| (p.name().to_string(), interpolator.apply(&p.text())))
                    .collect()
            })
            .unwrap_or_default();

        let dependencies = project
            .find_child("dependencies")
            .map(|(_, deps)| declared_dependencies(deps, &interpolator))
            .unwrap_or_default();
        let dependency_management = project
            .find_child("dependencyManagement")
            .and_then(|(_, management)| management.find_child("dependencies"))
            .map(|(_, deps)| declared_dependencies(deps, &interpolator))
            .unwrap_or_default();

        let model = ManifestModel {
            coordinate: ArtifactCoordinate::new(
                interpolator.apply(&group_id),
                interpolator.apply(&artifact_id),
                interpolator.apply(&version),
            ),
            properties,
            dependencies,
            dependency_management,
        };
        tracing::debug!(
            "Built model for {} ({} dependencies, {} managed)",
            model.coordinate,
            model.dependencies.len(),
            model.dependency_management.len()
        );
        Ok(model)
    }
}

impl ModelBuilder for PomModelBuilder {
    fn build(&self, manifest: &Path) -> Result<ManifestModel> {
        if !manifest.is_file() {
            return Err(AssistError::ManifestNotFound {
                path: manifest.display().to_string(),
            }
            .into());
        }
        let source = std::fs::read_to_string(manifest)
            .with_context(|| format!("Failed to read {}", manifest.display()))?;
        self.parse(&source, &manifest.display().to_string())
    }
}

/// `${name}` substitution against a fixed value table.
struct Interpolator {
    values: HashMap<String, String>,
    pattern: Regex,
}

impl Interpolator {
    fn new(values: HashMap<String, String>) -> Result<Self> {
        Ok(Self {
            values,
            pattern: Regex::new(r"\$\{([^}]+)\}")?,
        })
    }

    /// Expand placeholders, following nested references a bounded number of
    /// times. Unknown names are left as written.
    fn apply(&self, text: &str) -> String {
        let mut current = text.to_string();
        for _ in 0..MAX_INTERPOLATION_DEPTH {
            if !self.pattern.is_match(&current) {
                break;
            }
            let next = self
                .pattern
                .replace_all(&current, |caps: &regex::Captures<'_>| {
                    self.values.get(&caps[1]).cloned().unwrap_or_else(|| caps[0].to_string())
                })
                .into_owned();
            if next == current {
                break;
            }
            current = next;
        }
        current
    }
}

fn declared_dependencies(
    dependencies: &XmlElement,
    interpolator: &Interpolator,
) -> Vec<DeclaredDependency> {
    dependencies
        .child_elements()
        .filter(|(_, e)| e.local_name() == "dependency")
        .filter_map(|(_, e)| declared_dependency(e, interpolator))
        .collect()
}

fn declared_dependency(
    element: &XmlElement,
    interpolator: &Interpolator,
) -> Option<DeclaredDependency> {
    let field = |name: &str| {
        element.child_text(name).filter(|v| !v.is_empty()).map(|v| interpolator.apply(&v))
    };

    let exclusions = element
        .find_child("exclusions")
        .map(|(_, exclusions)| {
            exclusions
                .child_elements()
                .filter(|(_, e)| e.local_name() == "exclusion")
                .filter_map(|(_, e)| {
                    let group = e.child_text("groupId")?;
                    let artifact = e.child_text("artifactId")?;
                    Some(GroupArtifact::new(
                        interpolator.apply(&group),
                        interpolator.apply(&artifact),
                    ))
                })
                .collect()
        })
        .unwrap_or_default();

    Some(DeclaredDependency {
        group_id: field("groupId")?,
        artifact_id: field("artifactId")?,
        version: field("version"),
        scope: field("scope"),
        dep_type: field("type"),
        classifier: field("classifier"),
        optional: field("optional").is_some_and(|v| v.eq_ignore_ascii_case("true")),
        exclusions,
    })
}
