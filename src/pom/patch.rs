//! Adding `<exclusion>` entries to a dependency declaration in place.
//!
//! The engine edits the node tree from [`super::document`] directly: it finds
//! the `<dependency>` element, infers the local indentation, and appends new
//! elements framed by whitespace text nodes. Nothing else in the document is
//! touched, so a diff of the file shows only the inserted lines.
//!
//! Insertion is idempotent. A second request for the same exclusion finds it
//! in the document and reports [`InsertOutcome::AlreadyExists`] without writing.

use super::document::{NodePath, XmlDocument, XmlElement, XmlNode};
use super::indent::IndentProfile;
use crate::constants::PLACEHOLDER_MARKER;
use crate::core::AssistError;
use crate::models::{DependencyTarget, GroupArtifact};
use crate::utils::fs::atomic_write;
use anyhow::Result;
use std::collections::HashMap;
use std::path::Path;

/// Result of an insertion request that matched a dependency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The exclusion was added; `line` is where the new `<exclusion>` starts
    Inserted {
        /// 1-based line of the new element
        line: usize,
    },
    /// The dependency already excludes this GA; nothing was written
    AlreadyExists {
        /// 1-based line of the existing element
        line: usize,
    },
}

impl InsertOutcome {
    /// Line to highlight in an editor.
    #[must_use]
    pub const fn line(&self) -> usize {
        match self {
            Self::Inserted {
                line,
            }
            | Self::AlreadyExists {
                line,
            } => *line,
        }
    }
}

/// Find the first `<dependency>` matching the target.
///
/// Group and artifact must match exactly. A version containing a property
/// placeholder is replaced by its interpolated value from `resolved` before
/// comparing. Without a requested version any declaration of the GA matches.
#[must_use]
pub fn find_dependency(
    doc: &XmlDocument,
    target: &DependencyTarget,
    resolved: &HashMap<GroupArtifact, String>,
) -> Option<NodePath> {
    doc.find_all("dependency").into_iter().find(|path| {
        let Some(element) = doc.element(path) else {
            return false;
        };
        let (Some(group), Some(artifact)) =
            (element.child_text("groupId"), element.child_text("artifactId"))
        else {
            return false;
        };
        if group != target.group_id || artifact != target.artifact_id {
            return false;
        }

        let mut version = element.child_text("version");
        if version.as_deref().is_some_and(|v| v.contains(PLACEHOLDER_MARKER)) {
            if let Some(literal) = resolved.get(&GroupArtifact::new(&group, &artifact)) {
                version = Some(literal.clone());
            }
        }

        target.requested_version().is_none_or(|wanted| version.as_deref() == Some(wanted))
    })
}

/// Add an exclusion to the dependency at `dependency`.
///
/// Returns `None` when `dependency` does not address an element.
pub fn apply_exclusion(
    doc: &mut XmlDocument,
    dependency: &[usize],
    exclusion: &GroupArtifact,
) -> Option<InsertOutcome> {
    let profile = IndentProfile::infer(doc, dependency);
    let element = doc.element_mut(dependency)?;

    let exclusion_path = match element.find_child("exclusions").map(|(i, _)| i) {
        Some(index) => {
            let Some(exclusions) = element.children[index].as_element_mut() else {
                return None;
            };
            if let Some(existing) = find_exclusion(exclusions, exclusion) {
                let path = [dependency, &[index, existing][..]].concat();
                return Some(InsertOutcome::AlreadyExists {
                    line: doc.line_of(&path).unwrap_or(0),
                });
            }

            exclusions.expand_self_closing();
            let lead = if exclusions.ends_with_whitespace() {
                profile.unit.clone()
            } else {
                profile.level(2)
            };
            exclusions.children.push(XmlNode::text(lead));
            exclusions.children.push(XmlNode::Element(exclusion_element(&profile, exclusion)));
            let position = exclusions.children.len() - 1;
            exclusions.children.push(XmlNode::text(profile.level(1)));
            [dependency, &[index, position][..]].concat()
        }
        None => {
            let mut exclusions = XmlElement::new("exclusions");
            exclusions.children.push(XmlNode::text(profile.level(2)));
            exclusions.children.push(XmlNode::Element(exclusion_element(&profile, exclusion)));
            exclusions.children.push(XmlNode::text(profile.level(1)));

            element.expand_self_closing();
            let lead = if element.ends_with_whitespace() {
                profile.unit.clone()
            } else {
                profile.level(1)
            };
            element.children.push(XmlNode::text(lead));
            element.children.push(XmlNode::Element(exclusions));
            let index = element.children.len() - 1;
            element.children.push(XmlNode::text(profile.element.clone()));
            [dependency, &[index, 1][..]].concat()
        }
    };

    Some(InsertOutcome::Inserted {
        line: doc.line_of(&exclusion_path).unwrap_or(0),
    })
}

/// Patch manifest text. Returns the outcome and, when something was
/// inserted, the new text.
pub fn patch_source(
    source: &str,
    target: &DependencyTarget,
    exclusion: &GroupArtifact,
    resolved: &HashMap<GroupArtifact, String>,
    file: &str,
) -> Result<(InsertOutcome, Option<String>)> {
    let mut doc = XmlDocument::parse(source).map_err(|e| AssistError::ManifestParseError {
        file: file.to_string(),
        reason: e.to_string(),
    })?;

    let dependency_not_found = || AssistError::DependencyNotFound {
        dependency: target.ga().to_string(),
    };
    let path = find_dependency(&doc, target, resolved).ok_or_else(dependency_not_found)?;
    let outcome = apply_exclusion(&mut doc, &path, exclusion).ok_or_else(dependency_not_found)?;

    Ok(match outcome {
        InsertOutcome::Inserted {
            ..
        } => (outcome, Some(doc.to_xml_string())),
        InsertOutcome::AlreadyExists {
            ..
        } => (outcome, None),
    })
}

/// Insert an exclusion into the manifest at `path`, rewriting it atomically.
///
/// `resolved` maps GA pairs to interpolated versions; pass an empty map when
/// the model could not be built, placeholders then never match a version.
pub fn insert_exclusion(
    path: &Path,
    target: &DependencyTarget,
    exclusion: &GroupArtifact,
    resolved: &HashMap<GroupArtifact, String>,
) -> Result<InsertOutcome> {
    if !path.is_file() {
        return Err(AssistError::ManifestNotFound {
            path: path.display().to_string(),
        }
        .into());
    }

    let source = std::fs::read_to_string(path).map_err(AssistError::from)?;
    let (outcome, patched) =
        patch_source(&source, target, exclusion, resolved, &path.display().to_string())?;

    if let Some(text) = patched {
        atomic_write(path, text.as_bytes())?;
        tracing::info!(
            "Added exclusion {} to {} in {} (line {})",
            exclusion,
            target,
            path.display(),
            outcome.line()
        );
    } else {
        tracing::debug!("Exclusion {} already present on {}", exclusion, target);
    }

    Ok(outcome)
}

fn find_exclusion(exclusions: &XmlElement, exclusion: &GroupArtifact) -> Option<usize> {
    exclusions.child_elements().find_map(|(i, element)| {
        let matches = element.local_name() == "exclusion"
            && element.child_text("groupId").as_deref() == Some(exclusion.group_id.as_str())
            && element.child_text("artifactId").as_deref() == Some(exclusion.artifact_id.as_str());
        matches.then_some(i)
    })
}

fn exclusion_element(profile: &IndentProfile, exclusion: &GroupArtifact) -> XmlElement {
    let mut element = XmlElement::new("exclusion");
    element.children.push(XmlNode::text(profile.level(3)));
    element.children.push(XmlNode::Element(XmlElement::with_text("groupId", &exclusion.group_id)));
    element.children.push(XmlNode::text(profile.level(3)));
    element
        .children
        .push(XmlNode::Element(XmlElement::with_text("artifactId", &exclusion.artifact_id)));
    element.children.push(XmlNode::text(profile.level(2)));
    element
}
