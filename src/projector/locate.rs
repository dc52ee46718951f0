//! Locating which dependency pulled a release into the graph.

use crate::core::AssistError;
use crate::models::{ArtifactCoordinate, DependencyTarget, GroupArtifact, RawDependencyNode};

/// Chain of releases from a direct dependency down to the target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyPath {
    /// Releases on the path; the synthetic root is not included
    pub chain: Vec<ArtifactCoordinate>,
}

impl DependencyPath {
    /// The release that was searched for.
    #[must_use]
    pub fn target(&self) -> Option<&ArtifactCoordinate> {
        self.chain.last()
    }

    /// The release whose POM declares the target, if the target is transitive.
    #[must_use]
    pub fn parent(&self) -> Option<&ArtifactCoordinate> {
        self.chain.len().checked_sub(2).map(|i| &self.chain[i])
    }
}

/// Depth-first search for the first node matching the target.
#[must_use]
pub fn locate_dependency(root: &RawDependencyNode, target: &DependencyTarget) -> Option<DependencyPath> {
    let mut chain = Vec::new();
    search(root, target, &mut chain).then_some(DependencyPath {
        chain,
    })
}

fn search(node: &RawDependencyNode, target: &DependencyTarget, chain: &mut Vec<ArtifactCoordinate>) -> bool {
    if let Some(artifact) = &node.artifact {
        chain.push(artifact.clone());
        let version_ok = target.requested_version().is_none_or(|v| v == artifact.version);
        if artifact.group_id == target.group_id && artifact.artifact_id == target.artifact_id && version_ok {
            return true;
        }
    }

    for child in &node.children {
        if search(child, target, chain) {
            return true;
        }
    }

    if node.artifact.is_some() {
        chain.pop();
    }
    false
}

/// Position of a dependency's `<artifactId>` inside a POM.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PomLocation {
    /// 1-based line number
    pub line_number: usize,
    /// 0-based column where the artifactId text starts
    pub artifact_id_start: usize,
    /// 0-based column where the artifactId text ends
    pub artifact_id_end: usize,
}

/// Line scan of a POM for the `<dependency>` naming the given GA.
///
/// Expects `<groupId>` and `<artifactId>` each on their own line, before the
/// closing `</dependency>`, which is how published POMs are laid out.
pub fn locate_in_pom(content: &str, ga: &GroupArtifact) -> Result<PomLocation, AssistError> {
    let lines: Vec<&str> = content.lines().collect();

    for (i, line) in lines.iter().enumerate() {
        if !line.trim_start().starts_with("<dependency>") {
            continue;
        }

        let mut group: Option<&str> = None;
        for (j, current) in lines.iter().enumerate().skip(i) {
            let trimmed = current.trim_start();
            if trimmed.starts_with("</dependency>") {
                break;
            }
            if trimmed.starts_with("<groupId>") {
                group = Some(tag_content(current));
            } else if trimmed.starts_with("<artifactId>") {
                if group == Some(ga.group_id.as_str()) && tag_content(current) == ga.artifact_id {
                    let open = "<artifactId>";
                    let start = current.find(open).map_or(0, |p| p + open.len());
                    let end = current.find("</artifactId>").unwrap_or(current.len());
                    return Ok(PomLocation {
                        line_number: j + 1,
                        artifact_id_start: start,
                        artifact_id_end: end,
                    });
                }
            }
        }
    }

    Err(AssistError::DependencyNotFound {
        dependency: ga.to_string(),
    })
}

fn tag_content(line: &str) -> &str {
    let start = line.find('>').map(|p| p + 1);
    let end = line.find("</");
    match (start, end) {
        (Some(start), Some(end)) if end > start => &line[start..end],
        _ => "",
    }
}
