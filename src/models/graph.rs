//! Raw resolver graphs and projected dependency trees.

use super::{ArtifactCoordinate, GroupArtifact};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A node of the graph returned by the dependency resolver.
///
/// The graph is redundant: the same coordinate may appear at several depths
/// along different branches. A node without an artifact is the synthetic root
/// that groups the project's direct dependencies.
///
/// Serialized with the same field names as [`ProjectedNode`], so a resolver
/// export looks like `{"children": [{"groupId": ..., "scope": ..., "children": [...]}]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawDependencyNode {
    /// Resolved artifact, absent only for the synthetic root
    #[serde(flatten)]
    pub artifact: Option<ArtifactCoordinate>,
    /// Scope declared on the edge leading to this node
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    /// Child dependencies in resolver order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<RawDependencyNode>,
}

impl RawDependencyNode {
    /// A synthetic root with the given direct dependencies.
    #[must_use]
    pub fn root(children: Vec<RawDependencyNode>) -> Self {
        Self {
            artifact: None,
            scope: None,
            children,
        }
    }

    /// An artifact node without children.
    #[must_use]
    pub fn artifact(coordinate: ArtifactCoordinate, scope: Option<&str>) -> Self {
        Self {
            artifact: Some(coordinate),
            scope: scope.map(str::to_string),
            children: Vec::new(),
        }
    }

    /// Builder-style child attachment.
    #[must_use]
    pub fn with_child(mut self, child: RawDependencyNode) -> Self {
        self.children.push(child);
        self
    }

    /// Builder-style attachment of several children.
    #[must_use]
    pub fn with_children(mut self, children: impl IntoIterator<Item = RawDependencyNode>) -> Self {
        self.children.extend(children);
        self
    }

    /// Visit every artifact coordinate in the graph, depth first, duplicates included.
    pub fn for_each_artifact<'a>(&'a self, visit: &mut impl FnMut(&'a ArtifactCoordinate)) {
        if let Some(artifact) = &self.artifact {
            visit(artifact);
        }
        for child in &self.children {
            child.for_each_artifact(visit);
        }
    }
}

/// One rendered artifact of the projected tree.
///
/// Optional collections are omitted from JSON when empty so payloads stay
/// minimal and stable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectedNode {
    /// The artifact this node renders
    #[serde(flatten)]
    pub coordinate: ArtifactCoordinate,
    /// Effective scope (effective classpath, then declared, then default)
    pub scope: String,
    /// True when this exact GAV lost version mediation
    pub dropped_by_conflict: bool,
    /// Size of the packaged jar in bytes, 0 when not present locally
    pub size: u64,
    /// GA pairs this artifact's declaration excludes in the project manifest
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub exclusions: BTreeSet<GroupArtifact>,
    /// Expanded dependencies; only the canonical occurrence carries them
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ProjectedNode>,
}

impl ProjectedNode {
    /// Walk this node and its descendants, passing each node with its depth.
    pub fn walk<'a>(&'a self, depth: usize, visit: &mut impl FnMut(&'a ProjectedNode, usize)) {
        visit(self, depth);
        for child in &self.children {
            child.walk(depth + 1, visit);
        }
    }
}

/// The top of a projected tree.
///
/// The resolver normally returns a synthetic root, rendered as an object that
/// only carries `children`. A root that is itself an artifact renders as that
/// artifact's node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeRoot {
    /// A root that is itself an artifact
    Artifact(ProjectedNode),
    /// The synthetic root grouping the direct dependencies
    Synthetic {
        /// Projected direct dependencies
        children: Vec<ProjectedNode>,
    },
}

impl TreeRoot {
    /// Top-level nodes of the tree.
    #[must_use]
    pub fn top_level(&self) -> &[ProjectedNode] {
        match self {
            TreeRoot::Artifact(node) => std::slice::from_ref(node),
            TreeRoot::Synthetic { children } => children,
        }
    }

    /// Walk every node with its depth; top-level nodes have depth 0.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a ProjectedNode, usize)) {
        for node in self.top_level() {
            node.walk(0, visit);
        }
    }
}
