//! Raw dependency graph loaded from a JSON export.

use super::{DependencyResolver, ResolveRequest};
use crate::constants::{DEFAULT_SCOPE, TRANSITIVE_SCOPES};
use crate::core::AssistError;
use crate::models::RawDependencyNode;
use anyhow::Result;
use std::path::PathBuf;

/// [`DependencyResolver`] that reads a graph the resolver exported earlier.
///
/// The export uses the projection field names (`groupId`, `artifactId`,
/// `version`, `scope`, `children`); a node without coordinate fields is the
/// synthetic root. The scope-depth policy is applied on load, so exports taken
/// without it still satisfy the resolver contract.
#[derive(Debug, Clone)]
pub struct GraphFileResolver {
    path: PathBuf,
}

impl GraphFileResolver {
    /// Resolver over the export at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
        }
    }
}

impl DependencyResolver for GraphFileResolver {
    fn resolve(&self, request: &ResolveRequest) -> Result<RawDependencyNode> {
        let load_error = |reason: String| AssistError::GraphLoadError {
            path: self.path.display().to_string(),
            reason,
        };

        let content = std::fs::read_to_string(&self.path).map_err(|e| load_error(e.to_string()))?;
        let mut graph: RawDependencyNode =
            serde_json::from_str(&content).map_err(|e| load_error(e.to_string()))?;
        apply_scope_policy(&mut graph);

        tracing::debug!(
            "Loaded graph for {} from {} ({} direct dependencies)",
            request.root,
            self.path.display(),
            graph.children.len()
        );
        Ok(graph)
    }
}

/// Keep direct dependencies in any scope and deeper ones only in `compile`
/// or `runtime`. A removed node takes its subtree with it.
///
/// Depth is counted from the first artifact below the synthetic root; when
/// the root is itself an artifact its children are the direct dependencies.
pub fn apply_scope_policy(root: &mut RawDependencyNode) {
    for child in &mut root.children {
        prune_transitive(child);
    }
}

fn prune_transitive(node: &mut RawDependencyNode) {
    node.children.retain(|child| {
        let scope = child.scope.as_deref().filter(|s| !s.is_empty()).unwrap_or(DEFAULT_SCOPE);
        // Nested synthetic groupings are transparent
        child.artifact.is_none() || TRANSITIVE_SCOPES.contains(&scope)
    });
    for child in &mut node.children {
        prune_transitive(child);
    }
}
