//! Graph projection and level reconciliation.
//!
//! The resolver hands back a redundant graph: the same release is reachable
//! through many paths at different depths. [`GraphProjector::project`] turns it
//! into a tree where each release owns exactly one expanded subtree, anchored
//! at the shallowest depth it was seen at. Every other occurrence renders as a
//! leaf with the same content.
//!
//! Traversal is depth first over an arena of nodes. When a shallower
//! occurrence of an already anchored release shows up, the children computed
//! for the deeper anchor move to the new node and the deeper node becomes a
//! leaf. Levels of the moved subtree's anchors are lowered with it, so a later
//! sighting in between still compares against the real depth.
//!
//! Input cycles are not defended against; the resolver never produces them.
//!
//! [`conflict_report`] and [`locate_dependency`] are flat views over the same
//! raw graph.

mod conflicts;
mod locate;

pub use conflicts::{ConflictEntry, conflict_report};
pub use locate::{DependencyPath, PomLocation, locate_dependency, locate_in_pom};

use crate::index::{CoordinateIndex, ExclusionMap};
use crate::models::{ArtifactCoordinate, ProjectedNode, RawDependencyNode, TreeRoot};
use crate::size::SizeOracle;
use std::collections::HashMap;

/// Bookkeeping for the canonical node of one release.
#[derive(Debug, Clone, Copy)]
struct LevelEntry {
    level: usize,
    node: usize,
}

#[derive(Debug)]
struct ArenaNode {
    content: ProjectedNode,
    children: Vec<usize>,
}

/// Projects raw resolver graphs into canonical annotated trees.
///
/// Holds only shared read-only inputs; each [`project`](Self::project) call
/// owns a fresh level index.
pub struct GraphProjector<'a> {
    index: &'a CoordinateIndex,
    exclusions: &'a ExclusionMap,
    sizes: &'a SizeOracle,
    default_scope: &'a str,
}

struct Projection<'p, 'a> {
    projector: &'p GraphProjector<'a>,
    arena: Vec<ArenaNode>,
    levels: HashMap<ArtifactCoordinate, LevelEntry>,
}

impl<'a> GraphProjector<'a> {
    /// Create a projector over the request's indices.
    pub fn new(
        index: &'a CoordinateIndex,
        exclusions: &'a ExclusionMap,
        sizes: &'a SizeOracle,
        default_scope: &'a str,
    ) -> Self {
        Self {
            index,
            exclusions,
            sizes,
            default_scope,
        }
    }

    /// Project a raw graph. `None` when nothing in it reached the classpath.
    pub fn project(&self, root: &RawDependencyNode) -> Option<TreeRoot> {
        let mut run = Projection {
            projector: self,
            arena: Vec::new(),
            levels: HashMap::new(),
        };

        let tree = match &root.artifact {
            None => {
                let top = run.visit_children(&root.children, 0);
                if top.is_empty() {
                    None
                } else {
                    Some(TreeRoot::Synthetic {
                        children: top.into_iter().map(|id| run.materialize(id)).collect(),
                    })
                }
            }
            Some(_) => run.visit(root, 0).map(|id| TreeRoot::Artifact(run.materialize(id))),
        };

        tracing::debug!(
            "Projected {} nodes for {} distinct releases",
            run.arena.len(),
            run.levels.len()
        );
        tree
    }

    /// Scope shown for a release: effective classpath, then declaration, then default.
    pub(crate) fn resolve_scope(&self, coordinate: &ArtifactCoordinate, declared: Option<&str>) -> String {
        resolve_scope(self.index, coordinate, declared, self.default_scope)
    }

    fn content(&self, coordinate: &ArtifactCoordinate, declared_scope: Option<&str>) -> ProjectedNode {
        ProjectedNode {
            coordinate: coordinate.clone(),
            scope: self.resolve_scope(coordinate, declared_scope),
            dropped_by_conflict: !self.index.is_effective(coordinate),
            size: self.sizes.size_of(coordinate),
            exclusions: self.exclusions.get(&coordinate.ga()).cloned().unwrap_or_default(),
            children: Vec::new(),
        }
    }
}

pub(crate) fn resolve_scope(
    index: &CoordinateIndex,
    coordinate: &ArtifactCoordinate,
    declared: Option<&str>,
    default_scope: &str,
) -> String {
    index
        .scope_of(coordinate)
        .or(declared.filter(|s| !s.is_empty()))
        .unwrap_or(default_scope)
        .to_string()
}

impl Projection<'_, '_> {
    /// Visit sibling nodes at one level. Nested synthetic nodes flatten into
    /// their parent's child list at the same level.
    fn visit_children(&mut self, children: &[RawDependencyNode], level: usize) -> Vec<usize> {
        let mut ids = Vec::new();
        for child in children {
            if child.artifact.is_none() {
                ids.extend(self.visit_children(&child.children, level));
            } else if let Some(id) = self.visit(child, level) {
                ids.push(id);
            }
        }
        ids
    }

    fn visit(&mut self, node: &RawDependencyNode, level: usize) -> Option<usize> {
        let coordinate = node.artifact.as_ref()?;
        if !self.projector.index.is_effective_ga(&coordinate.ga()) {
            return None;
        }

        let content = self.projector.content(coordinate, node.scope.as_deref());

        match self.levels.get(coordinate).copied() {
            None => {
                let dropped = content.dropped_by_conflict;
                let id = self.push(content);
                self.levels.insert(coordinate.clone(), LevelEntry {
                    level,
                    node: id,
                });
                // A release that lost mediation contributes no transitive edges
                if !dropped {
                    let children = self.visit_children(&node.children, level + 1);
                    self.arena[id].children = children;
                }
                Some(id)
            }
            Some(entry) if level >= entry.level => Some(self.push(content)),
            Some(entry) => {
                let id = self.push(content);
                let moved = std::mem::take(&mut self.arena[entry.node].children);
                self.arena[id].children = moved;
                self.levels.insert(coordinate.clone(), LevelEntry {
                    level,
                    node: id,
                });
                self.relevel_descendants(id, level);
                Some(id)
            }
        }
    }

    fn push(&mut self, content: ProjectedNode) -> usize {
        self.arena.push(ArenaNode {
            content,
            children: Vec::new(),
        });
        self.arena.len() - 1
    }

    /// Lower the recorded level of canonical nodes inside a moved subtree.
    fn relevel_descendants(&mut self, id: usize, level: usize) {
        let mut stack: Vec<(usize, usize)> =
            self.arena[id].children.iter().map(|&child| (child, level + 1)).collect();
        while let Some((node, depth)) = stack.pop() {
            let coordinate = &self.arena[node].content.coordinate;
            if let Some(entry) = self.levels.get_mut(coordinate) {
                if entry.node == node && depth < entry.level {
                    entry.level = depth;
                }
            }
            stack.extend(self.arena[node].children.iter().map(|&child| (child, depth + 1)));
        }
    }

    fn materialize(&self, id: usize) -> ProjectedNode {
        let node = &self.arena[id];
        let mut content = node.content.clone();
        content.children = node.children.iter().map(|&child| self.materialize(child)).collect();
        content
    }
}
