//! Flat conflict report over a raw graph.

use super::resolve_scope;
use crate::index::CoordinateIndex;
use crate::models::{ArtifactCoordinate, RawDependencyNode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One distinct release of the raw graph and whether it lost mediation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictEntry {
    /// The release
    #[serde(flatten)]
    pub coordinate: ArtifactCoordinate,
    /// Effective scope, then declared scope, then the default
    pub scope: String,
    /// True when another version of the library won
    pub dropped_by_conflict: bool,
}

/// List every distinct release whose library reached the classpath.
///
/// Declared scope is taken from the first occurrence in depth-first order.
/// Entries are sorted by coordinate.
#[must_use]
pub fn conflict_report(
    root: &RawDependencyNode,
    index: &CoordinateIndex,
    default_scope: &str,
) -> Vec<ConflictEntry> {
    let mut declared: BTreeMap<&ArtifactCoordinate, Option<&str>> = BTreeMap::new();
    collect(root, &mut declared);

    declared
        .into_iter()
        .filter(|(coordinate, _)| index.is_effective_ga(&coordinate.ga()))
        .map(|(coordinate, scope)| ConflictEntry {
            coordinate: coordinate.clone(),
            scope: resolve_scope(index, coordinate, scope, default_scope),
            dropped_by_conflict: !index.is_effective(coordinate),
        })
        .collect()
}

fn collect<'a>(
    node: &'a RawDependencyNode,
    seen: &mut BTreeMap<&'a ArtifactCoordinate, Option<&'a str>>,
) {
    if let Some(coordinate) = &node.artifact {
        seen.entry(coordinate).or_insert(node.scope.as_deref());
    }
    for child in &node.children {
        collect(child, seen);
    }
}
