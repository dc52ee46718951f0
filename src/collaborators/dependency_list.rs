//! Effective classpath from saved `mvn dependency:list` output.

use super::ClasspathLister;
use crate::constants::MAVEN_SCOPES;
use crate::core::AssistError;
use crate::models::{ArtifactCoordinate, EffectiveArtifact};
use anyhow::Result;
use std::path::{Path, PathBuf};

const INFO_PREFIX: &str = "[INFO]";
const MODULE_MARKER: &str = "-- module";

/// [`ClasspathLister`] backed by a file holding `mvn dependency:list` output.
///
/// The listing belongs to one project, so the manifest path passed to
/// [`list`](ClasspathLister::list) is only used for logging.
#[derive(Debug, Clone)]
pub struct DependencyListReport {
    report: PathBuf,
}

impl DependencyListReport {
    /// Adapter over the report at `report`.
    pub fn new(report: impl Into<PathBuf>) -> Self {
        Self {
            report: report.into(),
        }
    }
}

impl ClasspathLister for DependencyListReport {
    fn list(&self, manifest: &Path) -> Result<Vec<EffectiveArtifact>> {
        let content = std::fs::read_to_string(&self.report).map_err(|e| {
            AssistError::ClasspathListError {
                path: self.report.display().to_string(),
                reason: e.to_string(),
            }
        })?;
        let artifacts = parse_dependency_list(&content);
        tracing::debug!(
            "Read {} classpath entries for {} from {}",
            artifacts.len(),
            manifest.display(),
            self.report.display()
        );
        Ok(artifacts)
    }
}

/// Parse `mvn dependency:list` console output.
///
/// Only `[INFO]` lines shaped `group:artifact:packaging[:classifier]:version:scope`
/// are kept, optionally followed by `-- module name (auto)`. Build chatter such
/// as plugin banners fails the scope check and is skipped.
#[must_use]
pub fn parse_dependency_list(output: &str) -> Vec<EffectiveArtifact> {
    output.lines().filter_map(parse_line).collect()
}

fn parse_line(line: &str) -> Option<EffectiveArtifact> {
    let entry = line.trim().strip_prefix(INFO_PREFIX)?.trim();
    if !entry.contains(':') {
        return None;
    }

    let (entry, module_name) = match entry.split_once(MODULE_MARKER) {
        Some((gav, module)) => {
            // "name (auto)" -> "name"
            let name = module.split('(').next().unwrap_or_default().trim();
            (gav.trim(), (!name.is_empty()).then(|| name.to_string()))
        }
        None => (entry, None),
    };

    let parts: Vec<&str> = entry.split(':').collect();
    let (group, artifact, version, scope) = match parts.as_slice() {
        [group, artifact, _packaging, version, scope]
        | [group, artifact, _packaging, _, version, scope] => (*group, *artifact, *version, *scope),
        _ => return None,
    };
    // "compile (optional)" -> "compile"
    let scope = scope.split_whitespace().next()?;
    if !MAVEN_SCOPES.contains(&scope) || group.is_empty() || artifact.is_empty() {
        return None;
    }

    Some(EffectiveArtifact {
        coordinate: ArtifactCoordinate::new(group, artifact, version),
        module_name,
        scope: Some(scope.to_string()),
    })
}
