//! Shared plumbing for CLI commands: manifest lookup, config loading and
//! service construction.

use anyhow::{Context, Result};
use clap::Args;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::CliConfig;
use crate::collaborators::{DependencyListReport, GraphFileResolver};
use crate::config::AssistConfig;
use crate::constants::{DEFAULT_CLASSPATH_FILE, DEFAULT_GRAPH_FILE, MANIFEST_FILE};
use crate::core::AssistError;
use crate::pom::PomModelBuilder;
use crate::service::DependencyService;

/// Where the build tool's outputs are read from.
#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// Exported resolver graph (JSON)
    #[arg(long, value_name = "FILE")]
    pub graph: Option<PathBuf>,

    /// Saved `mvn dependency:list` output
    #[arg(long, value_name = "FILE")]
    pub classpath: Option<PathBuf>,
}

/// Locate `pom.xml` in the current directory or one of its parents.
pub fn find_manifest() -> Result<PathBuf> {
    let current = std::env::current_dir().context("Cannot determine current working directory")?;
    find_manifest_from(&current)
}

/// Locate `pom.xml` starting from `start`.
pub fn find_manifest_from(start: &Path) -> Result<PathBuf> {
    let mut dir = Some(start);
    while let Some(current) = dir {
        let candidate = current.join(MANIFEST_FILE);
        if candidate.is_file() {
            return Ok(candidate);
        }
        dir = current.parent();
    }
    Err(AssistError::ManifestNotFound {
        path: start.join(MANIFEST_FILE).display().to_string(),
    }
    .into())
}

/// Use the explicit path (a file, or a directory holding `pom.xml`) or search.
pub fn find_manifest_with_optional(explicit: Option<PathBuf>) -> Result<PathBuf> {
    let Some(path) = explicit else {
        return find_manifest();
    };
    let path = if path.is_dir() {
        path.join(MANIFEST_FILE)
    } else {
        path
    };
    if path.is_file() {
        Ok(path)
    } else {
        Err(AssistError::ManifestNotFound {
            path: path.display().to_string(),
        }
        .into())
    }
}

/// Everything a command needs before talking to the service.
#[derive(Debug)]
pub struct CommandContext {
    /// The manifest being worked on
    pub manifest_path: PathBuf,
    /// Directory holding the manifest
    pub project_dir: PathBuf,
    /// Loaded configuration
    pub config: AssistConfig,
}

impl CommandContext {
    /// Resolve the manifest and load configuration.
    pub async fn load(manifest: Option<PathBuf>, cli: &CliConfig) -> Result<Self> {
        let manifest_path = find_manifest_with_optional(manifest)?;
        let project_dir = manifest_path
            .parent()
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
        let config = AssistConfig::load_with_optional(cli.config_path.clone()).await?;

        Ok(Self {
            manifest_path,
            project_dir,
            config,
        })
    }

    /// Service wired to the file-backed collaborators.
    pub fn service(&self, sources: &SourceArgs) -> Result<DependencyService> {
        let graph = sources.graph.clone().unwrap_or_else(|| self.project_dir.join(DEFAULT_GRAPH_FILE));
        let classpath = sources
            .classpath
            .clone()
            .unwrap_or_else(|| self.project_dir.join(DEFAULT_CLASSPATH_FILE));
        tracing::debug!("Graph export: {}, classpath listing: {}", graph.display(), classpath.display());

        DependencyService::new(
            &self.config,
            Arc::new(GraphFileResolver::new(graph)),
            Arc::new(PomModelBuilder::new()),
            Arc::new(DependencyListReport::new(classpath)),
        )
    }
}

/// Human readable byte size.
#[must_use]
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}
