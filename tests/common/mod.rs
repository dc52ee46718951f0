//! Common test utilities and fixtures for mvn-assist integration tests
//!
//! [`TestProject`] lays out a throwaway Maven project next to a private local
//! repository, writes the build outputs the file-backed collaborators read,
//! and runs either the library service or the compiled binary against it.

// Allow dead code because these utilities are used across different test files
// and not all utilities are used in every test file
#![allow(dead_code)]

mod pom_builder;

pub use pom_builder::{DependencyEntry, PomBuilder};

use anyhow::{Context, Result};
use assert_cmd::Command;
use mvn_assist::collaborators::{DependencyListReport, GraphFileResolver};
use mvn_assist::config::AssistConfig;
use mvn_assist::constants::{DEFAULT_CLASSPATH_FILE, DEFAULT_GRAPH_FILE, NO_PROGRESS_ENV_VAR};
use mvn_assist::models::RawDependencyNode;
use mvn_assist::pom::PomModelBuilder;
use mvn_assist::service::DependencyService;
use mvn_assist::test_utils::LocalRepo;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

/// A Maven project plus local repository inside a temp directory.
pub struct TestProject {
    _temp: TempDir,
    project_dir: PathBuf,
    repo: LocalRepo,
    config_path: PathBuf,
}

impl TestProject {
    /// Create the project directory, repository and config file.
    pub fn new() -> Result<Self> {
        let temp = TempDir::new()?;
        let project_dir = temp.path().join("project");
        std::fs::create_dir_all(project_dir.join("target"))?;
        let repo = LocalRepo::new(temp.path().join("repository"));
        std::fs::create_dir_all(repo.root())?;

        let config_path = temp.path().join("config.toml");
        std::fs::write(
            &config_path,
            format!("local_repository = '{}'\ncache_ttl_secs = 300\n", repo.root().display()),
        )?;

        Ok(Self {
            _temp: temp,
            project_dir,
            repo,
            config_path,
        })
    }

    /// Project directory holding `pom.xml`.
    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    /// Path of the project's `pom.xml`.
    pub fn pom_path(&self) -> PathBuf {
        self.project_dir.join("pom.xml")
    }

    /// The private local repository.
    pub fn repo(&self) -> &LocalRepo {
        &self.repo
    }

    /// Write the project's `pom.xml`.
    pub fn write_pom(&self, content: &str) -> Result<()> {
        std::fs::write(self.pom_path(), content).context("Failed to write pom.xml")
    }

    /// Current `pom.xml` content.
    pub fn read_pom(&self) -> Result<String> {
        std::fs::read_to_string(self.pom_path()).context("Failed to read pom.xml")
    }

    /// Export a raw graph where the CLI looks for it by default.
    pub fn write_graph(&self, graph: &RawDependencyNode) -> Result<()> {
        let json = serde_json::to_string_pretty(graph)?;
        std::fs::write(self.project_dir.join(DEFAULT_GRAPH_FILE), json)?;
        Ok(())
    }

    /// Write `mvn dependency:list` output for `(group:artifact:version, scope)` pairs.
    pub fn write_dependency_list(&self, entries: &[(&str, &str)]) -> Result<()> {
        let mut output = String::from(
            "[INFO] --- dependency:3.6.1:list (default-cli) @ app ---\n[INFO]\n[INFO] The following files have been resolved:\n",
        );
        for (coordinate, scope) in entries {
            let parts: Vec<&str> = coordinate.split(':').collect();
            output.push_str(&format!(
                "[INFO]    {}:{}:jar:{}:{}\n",
                parts[0], parts[1], parts[2], scope
            ));
        }
        output.push_str("[INFO] BUILD SUCCESS\n");
        std::fs::write(self.project_dir.join(DEFAULT_CLASSPATH_FILE), output)?;
        Ok(())
    }

    /// Configuration pointing at the private repository.
    pub fn config(&self) -> AssistConfig {
        self.repo.config()
    }

    /// Library service wired to the same files the CLI reads.
    pub fn service(&self) -> Result<DependencyService> {
        DependencyService::new(
            &self.config(),
            Arc::new(GraphFileResolver::new(self.project_dir.join(DEFAULT_GRAPH_FILE))),
            Arc::new(PomModelBuilder::new()),
            Arc::new(DependencyListReport::new(self.project_dir.join(DEFAULT_CLASSPATH_FILE))),
        )
    }

    /// The `mvn-assist` binary running inside the project directory.
    pub fn command(&self) -> Result<Command> {
        let mut cmd = Command::cargo_bin("mvn-assist")?;
        cmd.current_dir(&self.project_dir)
            .arg("--config")
            .arg(&self.config_path)
            .env(NO_PROGRESS_ENV_VAR, "1")
            .env("NO_COLOR", "1")
            .env_remove("RUST_LOG");
        Ok(cmd)
    }
}
