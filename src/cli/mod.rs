//! Command-line interface for mvn-assist.
//!
//! Each subcommand lives in its own module with its own clap `Args` struct
//! and an async `execute`. All of them go through
//! [`DependencyService`](crate::service::DependencyService), the same entry
//! point an editor backend uses, so the CLI prints exactly the payloads an
//! editor would receive.
//!
//! # Available Commands
//!
//! - `analyze` - projected dependency tree, as JSON or a coloured tree
//! - `exclude` - add an `<exclusion>` to a dependency in the POM
//! - `conflicts` - every release in the graph and whether it lost mediation
//! - `path` - which dependency pulled an artifact in, and where its POM says so
//!
//! # Collaborator inputs
//!
//! Resolution stays with Maven. `analyze`, `conflicts` and `path` read what
//! Maven already produced: an exported graph (`--graph`, default
//! `target/dependency-graph.json`) and the saved output of
//! `mvn dependency:list` (`--classpath`, default `target/dependency-list.txt`).
//!
//! # Global Options
//!
//! - `--verbose` - debug logging on stderr
//! - `--quiet` - no logging, no spinner
//! - `--config` - explicit config file
//! - `--no-progress` - no spinner
//!
//! ```bash
//! mvn-assist analyze --format tree --depth 2
//! mvn-assist exclude --dependency org.foo:bar:1.0 --exclusion commons-logging:commons-logging
//! mvn-assist path --dependency commons-logging:commons-logging
//! ```

mod analyze;
mod common;
mod conflicts;
mod exclude;
mod path;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

pub use common::{CommandContext, SourceArgs, find_manifest};

/// Settings derived from the global flags.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Log filter when `RUST_LOG` is unset; `None` disables logging
    pub log_level: Option<String>,
    /// Hide spinners
    pub no_progress: bool,
    /// Explicit config file
    pub config_path: Option<PathBuf>,
}

impl CliConfig {
    /// Default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the stderr tracing subscriber. `RUST_LOG` takes precedence
    /// over the flags. Safe to call more than once.
    pub fn init_logging(&self) {
        let filter = if std::env::var_os("RUST_LOG").is_some() {
            EnvFilter::from_default_env()
        } else if let Some(level) = &self.log_level {
            EnvFilter::new(level)
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }
}

/// Maven dependency assistant.
#[derive(Parser)]
#[command(
    name = "mvn-assist",
    about = "Maven dependency assistant - inspect dependency trees and add exclusions",
    version,
    long_about = "mvn-assist projects a resolved Maven dependency graph into a deduplicated tree \
                  annotated with conflicts, scopes, exclusions and jar sizes, and edits pom.xml \
                  exclusions without disturbing the rest of the file."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress logging and progress output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Path to a config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Disable spinners
    #[arg(long, global = true)]
    no_progress: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the projected dependency tree
    Analyze(analyze::AnalyzeCommand),

    /// Add an exclusion to a dependency declaration
    Exclude(exclude::ExcludeCommand),

    /// List every release of the graph with its conflict flag
    Conflicts(conflicts::ConflictsCommand),

    /// Show which dependency introduced an artifact
    Path(path::PathCommand),
}

impl Cli {
    /// Run the selected command.
    pub async fn execute(self) -> Result<()> {
        let config = self.build_config();
        config.init_logging();
        self.execute_with_config(config).await
    }

    /// Translate the global flags into a [`CliConfig`].
    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            Some("debug".to_string())
        } else if self.quiet {
            None
        } else {
            Some("warn".to_string())
        };

        CliConfig {
            log_level,
            no_progress: self.no_progress || self.quiet,
            config_path: self.config.clone(),
        }
    }

    /// Run the selected command with explicit settings.
    pub async fn execute_with_config(self, config: CliConfig) -> Result<()> {
        match self.command {
            Commands::Analyze(cmd) => cmd.execute(&config).await,
            Commands::Exclude(cmd) => cmd.execute(&config).await,
            Commands::Conflicts(cmd) => cmd.execute(&config).await,
            Commands::Path(cmd) => cmd.execute(&config).await,
        }
    }
}
