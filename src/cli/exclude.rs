//! Add an `<exclusion>` to a dependency declaration.
//!
//! Only the inserted lines change; comments, attribute order and
//! indentation of the rest of the POM are left as they were. Running the same
//! command again reports that the exclusion already exists and writes nothing.

use anyhow::{Result, anyhow};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

use super::CliConfig;
use super::common::{CommandContext, SourceArgs};
use crate::models::{DependencyTarget, GroupArtifact};

/// Arguments of `mvn-assist exclude`.
#[derive(Args, Debug)]
pub struct ExcludeCommand {
    /// Path to pom.xml or its directory (default: nearest pom.xml)
    pom: Option<PathBuf>,

    /// Dependency to modify, as groupId:artifactId[:version]
    #[arg(long, value_name = "COORDINATE")]
    dependency: DependencyTarget,

    /// Library to exclude, as groupId:artifactId
    #[arg(long, value_name = "COORDINATE")]
    exclusion: GroupArtifact,

    /// Output format: text or json
    #[arg(short = 'f', long, default_value = "text")]
    format: String,
}

impl ExcludeCommand {
    /// Insert the exclusion and report the outcome.
    pub async fn execute(self, cli: &CliConfig) -> Result<()> {
        if !matches!(self.format.as_str(), "text" | "json") {
            return Err(anyhow!("Invalid format '{}'. Valid formats are: text, json", self.format));
        }

        let context = CommandContext::load(self.pom.clone(), cli).await?;
        let service = context.service(&SourceArgs::default())?;
        let payload =
            service.insert_exclusion(&context.manifest_path, &self.dependency, &self.exclusion).await;

        if self.format == "json" {
            println!("{}", serde_json::to_string(&payload)?);
        } else if payload.success {
            println!(
                "{} {} on {} ({}:{})",
                "✓".green(),
                payload.message.as_deref().unwrap_or_default(),
                self.dependency.to_string().cyan(),
                context.manifest_path.display(),
                payload.highlight_line.unwrap_or_default()
            );
        }

        match payload.error {
            Some(error) if !payload.success => Err(anyhow!(error)),
            _ => Ok(()),
        }
    }
}
