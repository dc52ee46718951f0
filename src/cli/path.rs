//! Show which dependency introduced an artifact and where its POM declares it.

use anyhow::{Result, anyhow};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

use super::CliConfig;
use super::common::{CommandContext, SourceArgs};
use crate::models::DependencyTarget;

/// Arguments of `mvn-assist path`.
#[derive(Args, Debug)]
pub struct PathCommand {
    /// Path to pom.xml or its directory (default: nearest pom.xml)
    pom: Option<PathBuf>,

    #[command(flatten)]
    sources: SourceArgs,

    /// Artifact to look for, as groupId:artifactId[:version]
    #[arg(long, value_name = "COORDINATE")]
    dependency: DependencyTarget,

    /// Output format: text or json
    #[arg(short = 'f', long, default_value = "text")]
    format: String,
}

impl PathCommand {
    /// Look the artifact up and print where it comes from.
    pub async fn execute(self, cli: &CliConfig) -> Result<()> {
        if !matches!(self.format.as_str(), "text" | "json") {
            return Err(anyhow!("Invalid format '{}'. Valid formats are: text, json", self.format));
        }

        let context = CommandContext::load(self.pom.clone(), cli).await?;
        let service = context.service(&self.sources)?;
        let payload = service.dependency_path(&context.manifest_path, &self.dependency).await;

        if self.format == "json" {
            println!("{}", serde_json::to_string(&payload)?);
        } else if payload.success {
            println!(
                "{} is declared by {}:{}:{}",
                self.dependency.to_string().cyan(),
                payload.parent_group_id.as_deref().unwrap_or_default(),
                payload.parent_artifact_id.as_deref().unwrap_or_default(),
                payload.parent_version.as_deref().unwrap_or_default()
            );
            let pom = payload.parent_pom_path.as_deref().unwrap_or_default();
            match payload.line_number {
                Some(line) => println!("  {pom}:{line}"),
                None => println!("  {pom}"),
            }
            if let Some(error) = &payload.error {
                println!("  {}", error.yellow());
            }
        }

        if payload.success {
            Ok(())
        } else {
            Err(anyhow!(payload.error.unwrap_or_else(|| "Dependency path not found".to_string())))
        }
    }
}
