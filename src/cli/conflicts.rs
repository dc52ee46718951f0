//! List every release of the raw graph and whether it lost mediation.

use anyhow::{Result, bail};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

use super::CliConfig;
use super::common::{CommandContext, SourceArgs};
use crate::projector::ConflictEntry;
use crate::service::ErrorPayload;
use crate::utils::progress::spinner_with_message;

/// Arguments of `mvn-assist conflicts`.
#[derive(Args, Debug)]
pub struct ConflictsCommand {
    /// Path to pom.xml or its directory (default: nearest pom.xml)
    pom: Option<PathBuf>,

    #[command(flatten)]
    sources: SourceArgs,

    /// Output format: text or json
    #[arg(short = 'f', long, default_value = "text")]
    format: String,

    /// Only print releases dropped by conflict
    #[arg(long)]
    dropped_only: bool,
}

impl ConflictsCommand {
    /// Build the report and print it.
    pub async fn execute(self, cli: &CliConfig) -> Result<()> {
        if !matches!(self.format.as_str(), "text" | "json") {
            bail!("Invalid format '{}'. Valid formats are: text, json", self.format);
        }

        let context = CommandContext::load(self.pom.clone(), cli).await?;
        let service = context.service(&self.sources)?;

        let spinner = spinner_with_message("Collecting conflicts...", cli.no_progress);
        let payload = service.conflicts(&context.manifest_path).await;
        spinner.finish_and_clear();

        if let Ok(failure) = serde_json::from_str::<ErrorPayload>(&payload) {
            bail!(failure.error);
        }

        let mut entries: Vec<ConflictEntry> = serde_json::from_str(&payload)?;
        if self.dropped_only {
            entries.retain(|entry| entry.dropped_by_conflict);
        }

        if self.format == "json" {
            println!("{}", serde_json::to_string(&entries)?);
            return Ok(());
        }

        for entry in &entries {
            let coordinate = entry.coordinate.to_string();
            if entry.dropped_by_conflict {
                println!("{} [{}] {}", coordinate.red(), entry.scope, "dropped".yellow());
            } else {
                println!("{} [{}]", coordinate.green(), entry.scope);
            }
        }
        let dropped = entries.iter().filter(|e| e.dropped_by_conflict).count();
        println!("\n{} releases, {} dropped by conflict", entries.len(), dropped);
        Ok(())
    }
}
