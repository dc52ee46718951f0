//! Print the projected dependency tree.
//!
//! ```text
//! pom.xml
//! ├── org.slf4j:slf4j-api:2.0.9 [compile] 63.2 KB
//! ├── com.example:client:1.4.0 [compile] 120.5 KB
//! │   ├── commons-logging:commons-logging:1.2 [compile] 60.4 KB
//! │   └── org.slf4j:slf4j-api:1.7.36 [compile] (dropped by conflict)
//! └── org.junit.jupiter:junit-jupiter:5.10.0 [test] 6.3 KB
//! ```
//!
//! Only the shallowest occurrence of a release is expanded; repeated
//! occurrences print as leaves.

use anyhow::{Result, bail};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

use super::CliConfig;
use super::common::{CommandContext, SourceArgs, format_size};
use crate::models::{ProjectedNode, TreeRoot};
use crate::service::ErrorPayload;
use crate::utils::progress::spinner_with_message;

/// Arguments of `mvn-assist analyze`.
#[derive(Args, Debug)]
pub struct AnalyzeCommand {
    /// Path to pom.xml or its directory (default: nearest pom.xml)
    pom: Option<PathBuf>,

    #[command(flatten)]
    sources: SourceArgs,

    /// Output format: tree or json
    #[arg(short = 'f', long, default_value = "tree")]
    format: String,

    /// Maximum depth to print in tree format
    #[arg(short = 'd', long)]
    depth: Option<usize>,
}

impl AnalyzeCommand {
    /// Run the analysis and print it.
    pub async fn execute(self, cli: &CliConfig) -> Result<()> {
        self.validate_arguments()?;

        let context = CommandContext::load(self.pom.clone(), cli).await?;
        let service = context.service(&self.sources)?;

        let spinner = spinner_with_message("Analyzing dependencies...", cli.no_progress);
        let payload = service.analyze(&context.manifest_path).await;
        spinner.finish_and_clear();

        if let Ok(failure) = serde_json::from_str::<ErrorPayload>(&payload) {
            bail!(failure.error);
        }

        if self.format == "json" {
            println!("{payload}");
            return Ok(());
        }

        let tree: TreeRoot = serde_json::from_str(&payload)?;
        println!("{}", context.manifest_path.display().to_string().bold());
        for line in render_tree(&tree, self.depth) {
            println!("{line}");
        }
        Ok(())
    }

    fn validate_arguments(&self) -> Result<()> {
        match self.format.as_str() {
            "tree" | "json" => {}
            other => bail!("Invalid format '{other}'. Valid formats are: tree, json"),
        }
        if self.depth == Some(0) {
            bail!("Depth must be at least 1");
        }
        Ok(())
    }
}

/// Render a projected tree with box-drawing connectors, `depth` levels deep.
#[must_use]
pub fn render_tree(tree: &TreeRoot, depth: Option<usize>) -> Vec<String> {
    let mut lines = Vec::new();
    let top = tree.top_level();
    for (i, node) in top.iter().enumerate() {
        render_node(node, "", i + 1 == top.len(), 1, depth, &mut lines);
    }
    lines
}

fn render_node(
    node: &ProjectedNode,
    prefix: &str,
    last: bool,
    level: usize,
    depth: Option<usize>,
    lines: &mut Vec<String>,
) {
    let connector = if last {
        "└── "
    } else {
        "├── "
    };
    lines.push(format!("{prefix}{connector}{}", describe(node)));

    if depth.is_some_and(|max| level >= max) {
        return;
    }
    let child_prefix = format!(
        "{prefix}{}",
        if last {
            "    "
        } else {
            "│   "
        }
    );
    for (i, child) in node.children.iter().enumerate() {
        render_node(child, &child_prefix, i + 1 == node.children.len(), level + 1, depth, lines);
    }
}

fn describe(node: &ProjectedNode) -> String {
    let mut text = if node.dropped_by_conflict {
        node.coordinate.to_string().red().to_string()
    } else {
        node.coordinate.to_string().green().to_string()
    };
    text.push_str(&format!(" [{}]", node.scope).dimmed().to_string());
    if node.size > 0 {
        text.push(' ');
        text.push_str(&format_size(node.size));
    }
    if node.dropped_by_conflict {
        text.push_str(&" (dropped by conflict)".yellow().to_string());
    }
    if !node.exclusions.is_empty() {
        let excluded: Vec<String> = node.exclusions.iter().map(ToString::to_string).collect();
        text.push_str(&format!(" excludes {}", excluded.join(", ")).cyan().to_string());
    }
    text
}
