//! mvn-assist CLI entry point
//!
//! Parses the command line, runs the selected command and turns any failure
//! into a readable message with a suggestion.
//!
//! - `analyze` - Print the projected dependency tree of a POM
//! - `exclude` - Add an exclusion to a dependency declaration
//! - `conflicts` - List releases and whether they lost mediation
//! - `path` - Show which POM introduced a dependency

use anyhow::Result;
use clap::Parser;
use mvn_assist::cli;
use mvn_assist::core::error::user_friendly_error;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    match cli.execute().await {
        Ok(()) => Ok(()),
        Err(e) => {
            let error_ctx = user_friendly_error(e);
            error_ctx.display();
            std::process::exit(1);
        }
    }
}
