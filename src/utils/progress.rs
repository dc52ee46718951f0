//! Terminal spinner shown while an analysis runs.
//!
//! Draws to stderr only when stderr is a terminal and `MVN_ASSIST_NO_PROGRESS`
//! is unset, so JSON on stdout stays clean for scripts.

use crate::constants::NO_PROGRESS_ENV_VAR;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::IsTerminal;
use std::time::Duration;

fn is_progress_disabled() -> bool {
    std::env::var_os(NO_PROGRESS_ENV_VAR).is_some() || !std::io::stderr().is_terminal()
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::default_spinner()
        .template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
}

/// A spinner with a message, hidden when progress output is disabled.
pub fn spinner_with_message(msg: impl Into<String>, quiet: bool) -> ProgressBar {
    let bar = if quiet || is_progress_disabled() {
        ProgressBar::hidden()
    } else {
        let bar = ProgressBar::new_spinner();
        bar.set_style(spinner_style());
        bar.enable_steady_tick(Duration::from_millis(100));
        bar
    };
    bar.set_message(msg.into());
    bar
}
