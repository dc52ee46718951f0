//! Cross-cutting helpers.
//!
//! - [`fs`] - atomic manifest rewrite and modification-time lookup
//! - [`progress`] - stderr spinner for long analyses

pub mod fs;
pub mod progress;

pub use fs::{atomic_write, modified_time};
