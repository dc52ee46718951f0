//! mvn-assist - Maven dependency assistant
//!
//! Library behind an editor-integrated dependency view for Maven projects. It
//! does two things:
//!
//! 1. **Projection**: takes the raw dependency graph produced by a resolver and
//!    turns it into a tree where every artifact release is expanded exactly
//!    once, at its shallowest occurrence, annotated with scope, size, declared
//!    exclusions and whether mediation dropped it.
//! 2. **Exclusion patching**: adds an `<exclusion>` to a dependency declaration
//!    in `pom.xml` without reformatting anything else in the file.
//!
//! # Architecture Overview
//!
//! The resolver, the effective-model builder and the effective-classpath lister
//! are collaborators behind the traits in [`collaborators`]. The crate ships
//! file-backed implementations of all three so the CLI works on exported build
//! output, but an editor backend can plug in its own.
//!
//! ```text
//! request ─► service ─► cache hit? ─► payload
//!                  └─► collaborators ─► index + size ─► projector ─► cache ─► payload
//!
//! exclude ─► service ─► pom::patch ─► atomic rewrite
//! ```
//!
//! # Core Modules
//!
//! - [`models`] - Coordinates, raw and projected graph nodes, manifest model
//! - [`index`] - Effective coordinate/scope index and the exclusion map
//! - [`size`] - Artifact size lookups with a shared cache and parallel preload
//! - [`projector`] - Graph projection, conflict report and dependency paths
//! - [`pom`] - Whitespace-preserving XML tree, POM model builder, exclusion patch
//! - [`cache`] - TTL and mtime gated cache of serialized projections
//! - [`collaborators`] - Resolver, model builder and classpath lister seams
//! - [`service`] - Request orchestration and JSON payloads
//!
//! ## Supporting Modules
//! - [`cli`] - Command-line interface
//! - [`config`] - `~/.mvn-assist/config.toml`
//! - [`core`] - Error types and user-facing error formatting
//! - [`constants`] - Defaults shared across modules
//! - [`utils`] - Atomic writes, file timestamps, progress spinner
//!
//! # Example
//!
//! ```rust,no_run
//! use mvn_assist::collaborators::{DependencyListReport, GraphFileResolver};
//! use mvn_assist::config::AssistConfig;
//! use mvn_assist::pom::PomModelBuilder;
//! use mvn_assist::service::DependencyService;
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let service = DependencyService::new(
//!     &AssistConfig::default(),
//!     Arc::new(GraphFileResolver::new("target/dependency-graph.json")),
//!     Arc::new(PomModelBuilder::new()),
//!     Arc::new(DependencyListReport::new("target/dependency-list.txt")),
//! )?;
//! let payload = service.analyze(Path::new("pom.xml")).await;
//! println!("{payload}");
//! # Ok(())
//! # }
//! ```

// Core functionality modules
pub mod cache;
pub mod cli;
pub mod collaborators;
pub mod config;
pub mod core;
pub mod service;

// Dependency analysis
pub mod index;
pub mod models;
pub mod projector;
pub mod size;

// Manifest handling
pub mod pom;

// Supporting modules
pub mod constants;
pub mod utils;

// test_utils module is available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
