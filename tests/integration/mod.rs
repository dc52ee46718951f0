//! Integration test suite for mvn-assist
//!
//! End-to-end tests over the public library API and the compiled binary.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **projection**: canonical tree shape, promotion, drop and conflict flags
//! - **exclusion**: exclusion insertion, idempotence, format preservation
//! - **cache_behavior**: result cache gating and invalidation
//! - **cli**: `analyze`, `exclude`, `conflicts` and `path` through the binary

// Shared test utilities (from parent tests/ directory)
#[path = "../common/mod.rs"]
mod common;

mod cache_behavior;
mod cli;
mod projection;
