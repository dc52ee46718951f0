//! Core error types shared by every subsystem.
//!
//! See [`error`] for the typed [`AssistError`] and the CLI-facing
//! [`ErrorContext`].

pub mod error;

pub use error::{AssistError, ErrorContext, user_friendly_error};
