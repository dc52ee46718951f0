//! POM reading and format-preserving editing.
//!
//! - [`document`] - XML node tree that serializes back byte for byte
//! - [`indent`] - indentation inferred from surrounding whitespace
//! - [`patch`] - idempotent `<exclusion>` insertion
//! - [`model`] - interpolated [`ManifestModel`](crate::models::ManifestModel)
//!   built from the POM file alone

pub mod document;
pub mod indent;
pub mod model;
pub mod patch;

pub use document::{NodePath, XmlDocument, XmlElement, XmlError, XmlNode};
pub use indent::IndentProfile;
pub use model::PomModelBuilder;
pub use patch::{InsertOutcome, apply_exclusion, find_dependency, insert_exclusion, patch_source};
