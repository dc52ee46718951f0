//! JSON payloads returned to editor clients.
//!
//! Field names follow what the editor extension already consumes. Optional
//! fields are omitted rather than sent as `null`.

use crate::projector::PomLocation;
use serde::{Deserialize, Serialize};

/// Failure of an analysis or conflict request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    /// Human readable failure
    pub error: String,
}

impl ErrorPayload {
    /// Serialized `{"error": ...}`.
    #[must_use]
    pub fn json(error: impl Into<String>) -> String {
        let payload = Self {
            error: error.into(),
        };
        serde_json::to_string(&payload)
            .unwrap_or_else(|_| r#"{"error":"Failed to serialize error"}"#.to_string())
    }
}

/// Response of an exclusion insertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExclusionPayload {
    /// Whether the manifest now carries the exclusion
    pub success: bool,
    /// Outcome description on success
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// 1-based line of the `<exclusion>` element on success
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlight_line: Option<usize>,
    /// Failure description; contains "not found" when nothing matched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExclusionPayload {
    /// The exclusion was written.
    #[must_use]
    pub fn inserted(line: usize) -> Self {
        Self::succeeded("Exclusion added successfully", line)
    }

    /// The exclusion was already declared.
    #[must_use]
    pub fn already_exists(line: usize) -> Self {
        Self::succeeded("Exclusion already exists", line)
    }

    /// The request failed.
    #[must_use]
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: None,
            highlight_line: None,
            error: Some(error.into()),
        }
    }

    fn succeeded(message: &str, line: usize) -> Self {
        Self {
            success: true,
            message: Some(message.to_string()),
            highlight_line: Some(line),
            error: None,
        }
    }
}

/// Where a transitive dependency is declared.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyPathPayload {
    /// Whether a parent was found
    pub success: bool,
    /// Local repository path of the parent's POM
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_pom_path: Option<String>,
    /// Parent `groupId`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_group_id: Option<String>,
    /// Parent `artifactId`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_artifact_id: Option<String>,
    /// Parent version
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_version: Option<String>,
    /// 1-based line of the target's `<artifactId>` in the parent POM
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_number: Option<usize>,
    /// 0-based column where the artifactId text starts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifact_id_start: Option<usize>,
    /// 0-based column where the artifactId text ends
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifact_id_end: Option<usize>,
    /// Failure description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DependencyPathPayload {
    /// A failed lookup.
    #[must_use]
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            ..Self::default()
        }
    }

    /// Fill in the position found inside the parent POM.
    #[must_use]
    pub fn at(mut self, location: PomLocation) -> Self {
        self.line_number = Some(location.line_number);
        self.artifact_id_start = Some(location.artifact_id_start);
        self.artifact_id_end = Some(location.artifact_id_end);
        self
    }
}

/// Entry counts of the process-wide caches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    /// Cached analysis results
    pub results: usize,
    /// Memoized jar sizes
    pub sizes: usize,
}
