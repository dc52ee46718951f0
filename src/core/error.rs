//! Error handling for mvn-assist
//!
//! Two layers, mirroring how failures travel through the tool:
//!
//! - [`AssistError`] - strongly typed failures raised by the indices, the
//!   projector, the patch engine and the collaborator adapters
//! - [`ErrorContext`] - a wrapper adding a suggestion and details for CLI users
//!
//! Library code returns `Result<T, AssistError>` or `anyhow::Result<T>` with
//! `.context(...)`. The service layer turns failures into structured JSON
//! payloads; only the CLI ever renders an [`ErrorContext`].
//!
//! ```rust,no_run
//! use mvn_assist::core::{AssistError, user_friendly_error};
//!
//! let err = AssistError::ManifestNotFound {
//!     path: "pom.xml".to_string(),
//! };
//! user_friendly_error(anyhow::Error::from(err)).display();
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for mvn-assist operations.
#[derive(Error, Debug)]
pub enum AssistError {
    /// Manifest file does not exist
    #[error("Manifest file not found: {path}")]
    ManifestNotFound {
        /// Path that was requested
        path: String,
    },

    /// No dependency declaration matched the requested coordinate.
    ///
    /// The rendered message always contains "not found"; editor clients match
    /// on that substring.
    #[error("Root dependency not found: {dependency}")]
    DependencyNotFound {
        /// `groupId:artifactId[:version]` of the requested declaration
        dependency: String,
    },

    /// Manifest could not be parsed as XML
    #[error("Invalid manifest file syntax in {file}: {reason}")]
    ManifestParseError {
        /// Path to the manifest
        file: String,
        /// Parser message
        reason: String,
    },

    /// File system operation failed
    #[error("File system error during {operation}: {path}")]
    FileSystemError {
        /// The operation that failed (read, write, rename, ...)
        operation: String,
        /// Path involved in the failure
        path: String,
    },

    /// Exported resolver graph could not be loaded
    #[error("Failed to load dependency graph from {path}: {reason}")]
    GraphLoadError {
        /// Path of the graph export
        path: String,
        /// Underlying failure
        reason: String,
    },

    /// Effective classpath listing could not be read
    #[error("Failed to read effective classpath from {path}: {reason}")]
    ClasspathListError {
        /// Path of the listing
        path: String,
        /// Underlying failure
        reason: String,
    },

    /// Upstream collaborator failed during analysis
    #[error("Dependency analysis exception: {reason}")]
    AnalysisFailed {
        /// Underlying failure
        reason: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the configuration error
        message: String,
    },

    /// Malformed `group:artifact[:version]` argument
    #[error("Invalid coordinate '{input}', expected {expected}")]
    InvalidCoordinate {
        /// What the user passed
        input: String,
        /// Accepted shape
        expected: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// Other error
    #[error("{message}")]
    Other {
        /// Generic error message
        message: String,
    },
}

impl AssistError {
    /// Whether this failure means something requested does not exist.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::ManifestNotFound { .. } | Self::DependencyNotFound { .. })
    }
}

impl Clone for AssistError {
    fn clone(&self) -> Self {
        match self {
            Self::ManifestNotFound {
                path,
            } => Self::ManifestNotFound {
                path: path.clone(),
            },
            Self::DependencyNotFound {
                dependency,
            } => Self::DependencyNotFound {
                dependency: dependency.clone(),
            },
            Self::ManifestParseError {
                file,
                reason,
            } => Self::ManifestParseError {
                file: file.clone(),
                reason: reason.clone(),
            },
            Self::FileSystemError {
                operation,
                path,
            } => Self::FileSystemError {
                operation: operation.clone(),
                path: path.clone(),
            },
            Self::GraphLoadError {
                path,
                reason,
            } => Self::GraphLoadError {
                path: path.clone(),
                reason: reason.clone(),
            },
            Self::ClasspathListError {
                path,
                reason,
            } => Self::ClasspathListError {
                path: path.clone(),
                reason: reason.clone(),
            },
            Self::AnalysisFailed {
                reason,
            } => Self::AnalysisFailed {
                reason: reason.clone(),
            },
            Self::ConfigError {
                message,
            } => Self::ConfigError {
                message: message.clone(),
            },
            Self::InvalidCoordinate {
                input,
                expected,
            } => Self::InvalidCoordinate {
                input: input.clone(),
                expected: expected.clone(),
            },
            // For errors that don't implement Clone, convert to Other
            Self::IoError(e) => Self::Other {
                message: format!("IO error: {e}"),
            },
            Self::JsonError(e) => Self::Other {
                message: format!("JSON error: {e}"),
            },
            Self::TomlError(e) => Self::Other {
                message: format!("TOML parsing error: {e}"),
            },
            Self::Other {
                message,
            } => Self::Other {
                message: message.clone(),
            },
        }
    }
}

/// Error context wrapper that provides user-friendly error information.
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: AssistError,
    /// What the user can do about it
    pub suggestion: Option<String>,
    /// Background on why it happened
    pub details: Option<String>,
}

impl ErrorContext {
    /// Wrap an error without suggestion or details.
    #[must_use]
    pub const fn new(error: AssistError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Attach a suggestion.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Attach details.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error to stderr with colours.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error into an [`ErrorContext`] with a suggestion where one is known.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(assist_error) = error.downcast_ref::<AssistError>() {
        return create_error_context(assist_error.clone());
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        match io_error.kind() {
            std::io::ErrorKind::PermissionDenied => {
                return ErrorContext::new(AssistError::FileSystemError {
                    operation: "file access".to_string(),
                    path: "unknown".to_string(),
                })
                .with_suggestion("Check file ownership and write permissions on the manifest and its directory")
                .with_details("mvn-assist rewrites the manifest in place through a temporary file next to it");
            }
            std::io::ErrorKind::NotFound => {
                return ErrorContext::new(AssistError::FileSystemError {
                    operation: "file access".to_string(),
                    path: "unknown".to_string(),
                })
                .with_suggestion("Check that the file or directory exists and the path is correct")
                .with_details(
                    "This error occurs when a required file or directory cannot be found",
                );
            }
            _ => {}
        }
    }

    if let Some(toml_error) = error.downcast_ref::<toml::de::Error>() {
        return ErrorContext::new(AssistError::ConfigError {
            message: toml_error.to_string(),
        })
        .with_suggestion("Check the TOML syntax of your mvn-assist config file")
        .with_details("Configuration is read from --config, MVN_ASSIST_CONFIG or ~/.mvn-assist/config.toml");
    }

    // Generic error - include the full error chain for better diagnostics
    let mut message = error.to_string();

    let chain: Vec<String> =
        error.chain().skip(1).map(std::string::ToString::to_string).collect();

    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    ErrorContext::new(AssistError::Other {
        message,
    })
}

fn create_error_context(error: AssistError) -> ErrorContext {
    match &error {
        AssistError::ManifestNotFound { .. } => ErrorContext::new(error)
            .with_suggestion("Pass the path to a pom.xml, or run the command from a directory containing one"),

        AssistError::DependencyNotFound { .. } => ErrorContext::new(error)
            .with_suggestion("Check the groupId and artifactId, and pass the version when the manifest declares the same artifact more than once")
            .with_details("Only <dependency> declarations written in the manifest itself can receive exclusions"),

        AssistError::ManifestParseError { .. } => ErrorContext::new(error)
            .with_suggestion("Fix the XML syntax of the manifest; the file was left unchanged"),

        AssistError::GraphLoadError { .. } => ErrorContext::new(error)
            .with_suggestion("Export the resolved graph as JSON with groupId, artifactId, version, scope and children fields"),

        AssistError::ClasspathListError { .. } => ErrorContext::new(error)
            .with_suggestion("Save the output of 'mvn dependency:list' to a file and pass it with --classpath"),

        AssistError::InvalidCoordinate { expected, .. } => {
            let suggestion = format!("Use the form {expected}, e.g. org.slf4j:slf4j-api");
            ErrorContext::new(error).with_suggestion(suggestion)
        }

        AssistError::ConfigError { .. } => ErrorContext::new(error)
            .with_suggestion("Check the TOML syntax of your mvn-assist config file"),

        _ => ErrorContext::new(error.clone()),
    }
}
