//! User configuration for mvn-assist.
//!
//! Settings live in a small TOML file. Every key is optional:
//!
//! ```toml
//! local_repository = "~/.m2/repository"
//! cache_ttl_secs = 300
//! size_timeout_ms = 5000
//! size_workers = 4
//! default_scope = "compile"
//! ```
//!
//! The file is looked up from the `--config` flag, then the
//! `MVN_ASSIST_CONFIG` environment variable, then `~/.mvn-assist/config.toml`.
//! A missing file yields the defaults; a malformed one is a
//! [`AssistError::ConfigError`].

use crate::constants::{
    CACHE_TTL, CONFIG_ENV_VAR, DEFAULT_LOCAL_REPOSITORY, DEFAULT_SCOPE, SIZE_LOOKUP_TIMEOUT,
    default_size_workers,
};
use crate::core::AssistError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;

/// Tunables for analysis and caching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistConfig {
    /// Root of the local artifact repository; `~` and `$VARS` are expanded
    pub local_repository: String,
    /// Result cache time-to-live in seconds
    pub cache_ttl_secs: u64,
    /// Deadline of one jar size lookup in milliseconds
    pub size_timeout_ms: u64,
    /// Size preload concurrency; unset means half the cores, at least 2
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_workers: Option<usize>,
    /// Scope shown when neither classpath nor declaration has one
    pub default_scope: String,
}

impl Default for AssistConfig {
    fn default() -> Self {
        Self {
            local_repository: DEFAULT_LOCAL_REPOSITORY.to_string(),
            cache_ttl_secs: CACHE_TTL.as_secs(),
            size_timeout_ms: u64::try_from(SIZE_LOOKUP_TIMEOUT.as_millis()).unwrap_or(5000),
            size_workers: None,
            default_scope: DEFAULT_SCOPE.to_string(),
        }
    }
}

impl AssistConfig {
    /// Load from an explicit path, else the env var, else the default path.
    pub async fn load_with_optional(path: Option<PathBuf>) -> Result<Self> {
        let path = match path {
            Some(path) => path,
            None => match std::env::var_os(CONFIG_ENV_VAR) {
                Some(value) if !value.is_empty() => PathBuf::from(value),
                _ => Self::default_path()?,
            },
        };

        if path.exists() {
            Self::load_from(&path).await
        } else {
            tracing::debug!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Load from a specific file.
    pub async fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        let config: Self = toml::from_str(&content).map_err(|e| AssistError::ConfigError {
            message: format!("{}: {}", path.display(), e.message()),
        })?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// `~/.mvn-assist/config.toml`.
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| anyhow::anyhow!("Unable to determine home directory"))?;
        Ok(home.join(".mvn-assist").join("config.toml"))
    }

    /// The local repository with `~` and environment variables expanded.
    pub fn local_repository_path(&self) -> Result<PathBuf> {
        let expanded = shellexpand::full(&self.local_repository).map_err(|e| {
            AssistError::ConfigError {
                message: format!(
                    "Failed to expand local_repository '{}': {}",
                    self.local_repository, e
                ),
            }
        })?;
        Ok(PathBuf::from(expanded.into_owned()))
    }

    /// Result cache time-to-live.
    #[must_use]
    pub const fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// Deadline of one size lookup.
    #[must_use]
    pub const fn size_timeout(&self) -> Duration {
        Duration::from_millis(self.size_timeout_ms)
    }

    /// Size preload concurrency.
    #[must_use]
    pub fn size_workers(&self) -> usize {
        self.size_workers.unwrap_or_else(default_size_workers).max(1)
    }
}
