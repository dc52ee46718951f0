//! Global constants used throughout mvn-assist.
//!
//! Timeouts, pool sizes and Maven vocabulary shared by several modules.
//! Most of these are defaults that [`AssistConfig`](crate::config::AssistConfig)
//! can override.

use std::time::Duration;

/// Time-to-live of a cached analysis result (5 minutes).
///
/// An entry is also invalidated as soon as the manifest's modification time
/// changes, so this only bounds staleness caused by changes outside the
/// manifest (local repository contents, parent POMs).
pub const CACHE_TTL: Duration = Duration::from_secs(300);

/// Per-task deadline for a jar size lookup (5 seconds).
///
/// A lookup that misses it is abandoned and logged; size is advisory.
pub const SIZE_LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);

/// Lower bound of the size preload worker pool.
pub const MIN_SIZE_WORKERS: usize = 2;

/// Core count assumed when the platform cannot report one.
pub const FALLBACK_CORE_COUNT: usize = 4;

/// Scope reported when neither the effective classpath nor the declaration
/// carries one.
pub const DEFAULT_SCOPE: &str = "compile";

/// Indentation unit used when it cannot be inferred from the document.
pub const DEFAULT_INDENT_UNIT: &str = "  ";

/// Marker identifying a property reference inside a version string.
pub const PLACEHOLDER_MARKER: &str = "${";

/// Maximum rounds of nested `${...}` expansion when interpolating a model.
pub const MAX_INTERPOLATION_DEPTH: usize = 8;

/// Scopes Maven assigns to classpath entries.
pub const MAVEN_SCOPES: &[&str] = &["compile", "provided", "runtime", "test", "system", "import"];

/// Scopes that survive below the direct dependencies of a project.
pub const TRANSITIVE_SCOPES: &[&str] = &["compile", "runtime"];

/// Identifier of the default remote repository.
pub const CENTRAL_REPOSITORY_ID: &str = "central";

/// URL of the default remote repository.
pub const CENTRAL_REPOSITORY_URL: &str = "https://repo.maven.apache.org/maven2/";

/// Default local repository location, before tilde expansion.
pub const DEFAULT_LOCAL_REPOSITORY: &str = "~/.m2/repository";

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "MVN_ASSIST_CONFIG";

/// Environment variable that hides spinners when set.
pub const NO_PROGRESS_ENV_VAR: &str = "MVN_ASSIST_NO_PROGRESS";

/// Manifest file name searched for when no path is given.
pub const MANIFEST_FILE: &str = "pom.xml";

/// Exported resolver graph, relative to the project directory.
pub const DEFAULT_GRAPH_FILE: &str = "target/dependency-graph.json";

/// Saved `mvn dependency:list` output, relative to the project directory.
pub const DEFAULT_CLASSPATH_FILE: &str = "target/dependency-list.txt";

/// Compute the size preload pool: half the cores, never fewer than
/// [`MIN_SIZE_WORKERS`].
#[must_use]
pub fn default_size_workers() -> usize {
    let cores = std::thread::available_parallelism()
        .map(std::num::NonZero::get)
        .unwrap_or(FALLBACK_CORE_COUNT);
    (cores / 2).max(MIN_SIZE_WORKERS)
}
