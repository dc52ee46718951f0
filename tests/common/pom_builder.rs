//! Fluent builder for `pom.xml` files in tests
//!
//! ```rust
//! use crate::common::PomBuilder;
//!
//! let pom = PomBuilder::new("org.demo", "app", "1.0.0")
//!     .property("bar.version", "1.0")
//!     .dependency("org.foo", "bar", Some("${bar.version}"))
//!     .dependency_with("org.junit", "junit", |d| d.version("4.13.2").scope("test"))
//!     .build();
//! ```
//!
//! Output uses two-space indentation and one element per line, the layout
//! `mvn archetype:generate` produces.

/// One `<dependency>` entry.
#[derive(Debug, Clone, Default)]
pub struct DependencyEntry {
    group_id: String,
    artifact_id: String,
    version: Option<String>,
    scope: Option<String>,
    exclusions: Vec<(String, String)>,
}

impl DependencyEntry {
    /// Set `<version>`.
    pub fn version(mut self, version: &str) -> Self {
        self.version = Some(version.to_string());
        self
    }

    /// Set `<scope>`.
    pub fn scope(mut self, scope: &str) -> Self {
        self.scope = Some(scope.to_string());
        self
    }

    /// Add an `<exclusion>`.
    pub fn exclude(mut self, group_id: &str, artifact_id: &str) -> Self {
        self.exclusions.push((group_id.to_string(), artifact_id.to_string()));
        self
    }

    fn render(&self, indent: &str, out: &mut String) {
        let inner = format!("{indent}  ");
        out.push_str(&format!("{indent}<dependency>\n"));
        out.push_str(&format!("{inner}<groupId>{}</groupId>\n", self.group_id));
        out.push_str(&format!("{inner}<artifactId>{}</artifactId>\n", self.artifact_id));
        if let Some(version) = &self.version {
            out.push_str(&format!("{inner}<version>{version}</version>\n"));
        }
        if let Some(scope) = &self.scope {
            out.push_str(&format!("{inner}<scope>{scope}</scope>\n"));
        }
        if !self.exclusions.is_empty() {
            out.push_str(&format!("{inner}<exclusions>\n"));
            for (group, artifact) in &self.exclusions {
                out.push_str(&format!("{inner}  <exclusion>\n"));
                out.push_str(&format!("{inner}    <groupId>{group}</groupId>\n"));
                out.push_str(&format!("{inner}    <artifactId>{artifact}</artifactId>\n"));
                out.push_str(&format!("{inner}  </exclusion>\n"));
            }
            out.push_str(&format!("{inner}</exclusions>\n"));
        }
        out.push_str(&format!("{indent}</dependency>\n"));
    }
}

/// Builder for test POMs.
#[derive(Debug, Clone, Default)]
pub struct PomBuilder {
    group_id: String,
    artifact_id: String,
    version: String,
    properties: Vec<(String, String)>,
    dependencies: Vec<DependencyEntry>,
    managed: Vec<DependencyEntry>,
}

impl PomBuilder {
    /// Project with the given coordinate.
    pub fn new(group_id: &str, artifact_id: &str, version: &str) -> Self {
        Self {
            group_id: group_id.to_string(),
            artifact_id: artifact_id.to_string(),
            version: version.to_string(),
            ..Self::default()
        }
    }

    /// Add a `<properties>` entry.
    pub fn property(mut self, name: &str, value: &str) -> Self {
        self.properties.push((name.to_string(), value.to_string()));
        self
    }

    /// Add a dependency with an optional version.
    pub fn dependency(self, group_id: &str, artifact_id: &str, version: Option<&str>) -> Self {
        self.dependency_with(group_id, artifact_id, |d| match version {
            Some(version) => d.version(version),
            None => d,
        })
    }

    /// Add a dependency configured by `configure`.
    pub fn dependency_with(
        mut self,
        group_id: &str,
        artifact_id: &str,
        configure: impl FnOnce(DependencyEntry) -> DependencyEntry,
    ) -> Self {
        self.dependencies.push(configure(entry(group_id, artifact_id)));
        self
    }

    /// Add a `<dependencyManagement>` entry.
    pub fn managed_with(
        mut self,
        group_id: &str,
        artifact_id: &str,
        configure: impl FnOnce(DependencyEntry) -> DependencyEntry,
    ) -> Self {
        self.managed.push(configure(entry(group_id, artifact_id)));
        self
    }

    /// Render the POM.
    pub fn build(&self) -> String {
        let mut out = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        out.push_str("<project xmlns=\"http://maven.apache.org/POM/4.0.0\">\n");
        out.push_str("  <modelVersion>4.0.0</modelVersion>\n");
        out.push_str(&format!("  <groupId>{}</groupId>\n", self.group_id));
        out.push_str(&format!("  <artifactId>{}</artifactId>\n", self.artifact_id));
        out.push_str(&format!("  <version>{}</version>\n", self.version));

        if !self.properties.is_empty() {
            out.push_str("  <properties>\n");
            for (name, value) in &self.properties {
                out.push_str(&format!("    <{name}>{value}</{name}>\n"));
            }
            out.push_str("  </properties>\n");
        }

        if !self.managed.is_empty() {
            out.push_str("  <dependencyManagement>\n    <dependencies>\n");
            for dependency in &self.managed {
                dependency.render("      ", &mut out);
            }
            out.push_str("    </dependencies>\n  </dependencyManagement>\n");
        }

        if !self.dependencies.is_empty() {
            out.push_str("  <dependencies>\n");
            for dependency in &self.dependencies {
                dependency.render("    ", &mut out);
            }
            out.push_str("  </dependencies>\n");
        }

        out.push_str("</project>\n");
        out
    }
}

fn entry(group_id: &str, artifact_id: &str) -> DependencyEntry {
    DependencyEntry {
        group_id: group_id.to_string(),
        artifact_id: artifact_id.to_string(),
        ..DependencyEntry::default()
    }
}
