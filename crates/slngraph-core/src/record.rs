//! Input records consumed by the graph builder.
//!
//! A [`ProjectRecord`] is everything the engine knows about one solution
//! entry: its name, where it came from, whether a build script backs it,
//! and the raw names of the projects it references. Records are produced by
//! the solution loader (or built by hand in tests) and become the payload of
//! [`crate::GraphNode`]s.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// A reference from one project to another, as declared in the build script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectReference {
    /// Name of the referenced project.
    pub name: String,
    /// The raw `Include` path, or an empty string if not available.
    #[serde(default)]
    pub include: String,
}

impl ProjectReference {
    /// Create a reference with an `Include` path.
    pub fn new(name: impl Into<String>, include: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            include: include.into(),
        }
    }

    /// Create a reference known only by name.
    pub fn named(name: impl Into<String>) -> Self {
        Self::new(name, String::new())
    }
}

/// One project as seen by the dependency graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRecord {
    /// Project name; the source of the project's identity key.
    pub name: String,
    /// Human label for rendering.
    pub label: String,
    /// Project file path, or the solution-relative entry path for stubs.
    pub source_path: PathBuf,
    /// Solution GUID of the project, when known.
    #[serde(default)]
    pub project_id: Option<String>,
    /// Friendly project type name, when known.
    #[serde(default)]
    pub project_type: Option<String>,
    /// Path of the project in the solution folder tree (`/Folder/Name`).
    #[serde(default)]
    pub tree_path: Option<String>,
    /// True when no build script backs this entry (e.g. a solution folder).
    #[serde(default)]
    pub is_stub: bool,
    /// The SDK declared by the project file, if any.
    #[serde(default)]
    pub sdk: Option<String>,
    /// Target frameworks, in declaration order.
    #[serde(default)]
    pub frameworks: Vec<String>,
    /// Declared project references, in declaration order. May dangle.
    #[serde(default)]
    pub references: Vec<ProjectReference>,
}

impl ProjectRecord {
    /// Create a record for a project backed by a build script.
    pub fn new(name: impl Into<String>, source_path: impl AsRef<Path>) -> Self {
        let name = name.into();
        Self {
            label: name.clone(),
            name,
            source_path: source_path.as_ref().to_path_buf(),
            project_id: None,
            project_type: None,
            tree_path: None,
            is_stub: false,
            sdk: None,
            frameworks: Vec::new(),
            references: Vec::new(),
        }
    }

    /// Create a stub record (no build script, no references).
    pub fn stub(name: impl Into<String>, source_path: impl AsRef<Path>) -> Self {
        Self {
            is_stub: true,
            ..Self::new(name, source_path)
        }
    }

    /// Replace the human label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Append references known only by name.
    #[must_use]
    pub fn with_references<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.references
            .extend(names.into_iter().map(ProjectReference::named));
        self
    }

    /// Append one fully described reference.
    #[must_use]
    pub fn with_reference(mut self, reference: ProjectReference) -> Self {
        self.references.push(reference);
        self
    }

    /// Set the solution GUID.
    #[must_use]
    pub fn with_project_id(mut self, id: impl Into<String>) -> Self {
        self.project_id = Some(id.into());
        self
    }

    /// Set the friendly project type name.
    #[must_use]
    pub fn with_project_type(mut self, project_type: impl Into<String>) -> Self {
        self.project_type = Some(project_type.into());
        self
    }

    /// Set the solution tree path.
    #[must_use]
    pub fn with_tree_path(mut self, tree_path: impl Into<String>) -> Self {
        self.tree_path = Some(tree_path.into());
        self
    }

    /// Set the SDK.
    #[must_use]
    pub fn with_sdk(mut self, sdk: impl Into<String>) -> Self {
        self.sdk = Some(sdk.into());
        self
    }

    /// Append target frameworks.
    #[must_use]
    pub fn with_frameworks<I, S>(mut self, frameworks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.frameworks
            .extend(frameworks.into_iter().map(Into::into));
        self
    }

    /// The solution tree path, falling back to `/<label>`.
    #[must_use]
    pub fn tree_path_or_default(&self) -> String {
        self.tree_path
            .clone()
            .unwrap_or_else(|| format!("/{}", self.label))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_record_defaults_label_to_name() {
        let record = ProjectRecord::new("Core", "src/Core/Core.csproj");
        assert_eq!(record.label, "Core");
        assert!(!record.is_stub);
        assert!(record.references.is_empty());
        assert_eq!(record.tree_path_or_default(), "/Core");
    }

    #[test]
    fn stub_record_is_flagged() {
        let record = ProjectRecord::stub("docs", "docs");
        assert!(record.is_stub);
        assert_eq!(record.source_path, PathBuf::from("docs"));
    }

    #[test]
    fn builder_methods_accumulate() {
        let record = ProjectRecord::new("App", "App.csproj")
            .with_references(["Core", "Util"])
            .with_reference(ProjectReference::new("Data", r"..\Data\Data.csproj"))
            .with_sdk("Microsoft.NET.Sdk")
            .with_frameworks(["net8.0", "net48"])
            .with_tree_path("/src/App");

        let names: Vec<&str> = record.references.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Core", "Util", "Data"]);
        assert_eq!(record.references[2].include, r"..\Data\Data.csproj");
        assert_eq!(record.sdk.as_deref(), Some("Microsoft.NET.Sdk"));
        assert_eq!(record.frameworks, vec!["net8.0", "net48"]);
        assert_eq!(record.tree_path_or_default(), "/src/App");
    }
}
