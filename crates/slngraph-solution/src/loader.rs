//! Solution loading.
//!
//! [`Solution::load`] parses the `.sln`, then loads the project file behind
//! every entry. Entries without one become stubs:
//!
//! - solution folders and setup projects never have a project file,
//! - entries whose project file is missing on disk are stubs too.
//!
//! A project file that exists but cannot be parsed fails the whole load.

use std::path::{Path, PathBuf};

use slngraph_core::{ProjectRecord, ProjectReference};
use tracing::{debug, info, instrument};

use crate::error::SolutionError;
use crate::project_file::{ProjectFile, ProjectFileReference};
use crate::sln::{SolutionInfo, SolutionProjectInfo};
use crate::tree::{SolutionTreeNode, solution_tree};

// ---------------------------------------------------------------------------
// ProjectDetails
// ---------------------------------------------------------------------------

/// A solution entry together with its parsed project file, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDetails {
    pub info: SolutionProjectInfo,
    /// `/Folder/Label` position in the solution tree.
    pub tree_path: String,
    /// Absolute location of the loaded project file.
    pub project_file: Option<PathBuf>,
    /// Parsed content; `None` for stubs.
    pub content: Option<ProjectFile>,
}

impl ProjectDetails {
    #[must_use]
    pub fn label(&self) -> &str {
        &self.info.label
    }

    /// True when no project file backs this entry.
    #[must_use]
    pub const fn is_stub(&self) -> bool {
        self.content.is_none()
    }

    /// Declared project references (empty for stubs).
    #[must_use]
    pub fn references(&self) -> &[ProjectFileReference] {
        self.content
            .as_ref()
            .map(|content| content.references.as_slice())
            .unwrap_or_default()
    }

    /// Convert into a graph input record.
    ///
    /// Solution folders and other containers are keyed on their tree path
    /// (`/Web/tests`), since sibling folders under different parents often
    /// share a label. Projects keep their label as the key so references
    /// can resolve to them.
    #[must_use]
    pub fn to_record(&self) -> ProjectRecord {
        let mut record = if self.info.is_container() {
            ProjectRecord::stub(&self.tree_path, &self.tree_path).with_label(&self.info.label)
        } else if self.is_stub() {
            ProjectRecord::stub(&self.info.label, self.info.relative_path())
        } else {
            ProjectRecord::new(&self.info.label, self.info.relative_path())
        };
        record = record
            .with_project_id(&self.info.id)
            .with_project_type(self.info.type_name())
            .with_tree_path(&self.tree_path);

        if let Some(content) = &self.content {
            if let Some(sdk) = &content.sdk {
                record = record.with_sdk(sdk);
            }
            record = record.with_frameworks(content.frameworks.iter().cloned());
            for reference in &content.references {
                record = record.with_reference(ProjectReference::new(
                    &reference.name,
                    &reference.include,
                ));
            }
        }
        record
    }
}

// ---------------------------------------------------------------------------
// Solution
// ---------------------------------------------------------------------------

/// A parsed solution with every project loaded.
#[derive(Debug, Clone)]
pub struct Solution {
    info: SolutionInfo,
    projects: Vec<ProjectDetails>,
}

impl Solution {
    /// Load a solution file and all of its project files.
    ///
    /// # Errors
    ///
    /// Any [`SolutionError`] from parsing the solution or a project file.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SolutionError> {
        Self::from_info(SolutionInfo::from_file(path)?)
    }

    /// Load the project files of an already parsed solution.
    ///
    /// # Errors
    ///
    /// Any [`SolutionError`] from reading a project file.
    pub fn from_info(info: SolutionInfo) -> Result<Self, SolutionError> {
        let projects = info
            .projects()
            .iter()
            .map(|project| load_project(&info, project))
            .collect::<Result<Vec<_>, _>>()?;

        let stubs = projects.iter().filter(|p| p.is_stub()).count();
        info!(
            solution = %info.name,
            projects = projects.len(),
            stubs,
            "loaded solution"
        );
        Ok(Self { info, projects })
    }

    #[must_use]
    pub const fn info(&self) -> &SolutionInfo {
        &self.info
    }

    /// Loaded entries in declaration order.
    #[must_use]
    pub fn projects(&self) -> &[ProjectDetails] {
        &self.projects
    }

    /// Graph input records, one per entry, in declaration order.
    #[must_use]
    pub fn to_records(&self) -> Vec<ProjectRecord> {
        self.projects.iter().map(ProjectDetails::to_record).collect()
    }

    /// The solution-folder tree.
    ///
    /// # Errors
    ///
    /// [`SolutionError::NestingTooDeep`] for overly deep folder nesting.
    pub fn tree(&self) -> Result<Vec<SolutionTreeNode>, SolutionError> {
        solution_tree(&self.info)
    }
}

fn load_project(
    info: &SolutionInfo,
    project: &SolutionProjectInfo,
) -> Result<ProjectDetails, SolutionError> {
    let tree_path = info.tree_path(project);
    let project_file = if project.is_container() {
        None
    } else {
        let found = info.project_file(project);
        if found.is_none() {
            debug!(project = %project.label, path = %project.path, "project file not found, using stub");
        }
        found
    };

    let content = project_file
        .as_deref()
        .map(ProjectFile::from_file)
        .transpose()?;

    Ok(ProjectDetails {
        info: project.clone(),
        tree_path,
        project_file,
        content,
    })
}
