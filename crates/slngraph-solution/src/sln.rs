//! Visual Studio `.sln` parsing.
//!
//! # Overview
//!
//! A solution file is line oriented. The parser only looks at three kinds of
//! lines and ignores the rest:
//!
//! ```text
//! Microsoft Visual Studio Solution File, Format Version 12.00      header
//! Project("{TYPE}") = "Label", "Path\To\Label.csproj", "{GUID}"    project entry
//! GlobalSection(NestedProjects) = preSolution                       folder nesting
//!     {CHILD-GUID} = {PARENT-GUID}
//! EndGlobalSection
//! ```
//!
//! Blank lines and `#` comments are skipped. The header must be the first
//! significant line. GUIDs are normalized with
//! [`crate::project_types::normalize_guid`].

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, instrument, warn};

use crate::error::SolutionError;
use crate::project_types::{self, normalize_guid};

const HEADER: &str = "Microsoft Visual Studio Solution File, Format Version";
const NESTED_PROJECTS: &str = "GlobalSection(NestedProjects)";
const END_SECTION: &str = "EndGlobalSection";

// ---------------------------------------------------------------------------
// SolutionProjectInfo
// ---------------------------------------------------------------------------

/// One `Project(...)` entry of a solution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolutionProjectInfo {
    /// Normalized project type GUID.
    pub type_id: String,
    pub label: String,
    /// Path as written in the solution, relative to the solution folder.
    pub path: String,
    /// Normalized project GUID.
    pub id: String,
    /// GUID of the containing solution folder, if nested.
    pub parent: Option<String>,
    /// GUIDs of nested entries, in nesting-section order.
    pub children: Vec<String>,
}

impl SolutionProjectInfo {
    /// Parse a `Project("{TYPE}") = "Label", "Path", "{GUID}"` line.
    ///
    /// Returns `None` when the line does not match that shape.
    #[must_use]
    pub fn parse_header(line: &str) -> Option<Self> {
        let rest = line.trim().strip_prefix("Project(")?;
        let (type_text, rest) = rest.split_once(')')?;
        let rest = rest.trim_start().strip_prefix('=')?;

        let mut fields = rest.splitn(3, ',').map(|field| unquote(field.trim()));
        let label = fields.next().filter(|s| !s.is_empty())?;
        let path = fields.next().filter(|s| !s.is_empty())?;
        let id_text = fields.next()?;

        Some(Self {
            type_id: normalize_guid(type_text)?,
            label: label.to_string(),
            path: path.to_string(),
            id: normalize_guid(id_text)?,
            parent: None,
            children: Vec::new(),
        })
    }

    /// Friendly name of the project type.
    #[must_use]
    pub fn type_name(&self) -> String {
        project_types::project_type_name(&self.type_id)
    }

    #[must_use]
    pub fn is_solution_folder(&self) -> bool {
        self.type_id == project_types::SOLUTION_FOLDER
    }

    /// Folders and setup projects have no project file to load.
    #[must_use]
    pub fn is_container(&self) -> bool {
        project_types::is_container_type(&self.type_id)
    }

    /// The path with Windows separators converted for the host.
    #[must_use]
    pub fn relative_path(&self) -> PathBuf {
        self.path.split(['\\', '/']).filter(|part| !part.is_empty()).collect()
    }
}

fn unquote(text: &str) -> &str {
    text.strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .unwrap_or(text)
}

// ---------------------------------------------------------------------------
// SolutionInfo
// ---------------------------------------------------------------------------

/// The project entries of one solution file.
#[derive(Debug, Clone)]
pub struct SolutionInfo {
    /// Path of the solution file.
    pub path: PathBuf,
    /// Solution name (file stem).
    pub name: String,
    /// Directory containing the solution file.
    pub folder: PathBuf,
    projects: Vec<SolutionProjectInfo>,
    by_id: HashMap<String, usize>,
}

impl SolutionInfo {
    /// Read and parse a solution file.
    ///
    /// # Errors
    ///
    /// [`SolutionError::Io`] if the file cannot be read, otherwise the
    /// errors of [`SolutionInfo::parse`].
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SolutionError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| SolutionError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(path, &text)
    }

    /// Parse solution text. `path` locates the solution for relative paths
    /// and error messages; it is not read.
    ///
    /// # Errors
    ///
    /// - [`SolutionError::NotASolution`] when the header is missing.
    /// - [`SolutionError::MalformedLine`] for an unparseable `Project(` line.
    pub fn parse(path: impl AsRef<Path>, text: &str) -> Result<Self, SolutionError> {
        let path = path.as_ref();
        let mut had_header = false;
        let mut in_nesting = false;
        let mut projects: Vec<SolutionProjectInfo> = Vec::new();
        let mut nesting: Vec<(String, String)> = Vec::new();

        for (number, line) in text.lines().enumerate() {
            let stripped = line.trim().trim_start_matches('\u{feff}');
            if stripped.is_empty() || stripped.starts_with('#') {
                continue;
            }
            if !had_header {
                if !stripped.starts_with(HEADER) {
                    return Err(SolutionError::NotASolution {
                        path: path.to_path_buf(),
                    });
                }
                had_header = true;
                continue;
            }

            let malformed = || SolutionError::MalformedLine {
                path: path.to_path_buf(),
                line: number + 1,
                text: stripped.to_string(),
            };

            if stripped.starts_with("Project(") {
                projects.push(SolutionProjectInfo::parse_header(stripped).ok_or_else(malformed)?);
            } else if stripped.starts_with(NESTED_PROJECTS) {
                in_nesting = true;
            } else if stripped.starts_with(END_SECTION) {
                in_nesting = false;
            } else if in_nesting {
                let (child, parent) = stripped
                    .split_once('=')
                    .and_then(|(child, parent)| Some((normalize_guid(child)?, normalize_guid(parent)?)))
                    .ok_or_else(malformed)?;
                nesting.push((child, parent));
            }
        }

        if !had_header {
            return Err(SolutionError::NotASolution {
                path: path.to_path_buf(),
            });
        }

        let mut info = Self::new(path, projects);
        info.apply_nesting(nesting);
        debug!(projects = info.projects.len(), "parsed solution");
        Ok(info)
    }

    fn new(path: &Path, projects: Vec<SolutionProjectInfo>) -> Self {
        let by_id = projects
            .iter()
            .enumerate()
            .map(|(index, project)| (project.id.clone(), index))
            .collect();
        Self {
            path: path.to_path_buf(),
            name: path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default(),
            folder: path.parent().map(Path::to_path_buf).unwrap_or_default(),
            projects,
            by_id,
        }
    }

    fn apply_nesting(&mut self, nesting: Vec<(String, String)>) {
        for (child, parent) in nesting {
            let (Some(&child_index), Some(&parent_index)) =
                (self.by_id.get(&child), self.by_id.get(&parent))
            else {
                warn!(%child, %parent, "nesting entry refers to an unknown project");
                continue;
            };
            self.projects[child_index].parent = Some(parent.clone());
            self.projects[parent_index].children.push(child);
        }
    }

    /// All entries in declaration order.
    #[must_use]
    pub fn projects(&self) -> &[SolutionProjectInfo] {
        &self.projects
    }

    /// Look up an entry by GUID (any casing, braces optional).
    #[must_use]
    pub fn project(&self, id: &str) -> Option<&SolutionProjectInfo> {
        let id = normalize_guid(id)?;
        self.by_id.get(&id).map(|&index| &self.projects[index])
    }

    /// Entries not nested in any solution folder, in declaration order.
    pub fn top_level(&self) -> impl Iterator<Item = &SolutionProjectInfo> {
        self.projects.iter().filter(|project| project.parent.is_none())
    }

    /// Entries nested directly in `project`.
    pub fn children_of<'a>(
        &'a self,
        project: &'a SolutionProjectInfo,
    ) -> impl Iterator<Item = &'a SolutionProjectInfo> + 'a {
        project
            .children
            .iter()
            .filter_map(|id| self.by_id.get(id).map(|&index| &self.projects[index]))
    }

    /// `/Folder/Sub/Label` path of an entry in the solution tree.
    ///
    /// A nesting loop is cut off after visiting every entry once.
    #[must_use]
    pub fn tree_path(&self, project: &SolutionProjectInfo) -> String {
        let mut segments = vec![project.label.as_str()];
        let mut current = project;
        for _ in 0..self.projects.len() {
            let Some(parent) = current.parent.as_deref().and_then(|id| self.project(id)) else {
                break;
            };
            segments.push(parent.label.as_str());
            current = parent;
        }
        segments.iter().rev().fold(String::new(), |mut path, segment| {
            path.push('/');
            path.push_str(segment);
            path
        })
    }

    /// The project file of an entry, if it exists on disk.
    #[must_use]
    pub fn project_file(&self, project: &SolutionProjectInfo) -> Option<PathBuf> {
        let candidate = self.folder.join(project.relative_path());
        candidate.is_file().then_some(candidate)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
