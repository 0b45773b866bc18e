//! Solution-folder hierarchy.
//!
//! Every top-level entry becomes a [`SolutionTreeNode`]; folder contents
//! become its children, sorted by label. Folders may nest at most
//! [`NESTING_LIMIT`] levels deep.

use serde::Serialize;

use crate::error::SolutionError;
use crate::sln::{SolutionInfo, SolutionProjectInfo};

/// Deepest supported folder nesting, counting the top level.
pub const NESTING_LIMIT: usize = 5;

/// One entry of the solution tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SolutionTreeNode {
    pub name: String,
    pub id: String,
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(rename = "typeid")]
    pub type_id: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SolutionTreeNode>,
}

impl SolutionTreeNode {
    /// Build the subtree rooted at `project`.
    ///
    /// # Errors
    ///
    /// [`SolutionError::NestingTooDeep`] past [`NESTING_LIMIT`] levels.
    pub fn from_project(
        info: &SolutionInfo,
        project: &SolutionProjectInfo,
    ) -> Result<Self, SolutionError> {
        Self::build(info, project, NESTING_LIMIT)
    }

    fn build(
        info: &SolutionInfo,
        project: &SolutionProjectInfo,
        remaining: usize,
    ) -> Result<Self, SolutionError> {
        if remaining == 0 {
            return Err(SolutionError::NestingTooDeep {
                label: project.label.clone(),
                limit: NESTING_LIMIT,
            });
        }

        let mut nested: Vec<&SolutionProjectInfo> = info.children_of(project).collect();
        nested.sort_by(|a, b| a.label.cmp(&b.label));
        let children = nested
            .into_iter()
            .map(|child| Self::build(info, child, remaining - 1))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            name: project.label.clone(),
            id: project.id.clone(),
            type_name: project.type_name(),
            type_id: project.type_id.clone(),
            children,
        })
    }
}

/// Trees for every top-level entry, in declaration order.
///
/// # Errors
///
/// [`SolutionError::NestingTooDeep`] past [`NESTING_LIMIT`] levels.
pub fn solution_tree(info: &SolutionInfo) -> Result<Vec<SolutionTreeNode>, SolutionError> {
    info.top_level()
        .map(|project| SolutionTreeNode::from_project(info, project))
        .collect()
}
