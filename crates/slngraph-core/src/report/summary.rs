//! Per-project summaries.
//!
//! A [`ProjectSummary`] is the flat, serializable view of one project:
//! where it lives, what it targets, and what it references directly and
//! transitively. Stub projects have nothing to summarize and are skipped.

use std::collections::HashSet;

use serde::Serialize;
use tracing::instrument;

use crate::error::GraphError;
use crate::graph::{DependencyGraph, NodeRef};

/// Serializable summary of one project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectSummary {
    pub name: String,
    /// Position in the build order; omitted when no sort has run.
    #[serde(rename = "sortindex", skip_serializing_if = "Option::is_none")]
    pub sort_index: Option<usize>,
    #[serde(rename = "treepath")]
    pub tree_path: String,
    #[serde(rename = "projectpath")]
    pub project_path: String,
    pub id: Option<String>,
    #[serde(rename = "directrefs")]
    pub direct_refs: Vec<String>,
    #[serde(rename = "allrefs")]
    pub all_refs: Vec<String>,
    pub sdk: Option<String>,
    pub frameworks: Vec<String>,
}

impl ProjectSummary {
    /// Summarize one node, or `None` for stubs.
    ///
    /// Direct references come from the declared references (including ones
    /// that did not resolve), deduplicated case-insensitively in declaration
    /// order. All references are the node's transitive closure.
    ///
    /// # Errors
    ///
    /// Inherits closure errors from [`DependencyGraph::deep_depends_on`].
    pub fn from_node(graph: &DependencyGraph, node: NodeRef<'_>) -> Result<Option<Self>, GraphError> {
        if node.is_stub() {
            return Ok(None);
        }
        let record = node.record();

        let mut seen = HashSet::new();
        let direct_refs = record
            .references
            .iter()
            .filter(|reference| seen.insert(reference.name.to_lowercase()))
            .map(|reference| reference.name.clone())
            .collect();

        let all_refs = graph
            .deep_depends_on(node.key().as_str())?
            .into_iter()
            .map(|key| key.to_string())
            .collect();

        Ok(Some(Self {
            name: record.label.clone(),
            sort_index: node.topo_order(),
            tree_path: record.tree_path_or_default(),
            project_path: record.source_path.display().to_string(),
            id: record.project_id.clone(),
            direct_refs,
            all_refs,
            sdk: record.sdk.clone(),
            frameworks: record.frameworks.clone(),
        }))
    }
}

/// Summaries of every non-stub project, in build order.
///
/// # Errors
///
/// [`GraphError::CyclicGraph`] when no build order exists, or closure errors
/// for over-deep graphs.
#[instrument(skip(graph), fields(nodes = graph.node_count()))]
pub fn build_project_summaries(graph: &DependencyGraph) -> Result<Vec<ProjectSummary>, GraphError> {
    let order = graph.topologically_sorted()?;
    let mut summaries = Vec::with_capacity(order.len());
    for key in &order {
        let node = graph
            .find_node(key.as_str())
            .ok_or_else(|| GraphError::NodeNotFound {
                key: key.to_string(),
            })?;
        if let Some(summary) = ProjectSummary::from_node(graph, node)? {
            summaries.push(summary);
        }
    }
    Ok(summaries)
}
