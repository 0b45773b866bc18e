//! Graph construction from project records.
//!
//! # Overview
//!
//! [`GraphBuilder`] turns an ordered list of [`ProjectRecord`]s into a
//! [`DependencyGraph`] in two passes:
//!
//! 1. One node per record, in input order. Two records whose names fold to
//!    the same [`ProjectKey`] abort construction with
//!    [`GraphError::DuplicateIdentity`].
//! 2. Each declared reference is looked up by name. A hit adds one edge
//!    `from → to`; a miss is recorded as an [`UnresolvedReference`] and
//!    construction continues.
//!
//! Nothing is computed eagerly: closures and the build order are derived on
//! first query.

use std::cell::RefCell;
use std::collections::HashMap;

use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use serde::Serialize;
use tracing::{debug, instrument, warn};

use super::{CacheSnapshot, DEFAULT_RECURSION_LIMIT, DependencyGraph, GraphNode};
use crate::error::GraphError;
use crate::identity::ProjectKey;
use crate::record::ProjectRecord;

// ---------------------------------------------------------------------------
// UnresolvedReference
// ---------------------------------------------------------------------------

/// A project reference whose target is not in the graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnresolvedReference {
    /// The referencing project.
    pub from: ProjectKey,
    /// The referenced name as declared.
    pub name: String,
    /// The declared include path, empty if unknown.
    pub include: String,
}

// ---------------------------------------------------------------------------
// GraphBuilder
// ---------------------------------------------------------------------------

/// Configures and builds a [`DependencyGraph`].
#[derive(Debug, Clone, Copy)]
pub struct GraphBuilder {
    recursion_limit: usize,
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphBuilder {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            recursion_limit: DEFAULT_RECURSION_LIMIT,
        }
    }

    /// Set the depth ceiling for closure and level queries.
    #[must_use]
    pub const fn recursion_limit(mut self, limit: usize) -> Self {
        self.recursion_limit = limit;
        self
    }

    /// Build the graph.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::DuplicateIdentity`] when two records share a
    /// project key. No partial graph is returned.
    #[instrument(skip_all, fields(limit = self.recursion_limit))]
    pub fn build<I>(self, records: I) -> Result<DependencyGraph, GraphError>
    where
        I: IntoIterator<Item = ProjectRecord>,
    {
        let mut graph = StableDiGraph::<GraphNode, usize>::new();
        let mut index: HashMap<ProjectKey, NodeIndex> = HashMap::new();

        // Pass 1: nodes.
        for record in records {
            let node = GraphNode::new(record);
            if let Some(&existing) = index.get(node.key()) {
                let first: &GraphNode = &graph[existing];
                return Err(GraphError::DuplicateIdentity {
                    key: node.key().to_string(),
                    first: first.record().source_path.clone(),
                    second: node.record().source_path.clone(),
                });
            }
            let key = node.key().clone();
            let idx = graph.add_node(node);
            index.insert(key, idx);
        }

        let mut built = DependencyGraph {
            graph,
            index,
            unresolved: Vec::new(),
            recursion_limit: self.recursion_limit,
            cache: RefCell::new(CacheSnapshot::default()),
        };

        // Pass 2: edges. Iterate indices in insertion order so edge sequence
        // numbers follow declaration order.
        let order: Vec<NodeIndex> = built.graph.node_indices().collect();
        for from in order {
            let references = built.graph[from].record().references.clone();
            for reference in references {
                match built.index.get(&ProjectKey::new(reference.name.as_str())) {
                    Some(&to) => built.link(from, to),
                    None => {
                        let from_key = built.key_of(from).clone();
                        warn!(
                            project = %from_key,
                            reference = %reference.name,
                            include = %reference.include,
                            "unresolved project reference"
                        );
                        built.unresolved.push(UnresolvedReference {
                            from: from_key,
                            name: reference.name,
                            include: reference.include,
                        });
                    }
                }
            }
        }

        debug!(
            nodes = built.node_count(),
            edges = built.edge_count(),
            unresolved = built.unresolved.len(),
            "built dependency graph"
        );
        Ok(built)
    }
}

impl DependencyGraph {
    /// Add the edge `from → to`, registering both directions at once.
    ///
    /// A repeated reference to the same target is ignored.
    fn link(&mut self, from: NodeIndex, to: NodeIndex) {
        if self.graph.find_edge(from, to).is_some() {
            return;
        }
        let sequence = self.graph.edge_count();
        self.graph.add_edge(from, to, sequence);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
