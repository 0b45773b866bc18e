//! Project dependency graph.
//!
//! # Overview
//!
//! [`DependencyGraph`] holds one node per solution project and one edge per
//! resolved project reference. Queries over it are computed on demand and
//! memoized:
//!
//! ```text
//! Vec<ProjectRecord>
//!        ↓  build::GraphBuilder::build()
//! DependencyGraph (petgraph StableDiGraph, keyed by ProjectKey)
//!        ├─ closure: deep_depends_on / deep_dependent_of / leaf & root levels
//!        ├─ pure:    find_pure_dependencies
//!        └─ topo:    topologically_sorted / build_waves
//! ```
//!
//! ## Edge Direction
//!
//! An edge `A → B` means "A **depends on** B": B must be built before A.
//! A node's `depends_on` list is its outgoing edges, its `dependent_of`
//! list is its incoming edges. Both views come from the same petgraph edge,
//! so they cannot drift apart. Edge weights are creation sequence numbers
//! and both lists are reported in creation order.
//!
//! ## Cache Invalidation
//!
//! The transitive-dependency cache, transitive-dependent cache and cached
//! topological order live in a single [`CacheSnapshot`] stamped with a
//! generation number. The only structural mutation after construction,
//! [`DependencyGraph::strip_singleton_stubs`], bumps the generation and
//! clears the whole snapshot together with every node's `topo_order`.
//!
//! ## Threading
//!
//! Caches use interior mutability so queries take `&self`. The graph is
//! therefore `!Sync`; callers sharing it across threads must lock the whole
//! structure.

#![allow(clippy::module_name_repetitions)]

pub mod build;
pub mod closure;
pub mod node;
pub mod pure;
pub mod topo;

use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap};
use std::rc::Rc;

use petgraph::Direction;
use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use petgraph::visit::EdgeRef;
use tracing::debug;

use crate::error::GraphError;
use crate::identity::ProjectKey;
use crate::record::ProjectRecord;

pub use build::{GraphBuilder, UnresolvedReference};
pub use node::{GraphNode, NodeRef};

/// Default ceiling for recursive closure and level expansion.
pub const DEFAULT_RECURSION_LIMIT: usize = 32;

/// Memoized closure sets, keyed by project.
pub(crate) type ClosureCache = HashMap<ProjectKey, Rc<BTreeSet<ProjectKey>>>;

// ---------------------------------------------------------------------------
// CacheSnapshot
// ---------------------------------------------------------------------------

/// All derived state of a graph, invalidated as one unit.
#[derive(Debug, Default)]
pub(crate) struct CacheSnapshot {
    /// Incremented on every structural mutation.
    pub(crate) generation: u64,
    pub(crate) deep_depends_on: ClosureCache,
    pub(crate) deep_dependent_of: ClosureCache,
    /// Cached sorter output, grouped by wave.
    pub(crate) topo_waves: Option<Vec<Vec<ProjectKey>>>,
}

impl CacheSnapshot {
    fn invalidate(&mut self) {
        self.generation += 1;
        self.deep_depends_on.clear();
        self.deep_dependent_of.clear();
        self.topo_waves = None;
    }
}

// ---------------------------------------------------------------------------
// DependencyGraph
// ---------------------------------------------------------------------------

/// Dependency graph over the projects of one solution.
#[derive(Debug)]
pub struct DependencyGraph {
    /// Nodes are projects; edge `A → B` means A depends on B. Edge weights
    /// are creation sequence numbers.
    pub(crate) graph: StableDiGraph<GraphNode, usize>,
    /// Mapping from project key to node index.
    pub(crate) index: HashMap<ProjectKey, NodeIndex>,
    /// References whose target is not part of the graph.
    pub(crate) unresolved: Vec<UnresolvedReference>,
    /// Ceiling for recursive expansion.
    pub(crate) recursion_limit: usize,
    pub(crate) cache: RefCell<CacheSnapshot>,
}

impl DependencyGraph {
    /// Build a graph with the default recursion limit.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::DuplicateIdentity`] if two records share a name.
    pub fn from_records<I>(records: I) -> Result<Self, GraphError>
    where
        I: IntoIterator<Item = ProjectRecord>,
    {
        GraphBuilder::new().build(records)
    }

    /// Return the number of project nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Return the number of dependency edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// The recursion ceiling used by closure and level queries.
    #[must_use]
    pub const fn recursion_limit(&self) -> usize {
        self.recursion_limit
    }

    /// Cache generation; changes whenever the node set changes.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.cache.borrow().generation
    }

    /// Enumerate all nodes in input order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeRef<'_>> + '_ {
        self.graph
            .node_indices()
            .map(move |index| NodeRef::new(self, index))
    }

    /// Find a node by project name (case-insensitive).
    #[must_use]
    pub fn find_node(&self, name: &str) -> Option<NodeRef<'_>> {
        self.index
            .get(&ProjectKey::new(name))
            .map(|&index| NodeRef::new(self, index))
    }

    /// References that did not resolve to a project in this graph.
    #[must_use]
    pub fn unresolved_references(&self) -> &[UnresolvedReference] {
        &self.unresolved
    }

    /// Remove every node that is a stub, a leaf and a root at once.
    ///
    /// Such nodes (solution folders, unloadable entries with no references
    /// in or out) carry no dependency information. Returns the removed nodes
    /// in input order. All caches are invalidated, even when nothing was
    /// removed.
    pub fn strip_singleton_stubs(&mut self) -> Vec<GraphNode> {
        let doomed: Vec<NodeIndex> = self
            .graph
            .node_indices()
            .filter(|&index| {
                let node = NodeRef::new(self, index);
                node.is_stub() && node.is_leaf() && node.is_root()
            })
            .collect();

        let removed: Vec<GraphNode> = doomed
            .into_iter()
            .filter_map(|index| self.graph.remove_node(index))
            .collect();

        for node in &removed {
            self.index.remove(node.key());
        }

        self.invalidate();
        debug!(
            removed = removed.len(),
            remaining = self.graph.node_count(),
            "stripped singleton stubs"
        );
        removed
    }

    /// Clear every cache and every node's topological position.
    fn invalidate(&mut self) {
        self.cache.get_mut().invalidate();
        for index in self.graph.node_indices() {
            self.graph[index].clear_topo_order();
        }
    }

    // -----------------------------------------------------------------------
    // Internal helpers shared by the query modules
    // -----------------------------------------------------------------------

    /// Resolve a project name to its node index.
    pub(crate) fn resolve(&self, name: &str) -> Result<NodeIndex, GraphError> {
        self.index
            .get(&ProjectKey::new(name))
            .copied()
            .ok_or_else(|| GraphError::NodeNotFound {
                key: name.to_string(),
            })
    }

    /// Neighbors of `index` in `direction`, in edge creation order.
    ///
    /// `Outgoing` yields what the node depends on, `Incoming` yields its
    /// dependents.
    pub(crate) fn adjacent(&self, index: NodeIndex, direction: Direction) -> Vec<NodeIndex> {
        let mut edges: Vec<(usize, NodeIndex)> = self
            .graph
            .edges_directed(index, direction)
            .map(|edge| {
                let other = match direction {
                    Direction::Outgoing => edge.target(),
                    Direction::Incoming => edge.source(),
                };
                (*edge.weight(), other)
            })
            .collect();
        edges.sort_unstable_by_key(|(sequence, _)| *sequence);
        edges.into_iter().map(|(_, other)| other).collect()
    }

    /// Key of the node at `index`.
    pub(crate) fn key_of(&self, index: NodeIndex) -> &ProjectKey {
        self.graph[index].key()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
