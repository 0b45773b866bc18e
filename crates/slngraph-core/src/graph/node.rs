//! Graph vertices.
//!
//! [`GraphNode`] is the owned vertex payload stored inside the petgraph
//! graph. [`NodeRef`] is a borrowed view that pairs a node with its graph so
//! adjacency can be walked without exposing petgraph indices.

use std::cell::Cell;
use std::fmt;

use petgraph::Direction;
use petgraph::stable_graph::NodeIndex;

use super::DependencyGraph;
use crate::identity::ProjectKey;
use crate::record::ProjectRecord;

// ---------------------------------------------------------------------------
// GraphNode
// ---------------------------------------------------------------------------

/// One project vertex.
#[derive(Debug, Clone)]
pub struct GraphNode {
    key: ProjectKey,
    record: ProjectRecord,
    /// Position in the last topological sort; `None` until the sorter runs.
    topo_order: Cell<Option<usize>>,
}

impl GraphNode {
    pub(crate) fn new(record: ProjectRecord) -> Self {
        Self {
            key: ProjectKey::new(record.name.clone()),
            record,
            topo_order: Cell::new(None),
        }
    }

    /// The node's identity key.
    #[must_use]
    pub const fn key(&self) -> &ProjectKey {
        &self.key
    }

    /// The input record this node was built from.
    #[must_use]
    pub const fn record(&self) -> &ProjectRecord {
        &self.record
    }

    /// Whether no build script backs this node.
    #[must_use]
    pub const fn is_stub(&self) -> bool {
        self.record.is_stub
    }

    /// 0-based build position, if the sorter has run since the last mutation.
    #[must_use]
    pub fn topo_order(&self) -> Option<usize> {
        self.topo_order.get()
    }

    pub(crate) fn set_topo_order(&self, position: usize) {
        self.topo_order.set(Some(position));
    }

    pub(crate) fn clear_topo_order(&self) {
        self.topo_order.set(None);
    }
}

// ---------------------------------------------------------------------------
// NodeRef
// ---------------------------------------------------------------------------

/// A node borrowed together with its graph.
#[derive(Clone, Copy)]
pub struct NodeRef<'g> {
    graph: &'g DependencyGraph,
    index: NodeIndex,
}

impl<'g> NodeRef<'g> {
    pub(crate) const fn new(graph: &'g DependencyGraph, index: NodeIndex) -> Self {
        Self { graph, index }
    }

    /// The underlying node.
    #[must_use]
    pub fn node(&self) -> &'g GraphNode {
        &self.graph.graph[self.index]
    }

    #[must_use]
    pub fn key(&self) -> &'g ProjectKey {
        self.node().key()
    }

    #[must_use]
    pub fn record(&self) -> &'g ProjectRecord {
        self.node().record()
    }

    #[must_use]
    pub fn is_stub(&self) -> bool {
        self.node().is_stub()
    }

    #[must_use]
    pub fn topo_order(&self) -> Option<usize> {
        self.node().topo_order()
    }

    /// Direct dependencies, in declaration order.
    pub fn depends_on(&self) -> impl Iterator<Item = NodeRef<'g>> + 'g {
        self.neighbors(Direction::Outgoing)
    }

    /// Direct dependents, in edge creation order.
    pub fn dependent_of(&self) -> impl Iterator<Item = NodeRef<'g>> + 'g {
        self.neighbors(Direction::Incoming)
    }

    /// True when the node depends on nothing.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.graph
            .graph
            .neighbors_directed(self.index, Direction::Outgoing)
            .next()
            .is_none()
    }

    /// True when nothing depends on the node.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.graph
            .graph
            .neighbors_directed(self.index, Direction::Incoming)
            .next()
            .is_none()
    }

    fn neighbors(&self, direction: Direction) -> impl Iterator<Item = NodeRef<'g>> + 'g {
        let graph = self.graph;
        graph
            .adjacent(self.index, direction)
            .into_iter()
            .map(move |index| NodeRef::new(graph, index))
    }
}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("key", self.key())
            .field("stub", &self.is_stub())
            .field("topo_order", &self.topo_order())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_node_has_no_topo_order() {
        let node = GraphNode::new(ProjectRecord::new("Core", "Core.csproj"));
        assert_eq!(node.key().as_str(), "Core");
        assert_eq!(node.topo_order(), None);
        node.set_topo_order(3);
        assert_eq!(node.topo_order(), Some(3));
        node.clear_topo_order();
        assert_eq!(node.topo_order(), None);
    }

    #[test]
    fn leaf_and_root_follow_edges() {
        let graph = DependencyGraph::from_records([
            ProjectRecord::new("App", "App.csproj").with_references(["Core"]),
            ProjectRecord::new("Core", "Core.csproj"),
        ])
        .expect("build");

        let app = graph.find_node("App").expect("App");
        let core = graph.find_node("Core").expect("Core");
        assert!(app.is_root() && !app.is_leaf());
        assert!(core.is_leaf() && !core.is_root());

        let dependents: Vec<&str> = core.dependent_of().map(|n| n.key().as_str()).collect();
        assert_eq!(dependents, vec!["App"]);
    }
}
