//! Forward and reverse dependency trees.
//!
//! A [`DependencyReport`] holds one tree per project. In a forward report
//! each node's children are what it depends on; in a reverse report they are
//! its dependents. Shared subtrees are built once and shared through `Rc`,
//! with the same depth ceiling as closure queries.
//!
//! Two JSON shapes are offered:
//!
//! ```text
//! plain:  {"App": {"name": "App", "dependsOn": [{"name": "Core", "dependsOn": []}]}}
//! dense:  {"App": {"App": {"Core": {}}}}
//! ```

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use petgraph::Direction;
use petgraph::stable_graph::NodeIndex;
use serde_json::{Map, Value};
use tracing::instrument;

use crate::error::GraphError;
use crate::graph::DependencyGraph;
use crate::identity::ProjectKey;

/// Which edges a report follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeDirection {
    DependsOn,
    DependentOf,
}

impl TreeDirection {
    /// JSON key for the children array.
    #[must_use]
    pub const fn field(self) -> &'static str {
        match self {
            Self::DependsOn => "dependsOn",
            Self::DependentOf => "dependentOf",
        }
    }

    const fn edges(self) -> Direction {
        match self {
            Self::DependsOn => Direction::Outgoing,
            Self::DependentOf => Direction::Incoming,
        }
    }
}

impl fmt::Display for TreeDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field())
    }
}

// ---------------------------------------------------------------------------
// TreeNode
// ---------------------------------------------------------------------------

/// One node of a dependency tree.
#[derive(Debug, PartialEq, Eq)]
pub struct TreeNode {
    name: String,
    children: Vec<Rc<TreeNode>>,
}

impl TreeNode {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn children(&self) -> &[Rc<Self>] {
        &self.children
    }

    /// `{"name": .., "<field>": [..]}` for this subtree.
    #[must_use]
    pub fn to_json(&self, direction: TreeDirection) -> Value {
        let children: Vec<Value> = self
            .children
            .iter()
            .map(|child| child.to_json(direction))
            .collect();
        let mut object = Map::new();
        object.insert("name".to_string(), Value::String(self.name.clone()));
        object.insert(direction.field().to_string(), Value::Array(children));
        Value::Object(object)
    }

    /// `{"<name>": {<child name>: {..}, ..}}` for this subtree.
    #[must_use]
    pub fn to_dense_json(&self) -> Value {
        let mut outer = Map::new();
        outer.insert(self.name.clone(), self.dense_content());
        Value::Object(outer)
    }

    fn dense_content(&self) -> Value {
        let content: Map<String, Value> = self
            .children
            .iter()
            .map(|child| (child.name.clone(), child.dense_content()))
            .collect();
        Value::Object(content)
    }
}

// ---------------------------------------------------------------------------
// DependencyReport
// ---------------------------------------------------------------------------

/// One dependency tree per project, in input order.
#[derive(Debug)]
pub struct DependencyReport {
    direction: TreeDirection,
    trees: Vec<(ProjectKey, Rc<TreeNode>)>,
}

impl DependencyReport {
    /// Trees of what every project depends on.
    ///
    /// # Errors
    ///
    /// [`GraphError::RecursionLimitExceeded`] on cycles or over-deep chains.
    pub fn depends_on(graph: &DependencyGraph) -> Result<Self, GraphError> {
        Self::build(graph, TreeDirection::DependsOn)
    }

    /// Trees of what depends on every project.
    ///
    /// # Errors
    ///
    /// [`GraphError::RecursionLimitExceeded`] on cycles or over-deep chains.
    pub fn dependent_of(graph: &DependencyGraph) -> Result<Self, GraphError> {
        Self::build(graph, TreeDirection::DependentOf)
    }

    #[instrument(skip(graph), fields(nodes = graph.node_count()))]
    fn build(graph: &DependencyGraph, direction: TreeDirection) -> Result<Self, GraphError> {
        let mut memo = HashMap::new();
        let mut trees = Vec::with_capacity(graph.node_count());
        for index in graph.graph.node_indices() {
            let tree = subtree(graph, index, direction, graph.recursion_limit(), &mut memo)?;
            trees.push((graph.key_of(index).clone(), tree));
        }
        Ok(Self { direction, trees })
    }

    #[must_use]
    pub const fn direction(&self) -> TreeDirection {
        self.direction
    }

    /// The tree rooted at `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&TreeNode> {
        self.trees
            .iter()
            .find(|(key, _)| key.matches(name))
            .map(|(_, tree)| tree.as_ref())
    }

    /// Iterate `(project, tree)` pairs in input order.
    pub fn iter(&self) -> impl Iterator<Item = (&ProjectKey, &TreeNode)> {
        self.trees.iter().map(|(key, tree)| (key, tree.as_ref()))
    }

    /// Object keyed by project name, each value a plain tree.
    #[must_use]
    pub fn to_json(&self) -> Value {
        let map: Map<String, Value> = self
            .trees
            .iter()
            .map(|(_, tree)| (tree.name.clone(), tree.to_json(self.direction)))
            .collect();
        Value::Object(map)
    }

    /// Object keyed by project name, each value a dense tree.
    #[must_use]
    pub fn to_dense_json(&self) -> Value {
        let map: Map<String, Value> = self
            .trees
            .iter()
            .map(|(_, tree)| (tree.name.clone(), tree.to_dense_json()))
            .collect();
        Value::Object(map)
    }
}

fn subtree(
    graph: &DependencyGraph,
    index: NodeIndex,
    direction: TreeDirection,
    remaining: usize,
    memo: &mut HashMap<NodeIndex, Rc<TreeNode>>,
) -> Result<Rc<TreeNode>, GraphError> {
    if let Some(tree) = memo.get(&index) {
        return Ok(Rc::clone(tree));
    }
    if remaining == 0 {
        return Err(GraphError::RecursionLimitExceeded {
            key: graph.key_of(index).to_string(),
            limit: graph.recursion_limit(),
        });
    }

    let children = graph
        .adjacent(index, direction.edges())
        .into_iter()
        .map(|child| subtree(graph, child, direction, remaining - 1, memo))
        .collect::<Result<Vec<_>, _>>()?;

    let tree = Rc::new(TreeNode {
        name: graph.graph[index].record().label.clone(),
        children,
    });
    memo.insert(index, Rc::clone(&tree));
    Ok(tree)
}
