//! Pure-dependency reduction.
//!
//! A direct dependency `B` of `A` is *pure* when no other dependency of `A`
//! already pulls `B` in. The pure set is the transitive reduction of `A`'s
//! outgoing edges: drawing only pure edges loses no reachability.

use std::collections::BTreeSet;

use petgraph::Direction;

use super::DependencyGraph;
use crate::error::GraphError;
use crate::identity::ProjectKey;

impl DependencyGraph {
    /// Direct dependencies of `name` not implied by another dependency.
    ///
    /// Computed as `deep(name) \ ⋃ deep(child)` over the direct children,
    /// reusing the closure cache.
    ///
    /// # Errors
    ///
    /// Inherits the errors of [`DependencyGraph::deep_depends_on`].
    pub fn find_pure_dependencies(&self, name: &str) -> Result<BTreeSet<ProjectKey>, GraphError> {
        let index = self.resolve(name)?;
        let deep = self.closure_of(index, Direction::Outgoing, self.recursion_limit)?;
        let mut pure = deep.as_ref().clone();
        for child in self.adjacent(index, Direction::Outgoing) {
            let below = self.closure_of(child, Direction::Outgoing, self.recursion_limit)?;
            pure.retain(|key| !below.contains(key));
        }
        Ok(pure)
    }

    /// Whether the direct edge `from → to` is a pure dependency.
    ///
    /// Returns `false` when `to` is not a direct dependency of `from`.
    ///
    /// # Errors
    ///
    /// Inherits the errors of [`DependencyGraph::find_pure_dependencies`].
    pub fn is_pure_edge(&self, from: &str, to: &str) -> Result<bool, GraphError> {
        let target = ProjectKey::new(to);
        Ok(self.find_pure_dependencies(from)?.contains(&target))
    }
}
