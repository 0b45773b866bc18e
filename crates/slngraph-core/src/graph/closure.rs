//! Transitive closures and chain levels.
//!
//! # Overview
//!
//! - [`DependencyGraph::deep_depends_on`]: every project reachable by
//!   following `depends_on` edges.
//! - [`DependencyGraph::deep_dependent_of`]: every project reachable by
//!   following `dependent_of` edges.
//! - [`DependencyGraph::leaf_levels`] / [`DependencyGraph::root_levels`]:
//!   the length of the longest chain below (above) each project.
//!
//! Closures are memoized per project in the graph's cache snapshot. Each
//! recursive step spends one unit of depth budget; a project that is not yet
//! cached when the budget hits zero fails the whole query with
//! [`GraphError::RecursionLimitExceeded`]. A cycle always exhausts the
//! budget, so cyclic graphs never produce partial or self-containing sets.
//! Only complete results enter the cache.

use std::collections::{BTreeSet, HashMap};
use std::rc::Rc;

use petgraph::Direction;
use petgraph::stable_graph::NodeIndex;
use tracing::trace;

use super::{CacheSnapshot, ClosureCache, DependencyGraph};
use crate::error::GraphError;
use crate::identity::ProjectKey;

impl CacheSnapshot {
    const fn closures(&self, direction: Direction) -> &ClosureCache {
        match direction {
            Direction::Outgoing => &self.deep_depends_on,
            Direction::Incoming => &self.deep_dependent_of,
        }
    }

    const fn closures_mut(&mut self, direction: Direction) -> &mut ClosureCache {
        match direction {
            Direction::Outgoing => &mut self.deep_depends_on,
            Direction::Incoming => &mut self.deep_dependent_of,
        }
    }
}

impl DependencyGraph {
    /// All projects `name` depends on, directly or indirectly.
    ///
    /// # Errors
    ///
    /// [`GraphError::NodeNotFound`] for an unknown project and
    /// [`GraphError::RecursionLimitExceeded`] for chains deeper than the
    /// recursion limit (including any cycle).
    pub fn deep_depends_on(&self, name: &str) -> Result<BTreeSet<ProjectKey>, GraphError> {
        let index = self.resolve(name)?;
        let set = self.closure_of(index, Direction::Outgoing, self.recursion_limit)?;
        Ok(set.as_ref().clone())
    }

    /// All projects that depend on `name`, directly or indirectly.
    ///
    /// # Errors
    ///
    /// Same as [`DependencyGraph::deep_depends_on`].
    pub fn deep_dependent_of(&self, name: &str) -> Result<BTreeSet<ProjectKey>, GraphError> {
        let index = self.resolve(name)?;
        let set = self.closure_of(index, Direction::Incoming, self.recursion_limit)?;
        Ok(set.as_ref().clone())
    }

    /// Longest `depends_on` chain below each project (0 for leaves).
    ///
    /// # Errors
    ///
    /// [`GraphError::RecursionLimitExceeded`] on cycles or over-deep chains.
    pub fn leaf_levels(&self) -> Result<HashMap<ProjectKey, usize>, GraphError> {
        self.levels(Direction::Outgoing)
    }

    /// Longest `dependent_of` chain above each project (0 for roots).
    ///
    /// # Errors
    ///
    /// [`GraphError::RecursionLimitExceeded`] on cycles or over-deep chains.
    pub fn root_levels(&self) -> Result<HashMap<ProjectKey, usize>, GraphError> {
        self.levels(Direction::Incoming)
    }

    /// Memoized closure of `index` in `direction`.
    pub(crate) fn closure_of(
        &self,
        index: NodeIndex,
        direction: Direction,
        remaining: usize,
    ) -> Result<Rc<BTreeSet<ProjectKey>>, GraphError> {
        let key = self.key_of(index);
        let cached = self.cache.borrow().closures(direction).get(key).cloned();
        if let Some(hit) = cached {
            return Ok(hit);
        }
        if remaining == 0 {
            return Err(GraphError::RecursionLimitExceeded {
                key: key.to_string(),
                limit: self.recursion_limit,
            });
        }

        let mut result = BTreeSet::new();
        for child in self.adjacent(index, direction) {
            let child_key = self.key_of(child);
            if result.contains(child_key) {
                continue;
            }
            result.insert(child_key.clone());
            let below = self.closure_of(child, direction, remaining - 1)?;
            result.extend(below.iter().cloned());
        }

        trace!(project = %key, size = result.len(), ?direction, "closure computed");
        let result = Rc::new(result);
        self.cache
            .borrow_mut()
            .closures_mut(direction)
            .insert(key.clone(), Rc::clone(&result));
        Ok(result)
    }

    fn levels(&self, direction: Direction) -> Result<HashMap<ProjectKey, usize>, GraphError> {
        let mut levels = HashMap::with_capacity(self.node_count());
        for index in self.graph.node_indices() {
            self.level_of(index, direction, self.recursion_limit, &mut levels)?;
        }
        Ok(levels)
    }

    fn level_of(
        &self,
        index: NodeIndex,
        direction: Direction,
        remaining: usize,
        levels: &mut HashMap<ProjectKey, usize>,
    ) -> Result<usize, GraphError> {
        let key = self.key_of(index);
        if let Some(&level) = levels.get(key) {
            return Ok(level);
        }
        if remaining == 0 {
            return Err(GraphError::RecursionLimitExceeded {
                key: key.to_string(),
                limit: self.recursion_limit,
            });
        }

        let mut level = 0;
        for child in self.adjacent(index, direction) {
            level = level.max(1 + self.level_of(child, direction, remaining - 1, levels)?);
        }
        levels.insert(key.clone(), level);
        Ok(level)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphBuilder;
    use crate::record::ProjectRecord;

    fn project(name: &str, refs: &[&str]) -> ProjectRecord {
        ProjectRecord::new(name, format!("{name}.csproj")).with_references(refs.iter().copied())
    }

    fn names(set: &BTreeSet<ProjectKey>) -> Vec<&str> {
        set.iter().map(ProjectKey::as_str).collect()
    }

    fn diamond() -> DependencyGraph {
        DependencyGraph::from_records([
            project("A", &["B", "C"]),
            project("B", &["D"]),
            project("C", &["D"]),
            project("D", &[]),
        ])
        .expect("build")
    }

    fn chain(len: usize) -> Vec<ProjectRecord> {
        (0..len)
            .map(|i| {
                let name = format!("P{i:03}");
                if i + 1 < len {
                    project(&name, &[&format!("P{:03}", i + 1)])
                } else {
                    project(&name, &[])
                }
            })
            .collect()
    }

    #[test]
    fn diamond_closures() {
        let graph = diamond();
        assert_eq!(names(&graph.deep_depends_on("A").expect("A")), vec!["B", "C", "D"]);
        assert_eq!(names(&graph.deep_depends_on("B").expect("B")), vec!["D"]);
        assert!(graph.deep_depends_on("D").expect("D").is_empty());
        assert_eq!(names(&graph.deep_dependent_of("D").expect("D")), vec!["A", "B", "C"]);
        assert!(graph.deep_dependent_of("A").expect("A").is_empty());
    }

    #[test]
    fn closure_is_memoized_and_stable() {
        let graph = diamond();
        let first = graph.deep_depends_on("a").expect("first");
        {
            let cache = graph.cache.borrow();
            // A and everything below it are cached.
            assert_eq!(cache.deep_depends_on.len(), 4);
            assert!(cache.deep_dependent_of.is_empty());
        }
        let second = graph.deep_depends_on("A").expect("second");
        assert_eq!(first, second);
    }

    #[test]
    fn two_cycle_exceeds_recursion_limit() {
        let graph = DependencyGraph::from_records([project("A", &["B"]), project("B", &["A"])])
            .expect("build");
        let err = graph.deep_depends_on("A").expect_err("cycle");
        assert!(matches!(err, GraphError::RecursionLimitExceeded { limit: 32, .. }));
        // Failed queries leave no partial entry for the queried node.
        assert!(!graph.cache.borrow().deep_depends_on.contains_key(&ProjectKey::new("A")));
    }

    #[test]
    fn self_reference_exceeds_recursion_limit() {
        let graph = DependencyGraph::from_records([project("A", &["A"])]).expect("build");
        assert!(matches!(
            graph.deep_dependent_of("A"),
            Err(GraphError::RecursionLimitExceeded { .. })
        ));
    }

    #[test]
    fn chain_at_limit_succeeds_and_beyond_fails() {
        // A chain of n nodes needs n-1 expansions plus one for the leaf.
        let graph = GraphBuilder::new()
            .recursion_limit(5)
            .build(chain(5))
            .expect("build");
        assert_eq!(graph.deep_depends_on("P000").expect("closure").len(), 4);

        let graph = GraphBuilder::new()
            .recursion_limit(5)
            .build(chain(6))
            .expect("build");
        let err = graph.deep_depends_on("P000").expect_err("too deep");
        assert_eq!(
            err,
            GraphError::RecursionLimitExceeded {
                key: "P005".to_string(),
                limit: 5,
            }
        );
    }

    #[test]
    fn warm_cache_extends_reach() {
        let graph = GraphBuilder::new()
            .recursion_limit(5)
            .build(chain(8))
            .expect("build");
        // Prime the tail so the head only has to expand a few levels.
        graph.deep_depends_on("P004").expect("tail");
        assert_eq!(graph.deep_depends_on("P000").expect("head").len(), 7);
    }

    #[test]
    fn levels_on_diamond() {
        let graph = diamond();
        let leaf = graph.leaf_levels().expect("leaf levels");
        assert_eq!(leaf[&ProjectKey::new("A")], 2);
        assert_eq!(leaf[&ProjectKey::new("B")], 1);
        assert_eq!(leaf[&ProjectKey::new("D")], 0);

        let root = graph.root_levels().expect("root levels");
        assert_eq!(root[&ProjectKey::new("A")], 0);
        assert_eq!(root[&ProjectKey::new("C")], 1);
        assert_eq!(root[&ProjectKey::new("D")], 2);
    }

    #[test]
    fn levels_use_longest_chain() {
        let graph = DependencyGraph::from_records([
            project("App", &["Core", "Web"]),
            project("Web", &["Data"]),
            project("Data", &["Core"]),
            project("Core", &[]),
        ])
        .expect("build");
        let leaf = graph.leaf_levels().expect("levels");
        assert_eq!(leaf[&ProjectKey::new("App")], 3);
        assert_eq!(leaf.len(), 4);
    }

    #[test]
    fn levels_fail_on_cycle() {
        let graph = DependencyGraph::from_records([project("A", &["B"]), project("B", &["A"])])
            .expect("build");
        assert!(graph.leaf_levels().is_err());
        assert!(graph.root_levels().is_err());
    }
}
