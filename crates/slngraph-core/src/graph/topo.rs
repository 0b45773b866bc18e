//! Deterministic build order.
//!
//! # Overview
//!
//! Kahn's algorithm, run in waves:
//!
//! 1. Every project starts with a pending count equal to its number of
//!    direct dependencies.
//! 2. The first wave is every project with nothing pending, in input order.
//! 3. Emitting a wave decrements the pending count of each emitted project's
//!    dependents (in edge order). Dependents reaching zero form the next
//!    wave, in the order they reached zero.
//!
//! Projects within one wave are mutually independent and can be built in
//! parallel. If some projects are never emitted they sit on or behind a
//! cycle and the sort fails with [`GraphError::CyclicGraph`].
//!
//! The waves are cached until the next structural mutation, and a successful
//! sort writes each project's 0-based position into its `topo_order`.

use std::collections::HashMap;

use petgraph::Direction;
use petgraph::stable_graph::NodeIndex;
use tracing::{debug, instrument, warn};

use super::DependencyGraph;
use crate::error::GraphError;
use crate::identity::ProjectKey;

impl DependencyGraph {
    /// Every project, dependencies strictly before dependents.
    ///
    /// # Errors
    ///
    /// [`GraphError::CyclicGraph`] if any project cannot be placed.
    pub fn topologically_sorted(&self) -> Result<Vec<ProjectKey>, GraphError> {
        Ok(self.build_waves()?.into_iter().flatten().collect())
    }

    /// The topological order grouped into parallel build waves.
    ///
    /// # Errors
    ///
    /// [`GraphError::CyclicGraph`] if any project cannot be placed.
    pub fn build_waves(&self) -> Result<Vec<Vec<ProjectKey>>, GraphError> {
        let cached = self.cache.borrow().topo_waves.clone();
        if let Some(waves) = cached {
            return Ok(waves);
        }

        let waves = self.kahn_waves()?;

        let mut position = 0;
        for wave in &waves {
            for &index in wave {
                self.graph[index].set_topo_order(position);
                position += 1;
            }
        }

        let waves: Vec<Vec<ProjectKey>> = waves
            .into_iter()
            .map(|wave| wave.into_iter().map(|index| self.key_of(index).clone()).collect())
            .collect();
        self.cache.borrow_mut().topo_waves = Some(waves.clone());
        Ok(waves)
    }

    #[instrument(skip(self), fields(nodes = self.node_count()))]
    fn kahn_waves(&self) -> Result<Vec<Vec<NodeIndex>>, GraphError> {
        let mut pending: HashMap<NodeIndex, usize> = self
            .graph
            .node_indices()
            .map(|index| (index, self.adjacent(index, Direction::Outgoing).len()))
            .collect();

        let mut frontier: Vec<NodeIndex> = self
            .graph
            .node_indices()
            .filter(|index| pending.get(index) == Some(&0))
            .collect();

        let mut waves = Vec::new();
        let mut emitted = 0;
        while !frontier.is_empty() {
            let mut next = Vec::new();
            for &index in &frontier {
                for dependent in self.adjacent(index, Direction::Incoming) {
                    if let Some(count) = pending.get_mut(&dependent) {
                        *count -= 1;
                        if *count == 0 {
                            next.push(dependent);
                        }
                    }
                }
            }
            emitted += frontier.len();
            waves.push(frontier);
            frontier = next;
        }

        let stranded = self.node_count() - emitted;
        if stranded > 0 {
            warn!(stranded, "dependency cycle prevents topological sort");
            return Err(GraphError::CyclicGraph { stranded });
        }

        debug!(waves = waves.len(), "topological sort complete");
        Ok(waves)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
