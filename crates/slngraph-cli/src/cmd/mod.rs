pub mod completions;
pub mod deps;
pub mod dot;
pub mod order;
pub mod projects;
pub mod report;
pub mod tree;
pub mod unresolved;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use slngraph_core::{DependencyGraph, GraphBuilder};
use slngraph_solution::Solution;
use tracing::{debug, instrument};

use crate::config::Config;
use crate::output::OutputMode;

/// Positional solution path shared by every graph command.
#[derive(Args, Debug, Clone)]
pub struct SolutionArgs {
    /// Path to the Visual Studio solution (.sln) file.
    pub solution: PathBuf,
}

/// Settings resolved once in `main` and handed to every command.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub config: Config,
    pub output: OutputMode,
    /// `--keep-stubs` given on the command line.
    pub keep_stubs: bool,
}

impl RunContext {
    const fn strip_stubs(&self) -> bool {
        !self.keep_stubs && self.config.graph.strip_stubs
    }
}

/// A loaded solution together with its dependency graph.
#[derive(Debug)]
pub struct LoadedGraph {
    pub solution: Solution,
    pub graph: DependencyGraph,
    /// Labels of stubs dropped before querying.
    pub stripped: Vec<String>,
}

/// Load `path` and build its graph, stripping unreferenced stubs unless
/// the context says otherwise.
///
/// # Errors
///
/// Returns an error if the solution cannot be loaded or two projects share
/// a name.
#[instrument(skip(ctx), fields(path = %path.display()))]
pub fn load_graph(path: &Path, ctx: &RunContext) -> Result<LoadedGraph> {
    let solution = Solution::load(path)?;
    let mut graph = GraphBuilder::new()
        .recursion_limit(ctx.config.graph.recursion_limit)
        .build(solution.to_records())
        .with_context(|| format!("failed to build dependency graph for '{}'", path.display()))?;

    let stripped = if ctx.strip_stubs() {
        graph
            .strip_singleton_stubs()
            .into_iter()
            .map(|node| node.record().label.clone())
            .collect()
    } else {
        Vec::new()
    };
    debug!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        stripped = stripped.len(),
        "graph ready"
    );

    Ok(LoadedGraph {
        solution,
        graph,
        stripped,
    })
}
