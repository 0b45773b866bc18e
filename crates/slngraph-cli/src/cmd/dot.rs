//! `slng dot`: GraphViz rendering of the dependency graph.
//!
//! Without `-o` the DOT source goes straight to stdout in every output mode
//! so it can be piped into `dot`. With `-o` the file is written and a short
//! confirmation is rendered instead.

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use slngraph_core::report::{RankDir, to_dot};
use tracing::info;

use super::{RunContext, SolutionArgs, load_graph};
use crate::output::{pretty_kv, render_mode};

/// Arguments for `slng dot`.
#[derive(Args, Debug)]
pub struct DotArgs {
    #[command(flatten)]
    pub solution: SolutionArgs,

    /// Write the DOT source to a file instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Draw only pure dependency edges.
    #[arg(long)]
    pub pure_only: bool,

    /// Layout direction: LR, RL, TB or BT.
    #[arg(long)]
    pub rankdir: Option<RankDir>,
}

#[derive(Debug, Serialize)]
struct DotWritten {
    path: PathBuf,
    nodes: usize,
    edges: usize,
}

pub fn run_dot(args: &DotArgs, ctx: &RunContext) -> Result<()> {
    let loaded = load_graph(&args.solution.solution, ctx)?;
    let options = ctx.config.dot.options(args.rankdir, args.pure_only);
    let source = to_dot(&loaded.graph, &options)?;

    let Some(path) = &args.output else {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        out.write_all(source.as_bytes())?;
        return Ok(());
    };

    fs::write(path, &source).with_context(|| format!("failed to write '{}'", path.display()))?;
    info!(path = %path.display(), "wrote dot graph");

    let written = DotWritten {
        path: path.clone(),
        nodes: loaded.graph.node_count(),
        edges: loaded.graph.edge_count(),
    };
    render_mode(
        ctx.output,
        &written,
        |written, w| writeln!(w, "{}", written.path.display()),
        |written, w| {
            writeln!(w, "✓ wrote {}", written.path.display())?;
            pretty_kv(w, "nodes", written.nodes.to_string())?;
            pretty_kv(w, "edges", written.edges.to_string())
        },
    )
}
