//! `slng deps <project>`: everything known about one project's edges.

use std::io::Write;

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use slngraph_core::{DependencyGraph, GraphError, ProjectKey};

use super::{RunContext, SolutionArgs, load_graph};
use crate::output::{pretty_kv, pretty_list, pretty_section, render_mode};

/// Arguments for `slng deps`.
#[derive(Args, Debug)]
pub struct DepsArgs {
    #[command(flatten)]
    pub solution: SolutionArgs,

    /// Project name (case-insensitive).
    pub project: String,
}

#[derive(Debug, Serialize)]
struct DepsReport {
    name: String,
    direct: Vec<String>,
    transitive: Vec<String>,
    pure: Vec<String>,
    dependents: Vec<String>,
    all_dependents: Vec<String>,
}

fn names<'a>(keys: impl IntoIterator<Item = &'a ProjectKey>) -> Vec<String> {
    keys.into_iter().map(ToString::to_string).collect()
}

fn build_report(graph: &DependencyGraph, project: &str) -> Result<DepsReport, GraphError> {
    let node = graph.find_node(project).ok_or_else(|| GraphError::NodeNotFound {
        key: project.to_string(),
    })?;

    Ok(DepsReport {
        name: node.key().to_string(),
        direct: node.depends_on().map(|n| n.key().to_string()).collect(),
        transitive: names(&graph.deep_depends_on(project)?),
        pure: names(&graph.find_pure_dependencies(project)?),
        dependents: node.dependent_of().map(|n| n.key().to_string()).collect(),
        all_dependents: names(&graph.deep_dependent_of(project)?),
    })
}

pub fn run_deps(args: &DepsArgs, ctx: &RunContext) -> Result<()> {
    let loaded = load_graph(&args.solution.solution, ctx)?;
    let report = build_report(&loaded.graph, &args.project)?;

    render_mode(
        ctx.output,
        &report,
        |report, w| {
            for (kind, list) in [
                ("direct", &report.direct),
                ("transitive", &report.transitive),
                ("pure", &report.pure),
                ("dependent", &report.dependents),
                ("all-dependent", &report.all_dependents),
            ] {
                for name in list {
                    writeln!(w, "{kind}\t{name}")?;
                }
            }
            Ok(())
        },
        |report, w| {
            pretty_section(w, &report.name)?;
            pretty_kv(w, "depends on", pretty_list(&report.direct))?;
            pretty_kv(w, "transitive", pretty_list(&report.transitive))?;
            pretty_kv(w, "pure", pretty_list(&report.pure))?;
            pretty_kv(w, "used by", pretty_list(&report.dependents))?;
            pretty_kv(w, "all users", pretty_list(&report.all_dependents))
        },
    )
}
