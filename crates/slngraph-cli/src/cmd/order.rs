//! `slng order`: build order, levels and parallel build waves.
//!
//! The leaf level of a project is the longest dependency chain below it
//! (0 for projects with no dependencies); the root level is the longest
//! chain of dependents above it.

use std::io::Write;

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use slngraph_core::{DependencyGraph, ProjectKey};

use super::{RunContext, SolutionArgs, load_graph};
use crate::output::{pretty_section, render_mode};

/// Arguments for `slng order`.
#[derive(Args, Debug)]
pub struct OrderArgs {
    #[command(flatten)]
    pub solution: SolutionArgs,

    /// Group projects into waves that can build in parallel.
    #[arg(long)]
    pub waves: bool,
}

#[derive(Debug, Serialize)]
struct OrderEntry {
    position: usize,
    name: String,
    leaf_level: usize,
    root_level: usize,
}

#[derive(Debug, Serialize)]
struct OrderReport {
    order: Vec<OrderEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    waves: Option<Vec<Vec<ProjectKey>>>,
}

fn build_report(graph: &DependencyGraph, with_waves: bool) -> Result<OrderReport> {
    let waves = graph.build_waves()?;
    let leaf = graph.leaf_levels()?;
    let root = graph.root_levels()?;

    let order = waves
        .iter()
        .flatten()
        .enumerate()
        .map(|(position, key)| OrderEntry {
            position,
            name: key.to_string(),
            leaf_level: leaf.get(key).copied().unwrap_or_default(),
            root_level: root.get(key).copied().unwrap_or_default(),
        })
        .collect();

    Ok(OrderReport {
        order,
        waves: with_waves.then_some(waves),
    })
}

pub fn run_order(args: &OrderArgs, ctx: &RunContext) -> Result<()> {
    let loaded = load_graph(&args.solution.solution, ctx)?;
    let report = build_report(&loaded.graph, args.waves)?;

    render_mode(
        ctx.output,
        &report,
        |report, w| {
            if let Some(waves) = &report.waves {
                for (wave, members) in waves.iter().enumerate() {
                    let names: Vec<&str> = members.iter().map(ProjectKey::as_str).collect();
                    writeln!(w, "{wave}\t{}", names.join(" "))?;
                }
            } else {
                for entry in &report.order {
                    writeln!(w, "{}", entry.name)?;
                }
            }
            Ok(())
        },
        |report, w| {
            pretty_section(w, "Build order")?;
            writeln!(w, "{:>4}  {:<40} {:>5} {:>5}", "#", "PROJECT", "LEAF", "ROOT")?;
            for entry in &report.order {
                writeln!(
                    w,
                    "{:>4}  {:<40} {:>5} {:>5}",
                    entry.position, entry.name, entry.leaf_level, entry.root_level
                )?;
            }
            if let Some(waves) = &report.waves {
                writeln!(w)?;
                pretty_section(w, &format!("Build waves ({})", waves.len()))?;
                for (wave, members) in waves.iter().enumerate() {
                    let names: Vec<&str> = members.iter().map(ProjectKey::as_str).collect();
                    writeln!(w, "wave {wave}: {}", names.join(", "))?;
                }
            }
            Ok(())
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use slngraph_core::ProjectRecord;

    fn diamond() -> DependencyGraph {
        DependencyGraph::from_records(vec![
            ProjectRecord::new("A", "A.csproj").with_references(["B", "C"]),
            ProjectRecord::new("B", "B.csproj").with_references(["D"]),
            ProjectRecord::new("C", "C.csproj").with_references(["D"]),
            ProjectRecord::new("D", "D.csproj"),
        ])
        .expect("graph")
    }

    #[test]
    fn report_lists_levels_in_build_order() {
        let report = build_report(&diamond(), false).expect("report");
        let names: Vec<&str> = report.order.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["D", "B", "C", "A"]);
        assert_eq!(report.order[0].leaf_level, 0);
        assert_eq!(report.order[0].root_level, 2);
        assert_eq!(report.order[3].leaf_level, 2);
        assert_eq!(report.order[3].root_level, 0);
        assert!(report.waves.is_none());
    }

    #[test]
    fn waves_are_included_on_request() {
        let report = build_report(&diamond(), true).expect("report");
        let waves = report.waves.expect("waves");
        assert_eq!(waves.len(), 3);
        assert_eq!(waves[1].len(), 2);
    }

    #[test]
    fn cycle_is_reported() {
        let graph = DependencyGraph::from_records(vec![
            ProjectRecord::new("A", "A.csproj").with_references(["B"]),
            ProjectRecord::new("B", "B.csproj").with_references(["A"]),
        ])
        .expect("graph");
        let err = build_report(&graph, false).expect_err("cycle");
        assert!(err.downcast_ref::<slngraph_core::GraphError>().is_some());
    }
}
