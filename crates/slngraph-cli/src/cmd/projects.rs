//! `slng projects`: per-project summaries in build order.
//!
//! JSON output is an object keyed by project name, with keys in build order.

use std::io::Write;

use anyhow::Result;
use clap::Args;
use serde::ser::{Serialize, SerializeMap, Serializer};
use slngraph_core::report::{ProjectSummary, build_project_summaries};

use super::{RunContext, SolutionArgs, load_graph};
use crate::output::{pretty_kv, pretty_list, pretty_section, render_mode};

/// Arguments for `slng projects`.
#[derive(Args, Debug)]
pub struct ProjectsArgs {
    #[command(flatten)]
    pub solution: SolutionArgs,
}

/// Summaries serialized as a `name -> summary` map in slice order.
#[derive(Debug)]
struct ByName(Vec<ProjectSummary>);

impl Serialize for ByName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for summary in &self.0 {
            map.serialize_entry(&summary.name, summary)?;
        }
        map.end()
    }
}

pub fn run_projects(args: &ProjectsArgs, ctx: &RunContext) -> Result<()> {
    let loaded = load_graph(&args.solution.solution, ctx)?;
    let summaries = ByName(build_project_summaries(&loaded.graph)?);

    render_mode(
        ctx.output,
        &summaries,
        |ByName(summaries), w| {
            for summary in summaries {
                writeln!(
                    w,
                    "{}\t{}\t{}",
                    index_text(summary),
                    summary.name,
                    summary.project_path
                )?;
            }
            Ok(())
        },
        |ByName(summaries), w| {
            pretty_section(w, &format!("Projects ({})", summaries.len()))?;
            for summary in summaries {
                writeln!(w)?;
                writeln!(w, "[{}] {}", index_text(summary), summary.name)?;
                pretty_kv(w, "path", &summary.project_path)?;
                pretty_kv(w, "tree", &summary.tree_path)?;
                if let Some(sdk) = &summary.sdk {
                    pretty_kv(w, "sdk", sdk)?;
                }
                pretty_kv(w, "frameworks", pretty_list(&summary.frameworks))?;
                pretty_kv(w, "references", pretty_list(&summary.direct_refs))?;
                pretty_kv(w, "all refs", pretty_list(&summary.all_refs))?;
            }
            Ok(())
        },
    )
}

fn index_text(summary: &ProjectSummary) -> String {
    summary
        .sort_index
        .map_or_else(|| "-".to_string(), |index| index.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use slngraph_core::{DependencyGraph, ProjectRecord};

    fn summaries() -> ByName {
        let graph = DependencyGraph::from_records(vec![
            ProjectRecord::new("App", "App.csproj").with_references(["Lib"]),
            ProjectRecord::new("Lib", "Lib.csproj"),
        ])
        .expect("graph");
        ByName(build_project_summaries(&graph).expect("summaries"))
    }

    #[test]
    fn json_is_keyed_by_name_in_build_order() {
        let text = serde_json::to_string(&summaries()).expect("json");
        assert!(text.starts_with("{\"Lib\":{\"name\":\"Lib\""));
        assert!(text.find("\"Lib\":").unwrap() < text.find("\"App\":").unwrap());

        let value: serde_json::Value = serde_json::from_str(&text).expect("parse");
        assert_eq!(value["App"]["sortindex"], 1);
        assert_eq!(value["App"]["directrefs"][0], "Lib");
    }
}
