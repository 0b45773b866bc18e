//! `slng report`: full dependency trees for every project.
//!
//! By default each tree lists what a project depends on; `--reverse` lists
//! what depends on it instead. `--dense` switches the JSON shape to nested
//! name-keyed objects.

use std::fmt::Write as _;
use std::io::Write;

use anyhow::Result;
use clap::Args;
use slngraph_core::report::{DependencyReport, TreeNode};

use super::{RunContext, SolutionArgs, load_graph};
use crate::output::{pretty_section, render_mode};

/// Arguments for `slng report`.
#[derive(Args, Debug)]
pub struct ReportArgs {
    #[command(flatten)]
    pub solution: SolutionArgs,

    /// Show dependents instead of dependencies.
    #[arg(long)]
    pub reverse: bool,

    /// Emit nested name-keyed objects instead of name/children nodes.
    #[arg(long)]
    pub dense: bool,
}

/// Draw `node`'s children below it with box-drawing connectors.
fn draw_children(node: &TreeNode, prefix: &str, out: &mut String) {
    let count = node.children().len();
    for (i, child) in node.children().iter().enumerate() {
        let is_last = i + 1 == count;
        let connector = if is_last { "└── " } else { "├── " };
        let _ = writeln!(out, "{prefix}{connector}{}", child.name());
        let child_prefix = format!("{prefix}{}", if is_last { "    " } else { "│   " });
        draw_children(child, &child_prefix, out);
    }
}

fn draw_tree(node: &TreeNode) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", node.name());
    draw_children(node, "", &mut out);
    out
}

pub fn run_report(args: &ReportArgs, ctx: &RunContext) -> Result<()> {
    let loaded = load_graph(&args.solution.solution, ctx)?;
    let report = if args.reverse {
        DependencyReport::dependent_of(&loaded.graph)?
    } else {
        DependencyReport::depends_on(&loaded.graph)?
    };
    let json = if args.dense {
        report.to_dense_json()
    } else {
        report.to_json()
    };

    let heading = if args.reverse {
        "Dependent trees"
    } else {
        "Dependency trees"
    };

    render_mode(
        ctx.output,
        &json,
        |_, w| {
            for (_, tree) in report.iter() {
                w.write_all(draw_tree(tree).as_bytes())?;
            }
            Ok(())
        },
        |_, w| {
            pretty_section(w, heading)?;
            for (_, tree) in report.iter() {
                writeln!(w)?;
                w.write_all(draw_tree(tree).as_bytes())?;
            }
            Ok(())
        },
    )
}
