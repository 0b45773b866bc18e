//! `slng tree`: the solution folder hierarchy.

use std::io::{self, Write};

use anyhow::Result;
use clap::Args;
use slngraph_solution::{SolutionInfo, SolutionTreeNode, solution_tree};

use super::{RunContext, SolutionArgs};
use crate::output::{pretty_section, render_mode};

/// Arguments for `slng tree`.
#[derive(Args, Debug)]
pub struct TreeArgs {
    #[command(flatten)]
    pub solution: SolutionArgs,
}

fn write_indented(w: &mut dyn Write, node: &SolutionTreeNode, depth: usize) -> io::Result<()> {
    writeln!(w, "{:indent$}{}", "", node.name, indent = depth * 2)?;
    for child in &node.children {
        write_indented(w, child, depth + 1)?;
    }
    Ok(())
}

fn write_typed(w: &mut dyn Write, node: &SolutionTreeNode, depth: usize) -> io::Result<()> {
    writeln!(
        w,
        "{:indent$}{} ({})",
        "",
        node.name,
        node.type_name,
        indent = depth * 2
    )?;
    for child in &node.children {
        write_typed(w, child, depth + 1)?;
    }
    Ok(())
}

/// Only the `.sln` is read; project files are not needed for the tree.
pub fn run_tree(args: &TreeArgs, ctx: &RunContext) -> Result<()> {
    let info = SolutionInfo::from_file(&args.solution.solution)?;
    let tree = solution_tree(&info)?;

    render_mode(
        ctx.output,
        &tree,
        |tree, w| {
            for node in tree {
                write_indented(w, node, 0)?;
            }
            Ok(())
        },
        |tree, w| {
            pretty_section(w, &format!("Solution {}", info.name))?;
            for node in tree {
                write_typed(w, node, 0)?;
            }
            Ok(())
        },
    )
}
