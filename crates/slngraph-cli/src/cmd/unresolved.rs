//! `slng unresolved`: project references that name no known project.

use std::io::Write;

use anyhow::Result;
use clap::Args;

use super::{RunContext, SolutionArgs, load_graph};
use crate::output::{pretty_section, render_mode};

/// Arguments for `slng unresolved`.
#[derive(Args, Debug)]
pub struct UnresolvedArgs {
    #[command(flatten)]
    pub solution: SolutionArgs,
}

pub fn run_unresolved(args: &UnresolvedArgs, ctx: &RunContext) -> Result<()> {
    let loaded = load_graph(&args.solution.solution, ctx)?;
    let dangling = loaded.graph.unresolved_references();

    render_mode(
        ctx.output,
        &dangling,
        |dangling, w| {
            for reference in *dangling {
                writeln!(w, "{}\t{}\t{}", reference.from, reference.name, reference.include)?;
            }
            Ok(())
        },
        |dangling, w| {
            pretty_section(w, &format!("Unresolved references ({})", dangling.len()))?;
            if dangling.is_empty() {
                writeln!(w, "none")?;
            }
            for reference in *dangling {
                writeln!(w, "{} -> {}", reference.from, reference.name)?;
                if !reference.include.is_empty() {
                    writeln!(w, "    {}", reference.include)?;
                }
            }
            Ok(())
        },
    )
}
