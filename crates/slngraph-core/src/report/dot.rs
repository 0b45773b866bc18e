//! GraphViz export.
//!
//! Produces a `digraph` with one box per project and one edge per direct
//! dependency. Roots, leaves and stubs get their own fill colors. Edges that
//! are implied by another dependency (not pure) are drawn dashed and grey, or
//! left out entirely with [`DotOptions::pure_only`].
//!
//! Pure-edge detection needs closures; on a graph too deep or cyclic for the
//! closure engine every edge is drawn plainly instead.

use std::collections::BTreeSet;
use std::fmt::{self, Write as _};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::GraphError;
use crate::graph::{DependencyGraph, NodeRef};
use crate::identity::ProjectKey;

const ROOT_COLOR: &str = "lightblue";
const LEAF_COLOR: &str = "palegreen";
const STUB_COLOR: &str = "lightgrey";
const PLAIN_COLOR: &str = "white";

/// GraphViz `rankdir`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RankDir {
    #[default]
    #[serde(rename = "LR")]
    LeftRight,
    #[serde(rename = "RL")]
    RightLeft,
    #[serde(rename = "TB")]
    TopBottom,
    #[serde(rename = "BT")]
    BottomTop,
}

impl fmt::Display for RankDir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::LeftRight => "LR",
            Self::RightLeft => "RL",
            Self::TopBottom => "TB",
            Self::BottomTop => "BT",
        };
        f.write_str(text)
    }
}

impl FromStr for RankDir {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "LR" => Ok(Self::LeftRight),
            "RL" => Ok(Self::RightLeft),
            "TB" => Ok(Self::TopBottom),
            "BT" => Ok(Self::BottomTop),
            other => Err(format!("unknown rank direction '{other}' (expected LR, RL, TB or BT)")),
        }
    }
}

/// Rendering switches for [`to_dot`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DotOptions {
    pub rankdir: RankDir,
    /// Omit edges that are not pure dependencies.
    pub pure_only: bool,
}

/// Render the graph as GraphViz source.
///
/// # Errors
///
/// Only unexpected closure failures propagate; recursion-limit failures fall
/// back to drawing every edge.
pub fn to_dot(graph: &DependencyGraph, options: &DotOptions) -> Result<String, GraphError> {
    let mut out = String::new();
    let _ = writeln!(out, "digraph dependencies {{");
    let _ = writeln!(out, "  rankdir={};", options.rankdir);
    let _ = writeln!(out, "  node [shape=box, style=filled, fontname=\"sans-serif\"];");
    let _ = writeln!(out);

    for node in graph.nodes() {
        let _ = writeln!(
            out,
            "  \"{}\" [fillcolor=\"{}\"];",
            escape(&node.record().label),
            fill_color(node)
        );
    }

    let _ = writeln!(out);

    for node in graph.nodes() {
        let pure = pure_targets(graph, node)?;
        for target in node.depends_on() {
            let is_pure = pure.as_ref().is_none_or(|set| set.contains(target.key()));
            let from = escape(&node.record().label);
            let to = escape(&target.record().label);
            if is_pure {
                let _ = writeln!(out, "  \"{from}\" -> \"{to}\";");
            } else if !options.pure_only {
                let _ = writeln!(out, "  \"{from}\" -> \"{to}\" [style=dashed, color=grey];");
            }
        }
    }

    out.push_str("}\n");
    Ok(out)
}

/// Pure targets of `node`, or `None` when the closure engine gives up.
fn pure_targets(
    graph: &DependencyGraph,
    node: NodeRef<'_>,
) -> Result<Option<BTreeSet<ProjectKey>>, GraphError> {
    match graph.find_pure_dependencies(node.key().as_str()) {
        Ok(set) => Ok(Some(set)),
        Err(err @ GraphError::RecursionLimitExceeded { .. }) => {
            warn!(project = %node.key(), error = %err, "drawing all edges without reduction");
            Ok(None)
        }
        Err(err) => Err(err),
    }
}

fn fill_color(node: NodeRef<'_>) -> &'static str {
    if node.is_stub() {
        STUB_COLOR
    } else if node.is_root() {
        ROOT_COLOR
    } else if node.is_leaf() {
        LEAF_COLOR
    } else {
        PLAIN_COLOR
    }
}

fn escape(label: &str) -> String {
    label.replace('\\', "\\\\").replace('"', "\\\"")
}
