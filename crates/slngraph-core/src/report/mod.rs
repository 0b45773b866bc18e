//! Report assembly over a [`crate::DependencyGraph`].
//!
//! - [`summary`]: per-project JSON summaries in build order.
//! - [`trees`]: forward and reverse dependency trees, plain or dense.
//! - [`dot`]: GraphViz export with pure-edge highlighting.

pub mod dot;
pub mod summary;
pub mod trees;

pub use dot::{DotOptions, RankDir, to_dot};
pub use summary::{ProjectSummary, build_project_summaries};
pub use trees::{DependencyReport, TreeDirection, TreeNode};
