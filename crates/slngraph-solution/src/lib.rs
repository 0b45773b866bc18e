#![forbid(unsafe_code)]
//! slngraph-solution library.
//!
//! Loads Visual Studio solutions from disk and turns them into the
//! [`slngraph_core::ProjectRecord`]s the dependency graph is built from.
//!
//! # Layers
//!
//! - [`sln`]: line-oriented `.sln` parsing (project entries, folder nesting).
//! - [`project_file`]: MSBuild XML parsing (SDK, target frameworks, project
//!   references).
//! - [`loader`]: combines both into [`Solution`] and [`ProjectDetails`].
//! - [`tree`]: the solution-folder hierarchy as a serializable tree.
//!
//! # Typical Usage
//!
//! ```rust,no_run
//! use slngraph_core::DependencyGraph;
//! use slngraph_solution::Solution;
//!
//! let solution = Solution::load("MySolution.sln")?;
//! let mut graph = DependencyGraph::from_records(solution.to_records())?;
//! graph.strip_singleton_stubs();
//! for key in graph.topologically_sorted()? {
//!     println!("{key}");
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod error;
pub mod loader;
pub mod project_file;
pub mod project_types;
pub mod sln;
pub mod tree;

pub use error::SolutionError;
pub use loader::{ProjectDetails, Solution};
pub use project_file::{ProjectFile, ProjectFileReference};
pub use sln::{SolutionInfo, SolutionProjectInfo};
pub use tree::{SolutionTreeNode, solution_tree};
