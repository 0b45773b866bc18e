#![forbid(unsafe_code)]
//! slngraph-core library.
//!
//! The dependency-graph engine behind `slng`: project identity, graph
//! construction from project records, memoized transitive closures,
//! pure-dependency reduction and deterministic build ordering.
//!
//! # Conventions
//!
//! - **Errors**: Library functions return [`GraphError`] (`thiserror`).
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).
//!
//! # Typical Usage
//!
//! ```rust
//! use slngraph_core::{DependencyGraph, ProjectRecord};
//!
//! let records = vec![
//!     ProjectRecord::new("App", "src/App/App.csproj").with_references(["Core"]),
//!     ProjectRecord::new("Core", "src/Core/Core.csproj"),
//! ];
//! let graph = DependencyGraph::from_records(records)?;
//! let order = graph.topologically_sorted()?;
//! assert_eq!(order[0].as_str(), "Core");
//! # Ok::<(), slngraph_core::GraphError>(())
//! ```

pub mod error;
pub mod graph;
pub mod identity;
pub mod record;
pub mod report;

pub use error::{ErrorCode, GraphError};
pub use graph::{
    DEFAULT_RECURSION_LIMIT, DependencyGraph, GraphBuilder, GraphNode, NodeRef,
    UnresolvedReference,
};
pub use identity::ProjectKey;
pub use record::{ProjectRecord, ProjectReference};
