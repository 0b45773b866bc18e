use std::fmt;
use std::path::PathBuf;

/// Machine-readable error codes shared by every slngraph crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    NotASolution,
    MalformedSolution,
    ProjectFileUnreadable,
    NestingTooDeep,
    ConfigParseError,
    DuplicateIdentity,
    RecursionLimitExceeded,
    CyclicGraph,
    ProjectNotFound,
    InternalUnexpected,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::NotASolution => "E1001",
            Self::MalformedSolution => "E1002",
            Self::ProjectFileUnreadable => "E1003",
            Self::NestingTooDeep => "E1004",
            Self::ConfigParseError => "E1005",
            Self::DuplicateIdentity => "E2001",
            Self::RecursionLimitExceeded => "E2002",
            Self::CyclicGraph => "E2003",
            Self::ProjectNotFound => "E2004",
            Self::InternalUnexpected => "E9001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::NotASolution => "File is not a solution file",
            Self::MalformedSolution => "Solution file could not be parsed",
            Self::ProjectFileUnreadable => "Project file could not be read",
            Self::NestingTooDeep => "Solution folders nested too deeply",
            Self::ConfigParseError => "Config file parse error",
            Self::DuplicateIdentity => "Two projects share one name",
            Self::RecursionLimitExceeded => "Dependency recursion limit exceeded",
            Self::CyclicGraph => "Dependency cycle detected",
            Self::ProjectNotFound => "Project not found",
            Self::InternalUnexpected => "Internal unexpected error",
        }
    }

    /// Optional remediation hint that can be surfaced to operators.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::NotASolution => Some("Pass a Visual Studio .sln file."),
            Self::MalformedSolution => Some("Check the Project(...) lines of the solution file."),
            Self::ProjectFileUnreadable => Some("Check that the project file is well-formed XML."),
            Self::NestingTooDeep => Some("Flatten the solution folder hierarchy."),
            Self::ConfigParseError => Some("Fix syntax in slngraph.toml and retry."),
            Self::DuplicateIdentity => Some("Rename one of the projects; names are case-insensitive."),
            Self::RecursionLimitExceeded => {
                Some("Look for a dependency cycle, or raise graph.recursion_limit.")
            }
            Self::CyclicGraph => Some("Remove project references until the graph is acyclic."),
            Self::ProjectNotFound => Some("Use `slng projects` to list known project names."),
            Self::InternalUnexpected => Some("Retry once. If persistent, report a bug with logs."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Failures raised by graph construction and graph queries.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// Two input records normalize to the same project key.
    #[error(
        "duplicate project identity '{key}': declared by '{}' and '{}'",
        .first.display(),
        .second.display()
    )]
    DuplicateIdentity {
        key: String,
        first: PathBuf,
        second: PathBuf,
    },

    /// A closure or level computation went deeper than the recursion limit.
    #[error("recursion limit of {limit} exceeded while expanding '{key}'")]
    RecursionLimitExceeded { key: String, limit: usize },

    /// Topological sorting could not place every node.
    #[error("dependency cycle detected: {stranded} project(s) could not be ordered")]
    CyclicGraph { stranded: usize },

    /// A query named a project that is not in the graph.
    #[error("project '{key}' not found in dependency graph")]
    NodeNotFound { key: String },
}

impl GraphError {
    /// Machine-readable code associated with this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::DuplicateIdentity { .. } => ErrorCode::DuplicateIdentity,
            Self::RecursionLimitExceeded { .. } => ErrorCode::RecursionLimitExceeded,
            Self::CyclicGraph { .. } => ErrorCode::CyclicGraph,
            Self::NodeNotFound { .. } => ErrorCode::ProjectNotFound,
        }
    }

    /// Optional remediation hint for operators.
    #[must_use]
    pub const fn hint(&self) -> Option<&'static str> {
        self.code().hint()
    }
}
