use std::path::PathBuf;

use slngraph_core::ErrorCode;

/// Failures raised while reading a solution and its project files.
#[derive(Debug, thiserror::Error)]
pub enum SolutionError {
    #[error("failed to read '{}'", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The first significant line is not a solution header.
    #[error("'{}' does not look like a Visual Studio solution file", .path.display())]
    NotASolution { path: PathBuf },

    /// A `Project(...)` line or nesting entry could not be parsed.
    #[error("'{}' line {line}: unable to parse '{text}'", .path.display())]
    MalformedLine {
        path: PathBuf,
        line: usize,
        text: String,
    },

    /// A project file is not well-formed XML.
    #[error("error while loading project file '{}'", .path.display())]
    Xml {
        path: PathBuf,
        #[source]
        source: quick_xml::Error,
    },

    /// Solution folders nest deeper than the tree builder supports.
    #[error("solution folder '{label}' nests deeper than {limit} levels")]
    NestingTooDeep { label: String, limit: usize },
}

impl SolutionError {
    /// Machine-readable code associated with this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Io { .. } | Self::Xml { .. } => ErrorCode::ProjectFileUnreadable,
            Self::NotASolution { .. } => ErrorCode::NotASolution,
            Self::MalformedLine { .. } => ErrorCode::MalformedSolution,
            Self::NestingTooDeep { .. } => ErrorCode::NestingTooDeep,
        }
    }

    /// Optional remediation hint for operators.
    #[must_use]
    pub const fn hint(&self) -> Option<&'static str> {
        self.code().hint()
    }
}
