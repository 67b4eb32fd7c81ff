//! Error types for the import graph pipeline

use std::path::PathBuf;

/// Errors produced while scanning, parsing, laying out or emitting a graph
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("the path '{}' does not exist", .0.display())]
    PathNotFound(PathBuf),

    #[error("'{}' is not a directory", .0.display())]
    NotADirectory(PathBuf),

    #[error("the graph is empty, no visualization can be generated")]
    EmptyGraph,

    /// The file parsed, but tree-sitter flagged syntax errors in it
    #[error("syntax error at line {line}")]
    Syntax { line: usize },

    #[error("failed to set up the Python parser: {0}")]
    Parser(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Serialize(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
