//! Error types for node construction and page loading

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while building a node tree.
///
/// These are always reported at construction time; rendering a tree that was
/// built successfully never fails.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NodeError {
    /// A field the node kind requires was not supplied
    #[error("{kind} node requires field '{field}'")]
    MissingField { kind: String, field: String },

    /// Heading level outside 1..=6
    #[error("Heading level must be between 1 and 6, got {0}")]
    InvalidHeadingLevel(i64),

    /// Unknown value for the `kind` key
    #[error("Unknown node kind '{0}' (expected container, text or heading)")]
    UnknownKind(String),

    /// Attribute name or value that cannot be written as markup
    #[error("Invalid attribute '{name}': {reason}")]
    InvalidAttribute { name: String, reason: String },

    /// A structural field has the wrong type
    #[error("Field '{field}' must be {expected}")]
    InvalidField { field: String, expected: String },

    /// Anything other than a table where a node was expected
    #[error("Expected a node table at {path}")]
    NotANode { path: String },
}

/// Errors raised by the harness while obtaining the root node
#[derive(Error, Debug)]
pub enum AppError {
    /// App file does not exist
    #[error("App file not found: {0}")]
    NotFound(PathBuf),

    /// Extension is neither `.toml` nor `.json`
    #[error("Unsupported app file extension for {0} (expected .toml or .json)")]
    UnsupportedFormat(PathBuf),

    /// The page file has no `index` entry point
    #[error("No index() entry point in {0}")]
    MissingEntryPoint(String),

    /// Failed to parse the page file
    #[error("Failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// The tree described by the page file is invalid
    #[error("Invalid node at {path}: {source}")]
    Node {
        path: String,
        #[source]
        source: NodeError,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl AppError {
    pub fn is_missing_entry_point(&self) -> bool {
        matches!(self, AppError::MissingEntryPoint(_))
    }
}
