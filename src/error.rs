use thiserror::Error;

/// Structural failures against the in-memory tree. These are always handled
/// by the caller and never leave the tree modified.
#[derive(Debug, Error, Clone, Eq, PartialEq)]
pub enum FsError {
    #[error("no such file or directory: {0}")]
    NotFound(String),

    #[error("not a directory: {0}")]
    NotADirectory(String),

    #[error("not a file: {0}")]
    NotAFile(String),

    #[error("entry already exists: {0}")]
    DuplicateEntry(String),

    #[error("invalid path: {0}")]
    InvalidPath(String),
}

/// Failures of the content collaborators, including timeouts.
#[derive(Debug, Error, Clone, Eq, PartialEq)]
pub enum OperationError {
    #[error("{0}")]
    Fetch(String),

    #[error("{0}")]
    Save(String),
}
