//! File operation error types.

/// Errors produced by file operations.
#[derive(Debug, thiserror::Error)]
pub enum FileOpsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Map not found")]
    NotFound(String),

    #[error("invalid name: {0:?}")]
    InvalidName(String),
}
