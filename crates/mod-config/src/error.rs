//! Mod config error types.

/// Errors produced while generating or writing the launch artifact.
#[derive(Debug, thiserror::Error)]
pub enum ModConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
