//! Thumbnail error types.

use std::path::PathBuf;
use std::time::Duration;

use maploader_tiles::TileError;

/// Errors produced while rendering a thumbnail.
///
/// None of these fail an import; the provisioner logs them and reports
/// [`crate::ThumbnailOutcome::Failed`].
#[derive(Debug, thiserror::Error)]
pub enum ThumbnailError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("tile server error: {0}")]
    Tiles(#[from] TileError),

    #[error("failed to start renderer {}: {source}", program.display())]
    Spawn {
        program: PathBuf,
        source: std::io::Error,
    },

    #[error("renderer failed: {0}")]
    Render(String),

    #[error("renderer produced no output")]
    EmptyOutput,

    #[error("renderer timed out after {0:?}")]
    Timeout(Duration),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
