//! Tile-server error types.

use std::path::PathBuf;

/// Errors produced while allocating ports or managing the tile server.
#[derive(Debug, thiserror::Error)]
pub enum TileError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to start tile server {}: {source}", binary.display())]
    Spawn {
        binary: PathBuf,
        source: std::io::Error,
    },

    #[error("port allocation failed: {0}")]
    Port(String),
}
