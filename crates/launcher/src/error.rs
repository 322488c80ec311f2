//! Launch error types.

use std::path::PathBuf;

use maploader_tiles::TileError;

/// Errors produced while launching the game.
#[derive(Debug, thiserror::Error)]
pub enum LaunchError {
    #[error("failed to start game {}: {source}", program.display())]
    GameSpawn {
        program: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to start tile server: {0}")]
    TileServer(#[from] TileError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("session task failed: {0}")]
    Task(String),
}
