//! Manager error types.

use maploader_file_ops::FileOpsError;
use maploader_launcher::LaunchError;
use maploader_mod_config::ModConfigError;
use maploader_package::{ConflictError, PackageError};
use maploader_tiles::TileError;

/// Errors produced by manager operations before they are turned into
/// responses.
#[derive(Debug, thiserror::Error)]
pub enum ManagerError {
    #[error(transparent)]
    Package(#[from] PackageError),

    #[error(transparent)]
    FileOps(#[from] FileOpsError),

    #[error(transparent)]
    ModConfig(#[from] ModConfigError),

    #[error(transparent)]
    Launch(#[from] LaunchError),

    #[error(transparent)]
    Tiles(#[from] TileError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("registry error: {0}")]
    Registry(String),
}

impl From<ConflictError> for ManagerError {
    fn from(e: ConflictError) -> Self {
        ManagerError::Package(e.into())
    }
}

impl ManagerError {
    /// Whether the import was refused before anything was written.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            ManagerError::Package(PackageError::Validation(_) | PackageError::Conflict(_))
        )
    }
}
