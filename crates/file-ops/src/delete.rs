//! Installed map deletion.

use crate::error::FileOpsError;
use crate::layout::AppLayout;

/// What [`delete_map`] removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteOutcome {
    pub tile_removed: bool,
    pub thumbnail_removed: bool,
}

/// Deletes an installed map: tile archive, thumbnail and map directory.
///
/// The tile archive and thumbnail are removed if present. A missing map
/// directory is reported as [`FileOpsError::NotFound`], even when the tile
/// archive existed and was removed.
pub fn delete_map(layout: &AppLayout, code: &str) -> Result<DeleteOutcome, FileOpsError> {
    if !crate::is_plain_name(code) {
        return Err(FileOpsError::InvalidName(code.to_string()));
    }

    let tile_removed = remove_if_present(&layout.tile_path(code))?;
    let thumbnail_removed = remove_if_present(&layout.thumbnail_path(code))?;

    let map_dir = layout.map_dir(code);
    if !map_dir.is_dir() {
        tracing::warn!(code, tile_removed, "map directory not found");
        return Err(FileOpsError::NotFound(code.to_string()));
    }
    std::fs::remove_dir_all(&map_dir)?;

    tracing::info!(code, dir = %map_dir.display(), tile_removed, "deleted map");
    Ok(DeleteOutcome {
        tile_removed,
        thumbnail_removed,
    })
}

fn remove_if_present(path: &std::path::Path) -> Result<bool, FileOpsError> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e.into()),
    }
}
