//! Folder and file selection loops.

use std::path::{Path, PathBuf};

use crate::error::FileOpsError;

/// Result of a selection loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Chosen(PathBuf),
    Cancelled,
}

/// What the picker is asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickKind {
    Folder,
    File,
}

/// A source of user-chosen paths, e.g. a native dialog or a prompt.
pub trait Picker {
    /// Asks for one path. `Ok(None)` means the user cancelled.
    fn pick(&mut self, kind: PickKind) -> std::io::Result<Option<PathBuf>>;

    /// Shows a notice about a rejected choice.
    fn notify(&mut self, title: &str, message: &str);
}

const INVALID_FOLDER_TITLE: &str = "Incorrect Folder";
const INVALID_FOLDER_MESSAGE: &str = "The folder you selected does not appear to be a valid \
     game data folder. Select the folder that contains both `cities` and `Local Storage`.";

/// Returns `true` if `path` looks like the game's data folder.
pub fn is_data_folder(path: &Path) -> bool {
    path.join("cities").exists() && path.join("Local Storage").exists()
}

/// Asks for the game's data folder until a valid one is chosen or the
/// user cancels.
pub fn select_data_folder(picker: &mut dyn Picker) -> Result<Selection, FileOpsError> {
    loop {
        let Some(path) = picker.pick(PickKind::Folder)? else {
            return Ok(Selection::Cancelled);
        };
        if is_data_folder(&path) {
            tracing::info!(path = %path.display(), "data folder selected");
            return Ok(Selection::Chosen(path));
        }
        tracing::warn!(path = %path.display(), "not a game data folder");
        picker.notify(INVALID_FOLDER_TITLE, INVALID_FOLDER_MESSAGE);
    }
}

/// Asks for a file until an existing one is chosen or the user cancels.
pub fn select_file(picker: &mut dyn Picker) -> Result<Selection, FileOpsError> {
    loop {
        let Some(path) = picker.pick(PickKind::File)? else {
            return Ok(Selection::Cancelled);
        };
        if path.is_file() {
            return Ok(Selection::Chosen(path));
        }
        picker.notify("File not found", &format!("{} is not a file.", path.display()));
    }
}
