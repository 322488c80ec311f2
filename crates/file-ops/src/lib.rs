//! File operations for installed maps.
//!
//! Resolves the on-disk layout from the game's data folder and the
//! loader's own data folder, deletes installed maps, drives folder/file
//! pickers and writes log files.

mod delete;
mod error;
mod layout;
mod log;
mod picker;

pub use delete::{DeleteOutcome, delete_map};
pub use error::FileOpsError;
pub use layout::{AppLayout, expand_home, home_dir};
pub use log::{default_log_name, write_log_file};
pub use picker::{PickKind, Picker, Selection, is_data_folder, select_data_folder, select_file};

/// Returns `true` if `name` is a single plain path component.
pub(crate) fn is_plain_name(name: &str) -> bool {
    let mut components = std::path::Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(std::path::Component::Normal(_)), None)
    ) && !name.contains(['/', '\\'])
}
