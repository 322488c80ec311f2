//! Persisted layout, resolved from the two data roots.

use std::path::{Path, PathBuf};

use maploader_protocol::constants::{THUMBNAIL_EXT, TILE_ARCHIVE_EXT};

/// Every path the loader reads or writes.
///
/// `app_data_root` is the game's data folder (maps, thumbnails, mods);
/// `user_data_root` is the loader's own folder (tile cache, registry,
/// logs).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppLayout {
    app_data_root: PathBuf,
    user_data_root: PathBuf,
}

impl AppLayout {
    pub fn new(app_data_root: impl Into<PathBuf>, user_data_root: impl Into<PathBuf>) -> Self {
        Self {
            app_data_root: app_data_root.into(),
            user_data_root: user_data_root.into(),
        }
    }

    pub fn app_data_root(&self) -> &Path {
        &self.app_data_root
    }

    pub fn user_data_root(&self) -> &Path {
        &self.user_data_root
    }

    /// Parent of every installed map directory.
    pub fn maps_root(&self) -> PathBuf {
        self.app_data_root.join("cities").join("data")
    }

    pub fn map_dir(&self, code: &str) -> PathBuf {
        self.maps_root().join(code)
    }

    /// Shared tile cache served by the tile server.
    pub fn tiles_dir(&self) -> PathBuf {
        self.user_data_root.join("tiles")
    }

    pub fn tile_path(&self, code: &str) -> PathBuf {
        self.tiles_dir().join(format!("{code}.{TILE_ARCHIVE_EXT}"))
    }

    pub fn thumbnails_dir(&self) -> PathBuf {
        self.app_data_root
            .join("public")
            .join("data")
            .join("city-maps")
    }

    pub fn thumbnail_path(&self, code: &str) -> PathBuf {
        self.thumbnails_dir().join(format!("{code}.{THUMBNAIL_EXT}"))
    }

    /// Where the generated mod artifact is written.
    pub fn mod_dir(&self) -> PathBuf {
        self.app_data_root.join("mods").join("mapLoader")
    }

    pub fn catalog_path(&self) -> PathBuf {
        self.app_data_root.join("cities").join("latest-cities.yml")
    }

    pub fn registry_path(&self) -> PathBuf {
        self.user_data_root.join("maps.json")
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.user_data_root.join("logs")
    }
}

/// Returns the user's home directory.
pub fn home_dir() -> PathBuf {
    std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/tmp"))
}

/// Expands a `~` prefix to the user's home directory.
pub fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        home_dir().join(rest)
    } else if path == "~" {
        home_dir()
    } else {
        PathBuf::from(path)
    }
}
