//! Map Loader configuration management.
//!
//! Configuration is stored as TOML:
//! - Linux: `~/.config/maploader/config.toml`
//! - Windows: `%APPDATA%/maploader/config.toml`
//! - macOS: `~/Library/Application Support/maploader/config.toml`

use std::path::{Path, PathBuf};
use std::time::Duration;

use maploader_file_ops::expand_home;
use maploader_protocol::constants::TILE_ZOOM_LEVEL;
use serde::{Deserialize, Serialize};

/// Map Loader configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// The game's data folder (contains `cities` and `Local Storage`).
    /// Empty until chosen with `select-folder` or `--app-data`.
    #[serde(default)]
    pub app_data_root: String,

    /// Map Loader's own data folder (tile cache, registry, logs).
    #[serde(default = "default_user_data_root")]
    pub user_data_root: String,

    /// Game executable (or app bundle on macOS).
    #[serde(default)]
    pub game_path: String,

    /// Tile server binary. Empty means the bundled one.
    #[serde(default)]
    pub tile_server_path: String,

    /// Maximum zoom level of the served tiles.
    #[serde(default = "default_tile_zoom_level")]
    pub tile_zoom_level: u8,

    /// Seconds a tile server gets to exit before it is killed.
    #[serde(default = "default_terminate_timeout")]
    pub terminate_timeout_secs: u64,

    /// Seconds the thumbnail renderer may run.
    #[serde(default = "default_render_timeout")]
    pub render_timeout_secs: u64,

    /// External thumbnail renderer. Thumbnails are not generated without one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub renderer: Option<RendererConfig>,
}

/// `[renderer]` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RendererConfig {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
}

fn default_user_data_root() -> String {
    #[cfg(target_os = "windows")]
    {
        let appdata =
            std::env::var("APPDATA").unwrap_or_else(|_| "C:\\Users\\Default\\AppData".into());
        format!("{appdata}\\maploader")
    }

    #[cfg(target_os = "macos")]
    {
        "~/Library/Application Support/maploader".into()
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        "~/.local/share/maploader".into()
    }
}

fn default_tile_zoom_level() -> u8 {
    TILE_ZOOM_LEVEL
}

fn default_terminate_timeout() -> u64 {
    5
}

fn default_render_timeout() -> u64 {
    60
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_data_root: String::new(),
            user_data_root: default_user_data_root(),
            game_path: String::new(),
            tile_server_path: String::new(),
            tile_zoom_level: default_tile_zoom_level(),
            terminate_timeout_secs: default_terminate_timeout(),
            render_timeout_secs: default_render_timeout(),
            renderer: None,
        }
    }
}

impl Config {
    /// Loads configuration from `path`, or creates a default if not found.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            let config = Config::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    /// Saves the configuration to `path`.
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        tracing::debug!(path = %path.display(), "configuration saved");
        Ok(())
    }

    pub fn app_data_root(&self) -> Option<PathBuf> {
        non_empty(&self.app_data_root).map(expand_home)
    }

    pub fn user_data_root(&self) -> PathBuf {
        expand_home(&self.user_data_root)
    }

    pub fn game_path(&self) -> Option<PathBuf> {
        non_empty(&self.game_path).map(expand_home)
    }

    pub fn tile_server_path(&self) -> Option<PathBuf> {
        non_empty(&self.tile_server_path).map(expand_home)
    }

    pub fn terminate_timeout(&self) -> Duration {
        Duration::from_secs(self.terminate_timeout_secs)
    }

    pub fn render_timeout(&self) -> Duration {
        Duration::from_secs(self.render_timeout_secs)
    }
}

fn non_empty(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// Returns the platform-specific configuration file path.
pub fn config_path() -> anyhow::Result<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        let appdata =
            std::env::var("APPDATA").unwrap_or_else(|_| "C:\\Users\\Default\\AppData".into());
        Ok(PathBuf::from(appdata).join("maploader").join("config.toml"))
    }

    #[cfg(target_os = "macos")]
    {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        Ok(PathBuf::from(home)
            .join("Library")
            .join("Application Support")
            .join("maploader")
            .join("config.toml"))
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        Ok(PathBuf::from(home)
            .join(".config")
            .join("maploader")
            .join("config.toml"))
    }
}
