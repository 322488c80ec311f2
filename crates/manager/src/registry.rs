//! Persisted list of installed map manifests (`maps.json`).

use std::path::{Path, PathBuf};

use maploader_protocol::MapManifest;
use tracing::{debug, warn};

use crate::error::ManagerError;

/// Installed manifests, in installation order.
#[derive(Debug, Clone, PartialEq)]
pub struct MapRegistry {
    path: PathBuf,
    maps: Vec<MapManifest>,
}

impl MapRegistry {
    /// Loads the registry at `path`. A missing file is an empty registry.
    pub fn load(path: &Path) -> Result<Self, ManagerError> {
        let maps = match std::fs::read(path) {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| ManagerError::Registry(format!("{}: {e}", path.display())))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self {
            path: path.to_path_buf(),
            maps,
        })
    }

    pub fn maps(&self) -> &[MapManifest] {
        &self.maps
    }

    pub fn codes(&self) -> Vec<String> {
        self.maps.iter().map(|m| m.code.clone()).collect()
    }

    pub fn get(&self, code: &str) -> Option<&MapManifest> {
        self.maps.iter().find(|m| m.code == code)
    }

    /// Adds `manifest`, replacing any entry with the same code.
    pub fn insert(&mut self, manifest: MapManifest) {
        match self.maps.iter_mut().find(|m| m.code == manifest.code) {
            Some(existing) => {
                warn!(code = %manifest.code, "replacing registry entry");
                *existing = manifest;
            }
            None => self.maps.push(manifest),
        }
    }

    pub fn remove(&mut self, code: &str) -> Option<MapManifest> {
        let position = self.maps.iter().position(|m| m.code == code)?;
        Some(self.maps.remove(position))
    }

    /// Writes the registry back to disk.
    pub fn save(&self) -> Result<(), ManagerError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.maps)
            .map_err(|e| ManagerError::Registry(e.to_string()))?;
        std::fs::write(&self.path, json)?;
        debug!(path = %self.path.display(), maps = self.maps.len(), "saved registry");
        Ok(())
    }
}
