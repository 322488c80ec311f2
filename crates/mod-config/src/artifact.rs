//! Writes the mod descriptor, resolved document and loader script.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::document::ModDocument;
use crate::error::ModConfigError;

/// Mod descriptor (`manifest.json`) read by the game's mod loader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModDescriptor {
    pub id: String,
    pub name: String,
    pub description: String,
    pub version: String,
    pub author: Author,
    pub main: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
}

impl Default for ModDescriptor {
    fn default() -> Self {
        Self {
            id: "com.kronifer.maploader".into(),
            name: "Map Loader".into(),
            description: "Patcher-like mod that allows easy loading of custom maps.".into(),
            version: "1.0.0".into(),
            author: Author {
                name: "Kronifer".into(),
            },
            main: SCRIPT_FILE.into(),
        }
    }
}

const DESCRIPTOR_FILE: &str = "manifest.json";
const DOCUMENT_FILE: &str = "config.json";
const SCRIPT_FILE: &str = "index.js";

/// Loader script body. It only walks the resolved document; every value
/// it registers was computed ahead of time.
pub const LOADER_SCRIPT: &str = r#"const api = window.SubwayBuilderAPI;

for (const city of config.cities) {
    api.registerCity({
        code: city.code,
        name: city.name,
        population: city.population,
        description: city.description,
        mapImageUrl: city.mapImageUrl,
        initialViewState: city.initialViewState,
    });
    api.map.setDefaultLayerVisibility(city.code, city.defaultLayerVisibility);
    api.map.setTileURLOverride(city.tileOverride);
    api.cities.setCityDataFiles(city.code, city.dataFiles);
}

for (const override of config.layerOverrides) {
    api.map.setLayerOverride(override);
}

for (const tab of config.tabs) {
    api.cities.registerTab(tab);
}
"#;

/// Files making up one written artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub descriptor: PathBuf,
    pub document: PathBuf,
    pub script: PathBuf,
}

/// Renders `index.js`: the embedded document followed by the loader.
pub fn render_script(document: &ModDocument) -> Result<String, ModConfigError> {
    let json = serde_json::to_string(document)?;
    Ok(format!("const config = {json};\n{LOADER_SCRIPT}"))
}

/// Writes the artifact into `mod_dir`, replacing any previous one.
pub fn write_artifact(
    mod_dir: &Path,
    descriptor: &ModDescriptor,
    document: &ModDocument,
) -> Result<ArtifactPaths, ModConfigError> {
    std::fs::create_dir_all(mod_dir)?;

    let paths = ArtifactPaths {
        descriptor: mod_dir.join(DESCRIPTOR_FILE),
        document: mod_dir.join(DOCUMENT_FILE),
        script: mod_dir.join(SCRIPT_FILE),
    };

    std::fs::write(&paths.descriptor, serde_json::to_string_pretty(descriptor)?)?;
    std::fs::write(&paths.document, serde_json::to_string_pretty(document)?)?;
    std::fs::write(&paths.script, render_script(document)?)?;

    info!(
        dir = %mod_dir.display(),
        cities = document.cities.len(),
        port = document.port,
        "wrote mod artifact"
    );
    Ok(paths)
}
