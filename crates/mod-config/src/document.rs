//! Launch inputs and the resolved document handed to the mod loader.

use maploader_protocol::{MapManifest, ViewState};
use serde::{Deserialize, Serialize};

/// Inputs of one launch: the selected maps and where their tiles are served.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeLaunchConfig {
    pub places: Vec<MapManifest>,
    pub tile_zoom_level: u8,
    pub port: u16,
}

/// Everything the loader script registers, fully resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModDocument {
    pub schema_version: u32,
    pub port: u16,
    pub tile_zoom_level: u8,
    pub cities: Vec<CityEntry>,
    pub layer_overrides: Vec<LayerOverride>,
    pub tabs: Vec<CountryTab>,
}

/// One registered city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CityEntry {
    pub code: String,
    pub name: String,
    pub population: u64,
    pub description: String,
    pub map_image_url: String,
    pub initial_view_state: ViewState,
    pub tile_override: TileOverride,
    pub default_layer_visibility: LayerVisibility,
    pub data_files: DataFiles,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TileOverride {
    pub city_code: String,
    pub tiles_url: String,
    pub foundation_tiles_url: String,
    pub max_zoom: u8,
}

/// Both layers start hidden for custom maps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerVisibility {
    pub ocean_foundations: bool,
    pub track_elevations: bool,
}

/// Paths the game fetches city data from. The game appends `.gz`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataFiles {
    pub buildings_index: String,
    pub demand_data: String,
    pub roads: String,
    pub runways_taxiways: String,
}

/// Restyles a base layer to read from the custom tiles' schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerOverride {
    pub layer_id: String,
    pub source_layer: String,
    pub filter: serde_json::Value,
}

/// City picker tab grouping the maps of one country.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryTab {
    pub id: String,
    pub label: String,
    pub emoji: String,
    pub city_codes: Vec<String>,
}
