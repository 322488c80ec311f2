//! Resolves a [`RuntimeLaunchConfig`] into a [`ModDocument`].

use std::path::Path;

use maploader_protocol::MapManifest;
use maploader_protocol::constants::{
    BUILDINGS_INDEX_ENTRY, DEMAND_DATA_ENTRY, FOUNDATION_TILES_URL, ROADS_ENTRY,
    RUNWAYS_TAXIWAYS_ENTRY, THUMBNAIL_EXT, TILE_SERVER_HOST,
};
use serde_json::json;
use tracing::{debug, warn};

use crate::DOCUMENT_SCHEMA_VERSION;
use crate::document::{
    CityEntry, DataFiles, LayerOverride, LayerVisibility, ModDocument, RuntimeLaunchConfig,
    TileOverride,
};
use crate::tabs::generate_tabs;

/// `file:///` URL of a map's installed thumbnail, with forward slashes.
pub fn thumbnail_url(app_data_root: &Path, code: &str) -> String {
    let root = app_data_root.display().to_string().replace('\\', "/");
    let root = root.trim_matches('/');
    format!("file:///{root}/public/data/city-maps/{code}.{THUMBNAIL_EXT}")
}

fn tile_override(code: &str, port: u16, max_zoom: u8) -> TileOverride {
    TileOverride {
        city_code: code.to_string(),
        tiles_url: format!("http://{TILE_SERVER_HOST}:{port}/{code}/{{z}}/{{x}}/{{y}}.mvt"),
        foundation_tiles_url: FOUNDATION_TILES_URL.to_string(),
        max_zoom,
    }
}

fn data_files(code: &str) -> DataFiles {
    let path = |entry: &str| format!("/data/{code}/{entry}");
    DataFiles {
        buildings_index: path(BUILDINGS_INDEX_ENTRY),
        demand_data: path(DEMAND_DATA_ENTRY),
        roads: path(ROADS_ENTRY),
        runways_taxiways: path(RUNWAYS_TAXIWAYS_ENTRY),
    }
}

/// Base layers restyled to read from the custom tiles' `landuse` layer.
fn layer_overrides() -> Vec<LayerOverride> {
    [("parks-large", "park"), ("airports", "aerodrome")]
        .into_iter()
        .map(|(layer_id, kind)| LayerOverride {
            layer_id: layer_id.to_string(),
            source_layer: "landuse".to_string(),
            filter: json!(["==", ["get", "kind"], kind]),
        })
        .collect()
}

fn city_entry(
    place: &MapManifest,
    config: &RuntimeLaunchConfig,
    app_data_root: &Path,
) -> Option<CityEntry> {
    let initial_view_state = place.resolved_view_state()?;

    Some(CityEntry {
        code: place.code.clone(),
        name: place.name.clone(),
        population: place.population,
        description: place.description.clone(),
        map_image_url: thumbnail_url(app_data_root, &place.code),
        initial_view_state,
        tile_override: tile_override(&place.code, config.port, config.tile_zoom_level),
        default_layer_visibility: LayerVisibility::default(),
        data_files: data_files(&place.code),
    })
}

/// Builds the document for `config`.
///
/// A place with no `initialViewState` and no bounding box to derive one
/// from is left out, along with its tab membership.
pub fn generate(config: &RuntimeLaunchConfig, app_data_root: &Path) -> ModDocument {
    let mut cities = Vec::with_capacity(config.places.len());
    let mut placed = Vec::with_capacity(config.places.len());
    for place in &config.places {
        match city_entry(place, config, app_data_root) {
            Some(city) => {
                cities.push(city);
                placed.push(place.clone());
            }
            None => warn!(code = %place.code, "no view state or bounding box, map skipped"),
        }
    }

    let tabs = generate_tabs(&placed);
    debug!(
        cities = cities.len(),
        tabs = tabs.len(),
        port = config.port,
        "generated mod document"
    );

    ModDocument {
        schema_version: DOCUMENT_SCHEMA_VERSION,
        port: config.port,
        tile_zoom_level: config.tile_zoom_level,
        cities,
        layer_overrides: layer_overrides(),
        tabs,
    }
}
