//! Fixtures for manager tests.

use std::io::Write;
use std::path::Path;

use maploader_protocol::MapManifest;
use zip::write::FileOptions;

pub fn manifest_value(code: &str) -> serde_json::Value {
    serde_json::json!({
        "name": format!("City {code}"),
        "creator": "tester",
        "version": "1.0",
        "description": "A test map",
        "population": 500_000,
        "code": code,
        "initialViewState": {"longitude": -9.1, "latitude": 38.7, "zoom": 11.0, "bearing": 0.0},
        "country": "PT"
    })
}

pub fn manifest(code: &str) -> MapManifest {
    serde_json::from_value(manifest_value(code)).unwrap()
}

/// Writes a complete map package with `manifest` plus `extra` entries.
pub fn write_package(path: &Path, manifest: &serde_json::Value, extra: &[(&str, &[u8])]) {
    let manifest = serde_json::to_vec(manifest).unwrap();
    let file = std::fs::File::create(path).unwrap();
    let mut zip = zip::ZipWriter::new(file);

    let required: [(&str, &[u8]); 6] = [
        ("config.json", manifest.as_slice()),
        ("roads.geojson", b"{\"type\":\"FeatureCollection\",\"features\":[]}"),
        ("runways_taxiways.geojson", b"{\"type\":\"FeatureCollection\",\"features\":[]}"),
        ("demand_data.json", b"{\"points\":[]}"),
        ("buildings_index.json", b"{\"cells\":[]}"),
        ("tiles.pmtiles", b"PMTiles\x03tile-bytes"),
    ];
    for (name, contents) in required.iter().chain(extra.iter()) {
        zip.start_file(*name, FileOptions::default()).unwrap();
        zip.write_all(contents).unwrap();
    }
    zip.finish().unwrap();
}
