//! Builders for in-test map packages.

use std::io::Write;
use std::path::Path;

use zip::write::FileOptions;

/// Writes a ZIP archive with the given `(name, contents)` entries.
///
/// Names ending in `/` become directory entries.
pub fn write_zip(path: &Path, entries: &[(&str, &[u8])]) {
    let file = std::fs::File::create(path).unwrap();
    let mut zip = zip::ZipWriter::new(file);
    for (name, contents) in entries {
        if name.ends_with('/') {
            zip.add_directory(*name, FileOptions::default()).unwrap();
        } else {
            zip.start_file(*name, FileOptions::default()).unwrap();
            zip.write_all(contents).unwrap();
        }
    }
    zip.finish().unwrap();
}

/// A manifest with every required field.
pub fn manifest_json(code: &str) -> serde_json::Value {
    serde_json::json!({
        "name": "Test City",
        "creator": "tester",
        "version": "1.0.0",
        "description": "A test map",
        "population": 100_000,
        "code": code,
        "initialViewState": {
            "longitude": 10.0,
            "latitude": 50.0,
            "zoom": 11.0,
            "bearing": 0.0
        }
    })
}

/// A complete package: every required entry plus whatever `extra` adds.
pub fn complete_package(path: &Path, manifest: &serde_json::Value, extra: &[(&str, &[u8])]) {
    let manifest = serde_json::to_vec(manifest).unwrap();
    let required: [(&str, &[u8]); 6] = [
        ("config.json", manifest.as_slice()),
        ("roads.geojson", b"{\"type\":\"FeatureCollection\",\"features\":[]}"),
        ("runways_taxiways.geojson", b"{\"type\":\"FeatureCollection\",\"features\":[]}"),
        ("demand_data.json", b"{\"points\":[]}"),
        ("buildings_index.json", b"{\"cells\":[]}"),
        ("city.pmtiles", b"PMTiles\x03binary-tile-data"),
    ];
    let mut entries = required.to_vec();
    entries.extend_from_slice(extra);
    write_zip(path, &entries);
}
