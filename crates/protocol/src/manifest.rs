//! Map manifest schema (`config.json` inside a map package).

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Metadata describing one map, parsed from a package's manifest entry.
///
/// Fields the loader does not model explicitly are kept in `extra` so they
/// reach the plugin loader unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapManifest {
    pub name: String,
    pub creator: String,
    #[serde(deserialize_with = "string_or_number")]
    pub version: String,
    pub description: String,
    #[serde(deserialize_with = "whole_number")]
    pub population: u64,
    pub code: String,
    /// Present in every imported manifest, but may be `null`.
    pub initial_view_state: Option<ViewState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_bbox: Option<BoundingBox>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bbox: Option<BoundingBox>,
    /// ISO 3166-1 alpha-2 code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MapManifest {
    /// Returns the view state to open the map with.
    ///
    /// Uses the declared view state, falling back to the centre of `bbox`,
    /// then to the centre of `thumbnailBbox`.
    pub fn resolved_view_state(&self) -> Option<ViewState> {
        self.initial_view_state.clone().or_else(|| {
            self.bbox
                .or(self.thumbnail_bbox)
                .map(|bbox| ViewState::centered_on(&bbox))
        })
    }
}

/// Camera position the game opens a map with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    pub longitude: f64,
    pub latitude: f64,
    pub zoom: f64,
    #[serde(default)]
    pub bearing: f64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ViewState {
    /// View state at the geometric centre of `bbox`, default zoom, no bearing.
    pub fn centered_on(bbox: &BoundingBox) -> Self {
        let (longitude, latitude) = bbox.center();
        Self {
            longitude,
            latitude,
            zoom: crate::constants::DEFAULT_VIEW_ZOOM,
            bearing: 0.0,
            extra: Map::new(),
        }
    }
}

/// `[min_lon, min_lat, max_lon, max_lat]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox(pub [f64; 4]);

impl BoundingBox {
    /// Returns `(longitude, latitude)` of the box centre.
    pub fn center(&self) -> (f64, f64) {
        let [min_lon, min_lat, max_lon, max_lat] = self.0;
        ((min_lon + max_lon) / 2.0, (min_lat + max_lat) / 2.0)
    }
}

/// Accepts `"1.2"` as well as `1.2` for version fields.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number, got {other}"
        ))),
    }
}

/// Accepts integers and non-negative floats, rounding the latter.
fn whole_number<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let n = serde_json::Number::deserialize(deserializer)?;
    if let Some(n) = n.as_u64() {
        return Ok(n);
    }
    match n.as_f64() {
        Some(f) if f.is_finite() && f >= 0.0 && f <= u64::MAX as f64 => Ok(f.round() as u64),
        _ => Err(serde::de::Error::custom(format!(
            "expected a non-negative number, got {n}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Value {
        serde_json::json!({
            "name": "Lisbon",
            "creator": "someone",
            "version": "1.0",
            "description": "Lisbon metro area",
            "population": 2_870_000,
            "code": "LIS",
            "initialViewState": {
                "longitude": -9.14,
                "latitude": 38.72,
                "zoom": 11.5,
                "bearing": 0,
                "pitch": 20
            },
            "country": "PT",
            "bbox": [-9.5, 38.5, -8.9, 39.0],
            "dataVersion": 3
        })
    }

    #[test]
    fn parses_known_and_extra_fields() {
        let manifest: MapManifest = serde_json::from_value(sample()).unwrap();
        assert_eq!(manifest.code, "LIS");
        assert_eq!(manifest.population, 2_870_000);
        assert_eq!(manifest.country.as_deref(), Some("PT"));
        assert_eq!(manifest.extra.get("dataVersion"), Some(&Value::from(3)));

        let view = manifest.initial_view_state.unwrap();
        assert_eq!(view.extra.get("pitch"), Some(&Value::from(20)));
    }

    #[test]
    fn numeric_version_is_accepted() {
        let mut value = sample();
        value["version"] = Value::from(2);
        let manifest: MapManifest = serde_json::from_value(value).unwrap();
        assert_eq!(manifest.version, "2");
    }

    #[test]
    fn extra_fields_survive_serialization() {
        let manifest: MapManifest = serde_json::from_value(sample()).unwrap();
        let json = serde_json::to_value(&manifest).unwrap();
        assert_eq!(json["dataVersion"], 3);
        assert_eq!(json["initialViewState"]["pitch"], 20);
        assert!(json.get("thumbnailBbox").is_none());
    }

    #[test]
    fn view_state_falls_back_to_bbox_center() {
        let mut value = sample();
        value["initialViewState"] = Value::Null;
        let manifest: MapManifest = serde_json::from_value(value).unwrap();

        let view = manifest.resolved_view_state().unwrap();
        assert!((view.longitude - -9.2).abs() < 1e-9);
        assert!((view.latitude - 38.75).abs() < 1e-9);
        assert_eq!(view.zoom, 12.0);
        assert_eq!(view.bearing, 0.0);
    }

    #[test]
    fn view_state_falls_back_to_thumbnail_bbox() {
        let mut value = sample();
        value["initialViewState"] = Value::Null;
        value.as_object_mut().unwrap().remove("bbox");
        value["thumbnailBbox"] = serde_json::json!([13.0, 52.0, 14.0, 53.0]);
        let manifest: MapManifest = serde_json::from_value(value).unwrap();

        let view = manifest.resolved_view_state().unwrap();
        assert_eq!(view.longitude, 13.5);
        assert_eq!(view.latitude, 52.5);
        assert_eq!(view.zoom, 12.0);
    }

    #[test]
    fn bbox_preferred_over_thumbnail_bbox() {
        let mut value = sample();
        value["initialViewState"] = Value::Null;
        value["thumbnailBbox"] = serde_json::json!([13.0, 52.0, 14.0, 53.0]);
        let manifest: MapManifest = serde_json::from_value(value).unwrap();

        let view = manifest.resolved_view_state().unwrap();
        assert!((view.longitude - -9.2).abs() < 1e-9);
    }

    #[test]
    fn population_accepts_integer_and_float() {
        let mut value = sample();
        value["population"] = serde_json::json!(2870000.0);
        let manifest: MapManifest = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(manifest.population, 2_870_000);

        value["population"] = serde_json::json!(1234.6);
        let manifest: MapManifest = serde_json::from_value(value).unwrap();
        assert_eq!(manifest.population, 1235);
    }

    #[test]
    fn population_rejects_negative_and_strings() {
        for bad in [serde_json::json!(-5), serde_json::json!(-1.5), serde_json::json!("many")] {
            let mut value = sample();
            value["population"] = bad.clone();
            assert!(
                serde_json::from_value::<MapManifest>(value).is_err(),
                "population {bad} should be rejected"
            );
        }
    }

    #[test]
    fn no_view_state_without_bbox() {
        let mut value = sample();
        value["initialViewState"] = Value::Null;
        value.as_object_mut().unwrap().remove("bbox");
        let manifest: MapManifest = serde_json::from_value(value).unwrap();
        assert!(manifest.resolved_view_state().is_none());
    }
}
