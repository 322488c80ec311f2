use std::time::Duration;

/// Archive entry holding the map manifest.
pub const MANIFEST_ENTRY: &str = "config.json";

/// Archive entry with the road network.
pub const ROADS_ENTRY: &str = "roads.geojson";

/// Archive entry with runways and taxiways.
pub const RUNWAYS_TAXIWAYS_ENTRY: &str = "runways_taxiways.geojson";

/// Archive entry with commuter demand data.
pub const DEMAND_DATA_ENTRY: &str = "demand_data.json";

/// Archive entry with the buildings index.
pub const BUILDINGS_INDEX_ENTRY: &str = "buildings_index.json";

/// Extension of the tile archive entry (and of the file in the tile cache).
pub const TILE_ARCHIVE_EXT: &str = "pmtiles";

/// Extension of thumbnail images.
pub const THUMBNAIL_EXT: &str = "svg";

/// Suffix appended to every compressed data file.
pub const COMPRESSED_SUFFIX: &str = ".gz";

/// Manifest fields that must be present, in reporting order.
pub const REQUIRED_MANIFEST_FIELDS: [&str; 7] = [
    "name",
    "creator",
    "version",
    "description",
    "population",
    "code",
    "initialViewState",
];

/// Largest manifest entry read into memory.
pub const MAX_MANIFEST_BYTES: u64 = 1024 * 1024;

/// Maximum zoom level served by the local tile server.
pub const TILE_ZOOM_LEVEL: u8 = 15;

/// Zoom used when a view state is derived from a bounding box.
pub const DEFAULT_VIEW_ZOOM: f64 = 12.0;

/// Host the tile server is reached on.
pub const TILE_SERVER_HOST: &str = "127.0.0.1";

/// Basemap used underneath the locally served vector tiles.
pub const FOUNDATION_TILES_URL: &str = "https://a.basemaps.cartocdn.com/light_all/{z}/{x}/{y}.png";

/// Country codes that never get a tab of their own.
pub const DOMESTIC_COUNTRIES: [&str; 2] = ["US", "GB"];

/// Default time allowed for a tile server to exit before it is force-killed.
pub const TERMINATE_TIMEOUT: Duration = Duration::from_secs(5);

/// Default time allowed for the external thumbnail renderer.
pub const RENDER_TIMEOUT: Duration = Duration::from_secs(60);
