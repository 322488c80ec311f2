//! Package pipeline error types.

use std::fmt;

/// Required content of a map package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    Roads,
    RunwaysTaxiways,
    DemandData,
    BuildingsIndex,
    Manifest,
    Tiles,
}

impl Category {
    /// Every required category, in reporting order.
    pub const ALL: [Category; 6] = [
        Category::Roads,
        Category::RunwaysTaxiways,
        Category::DemandData,
        Category::BuildingsIndex,
        Category::Manifest,
        Category::Tiles,
    ];

    /// Name shown to the user for a missing category.
    pub fn label(self) -> &'static str {
        use maploader_protocol::constants::*;
        match self {
            Category::Roads => ROADS_ENTRY,
            Category::RunwaysTaxiways => RUNWAYS_TAXIWAYS_ENTRY,
            Category::DemandData => DEMAND_DATA_ENTRY,
            Category::BuildingsIndex => BUILDINGS_INDEX_ENTRY,
            Category::Manifest => MANIFEST_ENTRY,
            Category::Tiles => "tiles",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The package itself is unusable. Raised before any filesystem write.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error(
        "The selected map package is missing the following required files: {}",
        join(.0)
    )]
    MissingContent(Vec<Category>),

    #[error("Error parsing config.json: {0}")]
    ManifestParse(String),

    #[error(
        "The config.json file is missing the following required fields: {}",
        join(.0)
    )]
    ManifestSchema(Vec<&'static str>),

    #[error("Map code {0:?} cannot be used as a directory name.")]
    InvalidCode(String),

    #[error("{entry} is larger than {limit} bytes.")]
    EntryTooLarge { entry: String, limit: u64 },
}

/// The package's code clashes with something already present.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConflictError {
    #[error(
        "A map with the code {0} already exists. Please choose a different map code or delete the existing map."
    )]
    AlreadyLoaded(String),

    #[error("Vanilla map already exists with this code.")]
    VanillaCollision(String),

    #[error("A map with the code {0} is already installed on disk.")]
    AlreadyInstalled(String),
}

/// Errors produced by the package pipeline.
#[derive(Debug, thiserror::Error)]
pub enum PackageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Conflict(#[from] ConflictError),

    #[error("vanilla catalog error: {0}")]
    Catalog(String),

    #[error("write task failed: {0}")]
    Task(String),
}

fn join<T: fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
