//! Generated configuration for the game's mod loader.
//!
//! # Pipeline
//!
//! 1. **Collect**: selected manifests, tile port and zoom form a
//!    [`RuntimeLaunchConfig`]
//! 2. **Resolve**: every per-place value the loader needs is computed up
//!    front ([`generate`]), including country tabs
//! 3. **Write**: descriptor, resolved document and loader script land in
//!    `<appDataRoot>/mods/mapLoader/` ([`write_artifact`])

pub mod artifact;
pub mod document;
pub mod error;
pub mod generator;
pub mod tabs;

// Re-export primary types for convenience.
pub use artifact::{ArtifactPaths, Author, LOADER_SCRIPT, ModDescriptor, render_script, write_artifact};
pub use document::{
    CityEntry, CountryTab, DataFiles, LayerOverride, LayerVisibility, ModDocument,
    RuntimeLaunchConfig, TileOverride,
};
pub use error::ModConfigError;
pub use generator::{generate, thumbnail_url};
pub use tabs::{country_name, flag_emoji, generate_tabs};

/// Version of the resolved document layout.
pub const DOCUMENT_SCHEMA_VERSION: u32 = 1;
