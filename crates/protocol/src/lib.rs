//! Shared types for maploader.
//!
//! Holds the map manifest schema read from packages, the structured
//! response shapes returned by the caller-facing operations, and the
//! fixed names that make up the on-disk layout.

pub mod constants;
pub mod manifest;
pub mod responses;

// Re-export primary types for convenience.
pub use manifest::{BoundingBox, MapManifest, ViewState};
pub use responses::{DeleteResponse, ImportResponse, StartGameResponse, Status, StatusResponse};
