//! Caller-facing map management.
//!
//! [`MapManager`] ties the package pipeline, thumbnail fallback, mod
//! config generation and game launch together, and converts every
//! outcome into the structured responses of `maploader-protocol`.
//! [`MapRegistry`] remembers which manifests are installed.

pub mod error;
pub mod manager;
pub mod registry;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export primary types for convenience.
pub use error::ManagerError;
pub use manager::{MapManager, StartedGame};
pub use registry::MapRegistry;
