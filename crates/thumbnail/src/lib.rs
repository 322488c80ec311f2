//! Thumbnail fallback for map packages that ship without a preview image.
//!
//! A package that declares `thumbnailBbox` but bundles no `.svg` gets one
//! rendered at import time: an ephemeral tile server is started on the
//! tile cache, an external renderer draws the bounding box from it, and
//! the server is torn down again whatever the outcome.

pub mod error;
pub mod provision;
pub mod renderer;

// Re-export primary types for convenience.
pub use error::ThumbnailError;
pub use provision::{ThumbnailOutcome, ThumbnailProvisioner, needs_thumbnail};
pub use renderer::{CommandRenderer, RenderFuture, ThumbnailRenderer};
