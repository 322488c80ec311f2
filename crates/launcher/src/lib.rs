//! Game launch with a companion tile server.
//!
//! The game process and the tile server serving its custom maps share one
//! lifetime: the server is started right after the game, and the game's
//! exit is the only thing that stops it.

pub mod error;
pub mod launcher;
pub mod platform;

// Re-export primary types for convenience.
pub use error::LaunchError;
pub use launcher::{GameLauncher, GameSession, SessionEnd};
pub use platform::{Invocation, Platform, resolve_invocation};
