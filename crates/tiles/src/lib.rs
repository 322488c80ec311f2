//! Local tile serving: ephemeral port allocation and the tile-server
//! subprocess.
//!
//! The tile server is an external binary invoked as
//! `serve <directory> --port <port> --cors=*`. [`TileServer`] tracks its
//! lifecycle as an explicit state machine and makes teardown awaitable.

pub mod error;
pub mod port;
pub mod server;

pub use error::TileError;
pub use port::allocate_port;
pub use server::{TileServer, TileServerConfig, TileServerState, default_binary_path};

/// File name of the bundled tile-server binary.
#[cfg(not(windows))]
pub const TILE_SERVER_BINARY: &str = "pmtiles";

/// File name of the bundled tile-server binary.
#[cfg(windows)]
pub const TILE_SERVER_BINARY: &str = "pmtiles.exe";
