//! Ephemeral port allocation.

use tokio::net::TcpListener;
use tracing::debug;

use maploader_protocol::constants::TILE_SERVER_HOST;

use crate::TileError;

/// Asks the OS for a free TCP port on the loopback interface.
///
/// The listener is released before returning, so another process may grab
/// the port before the caller binds it. Callers bind immediately afterwards.
pub async fn allocate_port() -> Result<u16, TileError> {
    let listener = TcpListener::bind((TILE_SERVER_HOST, 0)).await?;
    let port = listener.local_addr()?.port();
    drop(listener);

    if port == 0 {
        return Err(TileError::Port("OS returned port 0".into()));
    }

    debug!(port, "allocated ephemeral port");
    Ok(port)
}
