//! Game spawn and lifetime linking with the tile server.

use std::path::Path;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use maploader_protocol::constants::TERMINATE_TIMEOUT;
use maploader_tiles::{TileServer, TileServerConfig, TileServerState};
use tokio::process::{Child, Command};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::error::LaunchError;
use crate::platform::{Platform, resolve_invocation};

/// Starts the game together with its tile server.
#[derive(Debug, Clone)]
pub struct GameLauncher {
    tile_server: TileServerConfig,
    platform: Platform,
    game_args: Vec<String>,
    terminate_timeout: Duration,
}

impl GameLauncher {
    pub fn new(tile_server: TileServerConfig) -> Self {
        Self {
            tile_server,
            platform: Platform::current(),
            game_args: Vec::new(),
            terminate_timeout: TERMINATE_TIMEOUT,
        }
    }

    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    pub fn with_game_args(mut self, args: Vec<String>) -> Self {
        self.game_args = args;
        self
    }

    pub fn with_terminate_timeout(mut self, timeout: Duration) -> Self {
        self.terminate_timeout = timeout;
        self
    }

    /// Spawns the game, then a tile server for `tiles_dir` on `port`.
    ///
    /// If the game cannot be started no tile server is started. If the
    /// tile server cannot be started the game is killed again. On success
    /// the returned session stops the tile server once the game exits.
    pub async fn launch(
        &self,
        game_path: &Path,
        tiles_dir: &Path,
        port: u16,
    ) -> Result<GameSession, LaunchError> {
        let invocation = resolve_invocation(self.platform, game_path, &self.game_args);

        let mut game = Command::new(&invocation.program)
            .args(&invocation.args)
            .stdin(Stdio::null())
            .spawn()
            .map_err(|source| LaunchError::GameSpawn {
                program: invocation.program.clone(),
                source,
            })?;
        let game_pid = game.id();
        info!(pid = ?game_pid, program = %invocation.program.display(), "game started");

        let tile_server = match TileServer::start(&self.tile_server, tiles_dir, port) {
            Ok(server) => server,
            Err(e) => {
                error!(error = %e, "tile server failed to start, stopping game");
                if let Err(kill_err) = game.kill().await {
                    warn!(error = %kill_err, "failed to stop game");
                }
                return Err(e.into());
            }
        };

        let task = tokio::spawn(watch_game(game, tile_server, self.terminate_timeout));

        Ok(GameSession {
            game_pid,
            port,
            task,
        })
    }
}

/// Waits for the game to exit, then stops the tile server.
async fn watch_game(mut game: Child, mut tile_server: TileServer, timeout: Duration) -> SessionEnd {
    let game_status = match game.wait().await {
        Ok(status) => {
            info!(%status, "game exited");
            Some(status)
        }
        Err(e) => {
            warn!(error = %e, "failed to wait for game");
            None
        }
    };

    info!(port = tile_server.port(), "stopping tile server");
    if let Err(e) = tile_server.terminate(timeout).await {
        warn!(error = %e, "failed to stop tile server");
    }

    SessionEnd {
        game_status,
        tile_server: tile_server.state(),
    }
}

/// How a game session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionEnd {
    /// `None` if the game's exit could not be observed.
    pub game_status: Option<ExitStatus>,
    pub tile_server: TileServerState,
}

/// A running game and its tile server.
#[derive(Debug)]
pub struct GameSession {
    game_pid: Option<u32>,
    port: u16,
    task: JoinHandle<SessionEnd>,
}

impl GameSession {
    pub fn game_pid(&self) -> Option<u32> {
        self.game_pid
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Resolves once the game exited and the tile server was torn down.
    pub async fn wait(self) -> Result<SessionEnd, LaunchError> {
        self.task
            .await
            .map_err(|e| LaunchError::Task(e.to_string()))
    }
}
