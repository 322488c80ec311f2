//! Tile-server subprocess: spawn, log forwarding, bounded teardown.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::{Child, Command};
use tracing::{debug, info, warn};

use crate::TileError;

/// How to invoke the tile-server binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileServerConfig {
    /// Path to the binary.
    pub binary: PathBuf,
    /// Arguments placed before `serve`, for wrappers around the binary.
    pub leading_args: Vec<String>,
}

impl TileServerConfig {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            leading_args: Vec::new(),
        }
    }

    /// Full argument list for serving `dir` on `port`.
    pub fn args(&self, dir: &Path, port: u16) -> Vec<String> {
        let mut args = self.leading_args.clone();
        args.extend([
            "serve".to_string(),
            dir.display().to_string(),
            "--port".to_string(),
            port.to_string(),
            "--cors=*".to_string(),
        ]);
        args
    }
}

impl Default for TileServerConfig {
    fn default() -> Self {
        Self::new(default_binary_path())
    }
}

/// Returns the bundled binary path: next to the running executable.
pub fn default_binary_path() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
        .join(crate::TILE_SERVER_BINARY)
}

/// Lifecycle of a tile-server handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileServerState {
    Starting,
    Running,
    Stopping,
    Stopped,
}

/// A running tile-server process bound to one directory and port.
///
/// Dropping a handle that was never terminated force-kills the child.
pub struct TileServer {
    child: Child,
    pid: Option<u32>,
    port: u16,
    dir: PathBuf,
    state: TileServerState,
}

impl TileServer {
    /// Spawns the tile server for `dir` on `port`.
    pub fn start(config: &TileServerConfig, dir: &Path, port: u16) -> Result<Self, TileError> {
        let mut child = Command::new(&config.binary)
            .args(config.args(dir, port))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| TileError::Spawn {
                binary: config.binary.clone(),
                source,
            })?;

        let pid = child.id();
        let mut server = Self {
            child,
            pid,
            port,
            dir: dir.to_path_buf(),
            state: TileServerState::Starting,
        };
        server.attach_output();
        server.state = TileServerState::Running;

        info!(
            pid = ?server.pid,
            port,
            dir = %server.dir.display(),
            "tile server started"
        );
        Ok(server)
    }

    fn attach_output(&mut self) {
        if let Some(stdout) = self.child.stdout.take() {
            tokio::spawn(forward_output(stdout, self.port, false));
        }
        if let Some(stderr) = self.child.stderr.take() {
            tokio::spawn(forward_output(stderr, self.port, true));
        }
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn pid(&self) -> Option<u32> {
        self.pid
    }

    pub fn state(&self) -> TileServerState {
        self.state
    }

    /// Stops the server and waits until the process has exited.
    ///
    /// Sends a graceful stop request, waits up to `timeout`, then
    /// force-kills. A handle that is already stopping or stopped is left
    /// alone, so the process receives at most one stop sequence.
    pub async fn terminate(&mut self, timeout: Duration) -> Result<(), TileError> {
        if matches!(
            self.state,
            TileServerState::Stopping | TileServerState::Stopped
        ) {
            debug!(port = self.port, state = ?self.state, "tile server already stopping");
            return Ok(());
        }
        self.state = TileServerState::Stopping;

        if let Some(status) = self.child.try_wait()? {
            info!(port = self.port, %status, "tile server had already exited");
            self.state = TileServerState::Stopped;
            return Ok(());
        }

        if let Some(pid) = self.pid
            && let Err(e) = request_stop(pid).await
        {
            warn!(pid, error = %e, "graceful stop request failed");
        }

        let result = match tokio::time::timeout(timeout, self.child.wait()).await {
            Ok(Ok(status)) => {
                info!(port = self.port, %status, "tile server stopped");
                Ok(())
            }
            Ok(Err(e)) => Err(TileError::Io(e)),
            Err(_) => {
                warn!(
                    port = self.port,
                    timeout_ms = timeout.as_millis() as u64,
                    "tile server did not exit in time, force killing"
                );
                self.child.kill().await.map_err(TileError::Io)
            }
        };

        self.state = TileServerState::Stopped;
        result
    }
}

/// Asks the process to exit on its own.
#[cfg(unix)]
async fn request_stop(pid: u32) -> std::io::Result<()> {
    let output = Command::new("kill")
        .args(["-TERM", &pid.to_string()])
        .output()
        .await?;
    if !output.status.success() {
        return Err(std::io::Error::other(format!(
            "kill -TERM {pid} exited with {}",
            output.status
        )));
    }
    Ok(())
}

/// Asks the process to exit on its own.
#[cfg(windows)]
async fn request_stop(pid: u32) -> std::io::Result<()> {
    let output = Command::new("taskkill")
        .args(["/PID", &pid.to_string()])
        .output()
        .await?;
    if !output.status.success() {
        return Err(std::io::Error::other(format!(
            "taskkill /PID {pid} exited with {}",
            output.status
        )));
    }
    Ok(())
}

/// Forwards each output line of the tile server to the log.
async fn forward_output<R>(stream: R, port: u16, is_stderr: bool)
where
    R: AsyncRead + Unpin,
{
    let mut lines = BufReader::new(stream).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) if is_stderr => warn!(port, "tile server: {line}"),
            Ok(Some(line)) => debug!(port, "tile server: {line}"),
            Ok(None) => break,
            Err(e) => {
                debug!(port, error = %e, "tile server output closed");
                break;
            }
        }
    }
}
