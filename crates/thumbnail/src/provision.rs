//! Ephemeral tile server + renderer orchestration.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use maploader_protocol::MapManifest;
use maploader_protocol::constants::{TERMINATE_TIMEOUT, THUMBNAIL_EXT};
use maploader_tiles::{TileServer, TileServerConfig, allocate_port};
use tracing::{info, warn};

use crate::error::ThumbnailError;
use crate::renderer::ThumbnailRenderer;

/// Returns `true` when a thumbnail should be rendered for this package.
pub fn needs_thumbnail(manifest: &MapManifest, has_thumbnail: bool) -> bool {
    manifest.thumbnail_bbox.is_some() && !has_thumbnail
}

/// What happened to a thumbnail request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThumbnailOutcome {
    /// No renderer configured.
    Skipped,
    Generated(PathBuf),
    /// Rendering failed; the message was logged.
    Failed(String),
}

/// Renders missing thumbnails.
pub struct ThumbnailProvisioner {
    renderer: Option<Arc<dyn ThumbnailRenderer>>,
    tile_server: TileServerConfig,
    terminate_timeout: Duration,
}

impl ThumbnailProvisioner {
    pub fn new(renderer: Option<Arc<dyn ThumbnailRenderer>>, tile_server: TileServerConfig) -> Self {
        Self {
            renderer,
            tile_server,
            terminate_timeout: TERMINATE_TIMEOUT,
        }
    }

    pub fn with_terminate_timeout(mut self, timeout: Duration) -> Self {
        self.terminate_timeout = timeout;
        self
    }

    /// Renders `<thumbnails_dir>/<code>.svg` from the tiles in `tiles_dir`.
    ///
    /// Never fails: errors are logged and reported as
    /// [`ThumbnailOutcome::Failed`]. The ephemeral tile server has exited
    /// by the time this returns.
    pub async fn provision(
        &self,
        manifest: &MapManifest,
        tiles_dir: &Path,
        thumbnails_dir: &Path,
    ) -> ThumbnailOutcome {
        let Some(renderer) = self.renderer.as_deref() else {
            info!(code = %manifest.code, "no thumbnail renderer configured, skipping");
            return ThumbnailOutcome::Skipped;
        };

        match self
            .generate(renderer, manifest, tiles_dir, thumbnails_dir)
            .await
        {
            Ok(path) => {
                info!(code = %manifest.code, path = %path.display(), "thumbnail generated");
                ThumbnailOutcome::Generated(path)
            }
            Err(e) => {
                warn!(code = %manifest.code, error = %e, "thumbnail generation failed");
                ThumbnailOutcome::Failed(e.to_string())
            }
        }
    }

    async fn generate(
        &self,
        renderer: &dyn ThumbnailRenderer,
        manifest: &MapManifest,
        tiles_dir: &Path,
        thumbnails_dir: &Path,
    ) -> Result<PathBuf, ThumbnailError> {
        let port = allocate_port().await?;
        let mut server = TileServer::start(&self.tile_server, tiles_dir, port)?;

        let rendered = renderer.render(&manifest.code, manifest, port).await;

        if let Err(e) = server.terminate(self.terminate_timeout).await {
            warn!(port, error = %e, "failed to stop thumbnail tile server");
        }

        let svg = rendered?;
        std::fs::create_dir_all(thumbnails_dir)?;
        let path = thumbnails_dir.join(format!("{}.{THUMBNAIL_EXT}", manifest.code));
        std::fs::write(&path, svg)?;
        Ok(path)
    }
}
