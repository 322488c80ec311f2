//! Renderer seam and the external-command implementation.

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::process::Stdio;
use std::time::Duration;

use maploader_protocol::MapManifest;
use maploader_protocol::constants::RENDER_TIMEOUT;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, info};

use crate::error::ThumbnailError;

/// Future returned by [`ThumbnailRenderer::render`].
pub type RenderFuture<'a> = Pin<Box<dyn Future<Output = Result<Vec<u8>, ThumbnailError>> + Send + 'a>>;

/// Draws a map preview from tiles served on a local port.
///
/// Implementations return the image bytes (SVG). Using a trait keeps the
/// provisioner testable without an actual rendering toolchain.
pub trait ThumbnailRenderer: Send + Sync {
    fn render<'a>(&'a self, code: &'a str, manifest: &'a MapManifest, port: u16) -> RenderFuture<'a>;
}

/// Runs an external program as `<program> [args..] <code> <port>`.
///
/// The manifest is written to the program's stdin as JSON and the image is
/// read from its stdout. A run that exceeds the timeout is killed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRenderer {
    program: PathBuf,
    args: Vec<String>,
    timeout: Duration,
}

impl CommandRenderer {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            timeout: RENDER_TIMEOUT,
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn program(&self) -> &std::path::Path {
        &self.program
    }

    async fn run(&self, code: &str, manifest: &MapManifest, port: u16) -> Result<Vec<u8>, ThumbnailError> {
        let payload = serde_json::to_vec(manifest)?;

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .arg(code)
            .arg(port.to_string())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ThumbnailError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        info!(code, port, program = %self.program.display(), "rendering thumbnail");

        if let Some(mut stdin) = child.stdin.take() {
            tokio::spawn(async move {
                // The renderer may exit without reading its input.
                if let Err(e) = stdin.write_all(&payload).await {
                    debug!(error = %e, "renderer closed stdin early");
                }
            });
        }

        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| ThumbnailError::Timeout(self.timeout))??;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ThumbnailError::Render(format!(
                "{} exited with {}: {}",
                self.program.display(),
                output.status,
                stderr.trim()
            )));
        }
        if output.stdout.is_empty() {
            return Err(ThumbnailError::EmptyOutput);
        }

        debug!(code, bytes = output.stdout.len(), "renderer finished");
        Ok(output.stdout)
    }
}

impl ThumbnailRenderer for CommandRenderer {
    fn render<'a>(&'a self, code: &'a str, manifest: &'a MapManifest, port: u16) -> RenderFuture<'a> {
        Box::pin(self.run(code, manifest, port))
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn manifest() -> MapManifest {
        serde_json::from_value(serde_json::json!({
            "name": "Lisbon",
            "creator": "tester",
            "version": "1",
            "description": "",
            "population": 1,
            "code": "LIS",
            "initialViewState": null,
            "thumbnailBbox": [-9.2, 38.7, -9.1, 38.8]
        }))
        .unwrap()
    }

    fn shell_renderer(script: &str) -> CommandRenderer {
        CommandRenderer::new("/bin/sh").with_args(["-c", script, "renderer"])
    }

    #[tokio::test]
    async fn passes_code_and_port_as_arguments() {
        let renderer = shell_renderer("cat > /dev/null; printf '<svg id=\"%s\" port=\"%s\"/>' \"$1\" \"$2\"");
        let svg = renderer.render("LIS", &manifest(), 4567).await.unwrap();
        assert_eq!(svg, b"<svg id=\"LIS\" port=\"4567\"/>");
    }

    #[tokio::test]
    async fn manifest_is_written_to_stdin() {
        let renderer = shell_renderer("cat");
        let echoed = renderer.render("LIS", &manifest(), 1).await.unwrap();
        let parsed: MapManifest = serde_json::from_slice(&echoed).unwrap();
        assert_eq!(parsed.code, "LIS");
        assert!(parsed.thumbnail_bbox.is_some());
    }

    #[tokio::test]
    async fn non_zero_exit_is_render_error() {
        let renderer = shell_renderer("echo 'no tiles' >&2; exit 3");
        let err = renderer.render("LIS", &manifest(), 1).await.unwrap_err();
        match err {
            ThumbnailError::Render(message) => assert!(message.contains("no tiles")),
            other => panic!("expected Render, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_output_is_error() {
        let renderer = shell_renderer("exit 0");
        let err = renderer.render("LIS", &manifest(), 1).await.unwrap_err();
        assert!(matches!(err, ThumbnailError::EmptyOutput));
    }

    #[tokio::test]
    async fn slow_renderer_times_out() {
        let renderer = shell_renderer("exec sleep 30").with_timeout(Duration::from_millis(200));
        let err = renderer.render("LIS", &manifest(), 1).await.unwrap_err();
        assert!(matches!(err, ThumbnailError::Timeout(_)));
    }

    #[tokio::test]
    async fn missing_program_is_spawn_error() {
        let renderer = CommandRenderer::new("/nonexistent/renderer");
        let err = renderer.render("LIS", &manifest(), 1).await.unwrap_err();
        assert!(matches!(err, ThumbnailError::Spawn { .. }));
    }
}
