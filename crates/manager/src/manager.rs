//! The caller-facing operations: import, delete, start game, list.

use std::path::Path;
use std::sync::Arc;

use maploader_file_ops::{AppLayout, FileOpsError, delete_map};
use maploader_launcher::{GameLauncher, GameSession};
use maploader_mod_config::{ModDescriptor, RuntimeLaunchConfig, generate, write_artifact};
use maploader_package::{
    AdvisorySink, ConflictError, ConflictResolver, Destinations, LogAdvisory, PackageArchive,
    VanillaCatalog, route_entries, validate,
};
use maploader_protocol::constants::TILE_ZOOM_LEVEL;
use maploader_protocol::{DeleteResponse, ImportResponse, MapManifest, StartGameResponse};
use maploader_thumbnail::{ThumbnailOutcome, ThumbnailProvisioner, needs_thumbnail};
use maploader_tiles::allocate_port;
use tracing::{error, info, warn};

use crate::error::ManagerError;
use crate::registry::MapRegistry;

/// Result of [`MapManager::start_game`].
#[derive(Debug)]
pub struct StartedGame {
    pub response: StartGameResponse,
    /// Present when the game was started; resolves when it exits.
    pub session: Option<GameSession>,
}

/// Imports, deletes and launches custom maps for one game installation.
pub struct MapManager {
    layout: AppLayout,
    thumbnails: ThumbnailProvisioner,
    launcher: GameLauncher,
    advisory: Arc<dyn AdvisorySink>,
    descriptor: ModDescriptor,
    tile_zoom_level: u8,
}

impl MapManager {
    pub fn new(layout: AppLayout, thumbnails: ThumbnailProvisioner, launcher: GameLauncher) -> Self {
        Self {
            layout,
            thumbnails,
            launcher,
            advisory: Arc::new(LogAdvisory),
            descriptor: ModDescriptor::default(),
            tile_zoom_level: TILE_ZOOM_LEVEL,
        }
    }

    pub fn with_advisory(mut self, advisory: Arc<dyn AdvisorySink>) -> Self {
        self.advisory = advisory;
        self
    }

    pub fn with_tile_zoom_level(mut self, zoom: u8) -> Self {
        self.tile_zoom_level = zoom;
        self
    }

    pub fn layout(&self) -> &AppLayout {
        &self.layout
    }

    /// Installed manifests, from the registry.
    pub fn list(&self) -> Result<Vec<MapManifest>, ManagerError> {
        Ok(self.registry()?.maps().to_vec())
    }

    /// Codes of every installed map.
    pub fn installed_codes(&self) -> Result<Vec<String>, ManagerError> {
        Ok(self.registry()?.codes())
    }

    fn registry(&self) -> Result<MapRegistry, ManagerError> {
        MapRegistry::load(&self.layout.registry_path())
    }

    // -----------------------------------------------------------------------
    // Import
    // -----------------------------------------------------------------------

    /// Imports the map package at `package`.
    ///
    /// `existing_codes` are the codes the caller currently has loaded.
    pub async fn import(&self, existing_codes: &[String], package: &Path) -> ImportResponse {
        match self.try_import(existing_codes, package).await {
            Ok(manifest) => {
                info!(code = %manifest.code, "map imported");
                ImportResponse::success(manifest)
            }
            Err(e) if e.is_rejection() => {
                warn!(package = %package.display(), error = %e, "map package rejected");
                ImportResponse::err(e.to_string())
            }
            Err(e) => {
                error!(package = %package.display(), error = %e, "map import failed");
                ImportResponse::err(format!("Error importing map: {e}"))
            }
        }
    }

    async fn try_import(
        &self,
        existing_codes: &[String],
        package: &Path,
    ) -> Result<MapManifest, ManagerError> {
        let archive = PackageArchive::open(package)?;
        let validated = validate(&archive)?;
        let manifest = validated.manifest;
        let code = manifest.code.as_str();

        let catalog = VanillaCatalog::load(&self.layout.catalog_path())?;
        ConflictResolver::new(&catalog, self.advisory.as_ref()).check(code, existing_codes)?;
        if self.layout.map_dir(code).exists() {
            return Err(ConflictError::AlreadyInstalled(code.to_string()).into());
        }

        let rollback = Rollback::plan(&self.layout, code);
        let destinations = Destinations {
            map_dir: self.layout.map_dir(code),
            tiles_dir: self.layout.tiles_dir(),
            thumbnails_dir: self.layout.thumbnails_dir(),
        };
        if let Err(e) = route_entries(&archive, code, &destinations).await {
            rollback.run();
            return Err(e.into());
        }

        if needs_thumbnail(&manifest, validated.has_thumbnail) {
            let outcome = self
                .thumbnails
                .provision(
                    &manifest,
                    &self.layout.tiles_dir(),
                    &self.layout.thumbnails_dir(),
                )
                .await;
            if let ThumbnailOutcome::Failed(reason) = outcome {
                warn!(code, reason = %reason, "continuing without thumbnail");
            }
        }

        let mut registry = self.registry()?;
        registry.insert(manifest.clone());
        if let Err(e) = registry.save() {
            warn!(code, error = %e, "failed to record imported map");
        }

        Ok(manifest)
    }

    // -----------------------------------------------------------------------
    // Delete
    // -----------------------------------------------------------------------

    /// Deletes the installed map `code`.
    pub fn delete(&self, code: &str) -> DeleteResponse {
        match delete_map(&self.layout, code) {
            Ok(_) => {
                self.forget(code);
                DeleteResponse::success("Map deleted successfully!")
            }
            Err(FileOpsError::NotFound(_)) => {
                self.forget(code);
                DeleteResponse::err("Map not found")
            }
            Err(e) => {
                error!(code, error = %e, "map deletion failed");
                DeleteResponse::err(format!("Error deleting map: {e}"))
            }
        }
    }

    fn forget(&self, code: &str) {
        let result = self.registry().and_then(|mut registry| {
            if registry.remove(code).is_some() {
                registry.save()?;
            }
            Ok(())
        });
        if let Err(e) = result {
            warn!(code, error = %e, "failed to update registry");
        }
    }

    // -----------------------------------------------------------------------
    // Start game
    // -----------------------------------------------------------------------

    /// Writes the mod artifact for `selected` and starts the game with its
    /// tile server.
    pub async fn start_game(&self, game_path: &Path, selected: &[MapManifest]) -> StartedGame {
        match self.try_start_game(game_path, selected).await {
            Ok(session) => StartedGame {
                response: StartGameResponse::success("Game started successfully!"),
                session: Some(session),
            },
            Err(e) => {
                error!(game = %game_path.display(), error = %e, "failed to start game");
                let message = match e {
                    ManagerError::Launch(e) => format!("Error starting game: {e}"),
                    other => format!("Error preparing game launch: {other}"),
                };
                StartedGame {
                    response: StartGameResponse::err(message),
                    session: None,
                }
            }
        }
    }

    async fn try_start_game(
        &self,
        game_path: &Path,
        selected: &[MapManifest],
    ) -> Result<GameSession, ManagerError> {
        let port = allocate_port().await?;

        let config = RuntimeLaunchConfig {
            places: selected.to_vec(),
            tile_zoom_level: self.tile_zoom_level,
            port,
        };
        let document = generate(&config, self.layout.app_data_root());
        write_artifact(&self.layout.mod_dir(), &self.descriptor, &document)?;

        let tiles_dir = self.layout.tiles_dir();
        std::fs::create_dir_all(&tiles_dir)?;

        info!(port, maps = selected.len(), "launching game");
        let session = self.launcher.launch(game_path, &tiles_dir, port).await?;
        Ok(session)
    }
}

/// Removes what a failed import wrote.
///
/// Files that existed before the import started are left alone.
struct Rollback {
    map_dir: std::path::PathBuf,
    files: Vec<std::path::PathBuf>,
}

impl Rollback {
    fn plan(layout: &AppLayout, code: &str) -> Self {
        let files = [layout.tile_path(code), layout.thumbnail_path(code)]
            .into_iter()
            .filter(|path| !path.exists())
            .collect();
        Self {
            map_dir: layout.map_dir(code),
            files,
        }
    }

    fn run(self) {
        if let Err(e) = std::fs::remove_dir_all(&self.map_dir)
            && e.kind() != std::io::ErrorKind::NotFound
        {
            warn!(dir = %self.map_dir.display(), error = %e, "rollback failed");
        }
        for file in &self.files {
            if let Err(e) = std::fs::remove_file(file)
                && e.kind() != std::io::ErrorKind::NotFound
            {
                warn!(file = %file.display(), error = %e, "rollback failed");
            }
        }
        info!(dir = %self.map_dir.display(), "rolled back partial import");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{manifest, manifest_value, write_package};
    use maploader_protocol::Status;
    use maploader_thumbnail::{RenderFuture, ThumbnailError, ThumbnailRenderer};
    use maploader_tiles::{TileServerConfig, TileServerState};
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSink {
        notices: Mutex<Vec<String>>,
    }

    impl AdvisorySink for RecordingSink {
        fn advise(&self, title: &str, _message: &str) {
            self.notices.lock().unwrap().push(title.to_string());
        }
    }

    #[derive(Default)]
    struct MockRenderer {
        codes: Mutex<Vec<String>>,
    }

    impl ThumbnailRenderer for MockRenderer {
        fn render<'a>(&'a self, code: &'a str, _manifest: &'a MapManifest, _port: u16) -> RenderFuture<'a> {
            self.codes.lock().unwrap().push(code.to_string());
            Box::pin(async move { Ok::<_, ThumbnailError>(format!("<svg id=\"{code}\"/>").into_bytes()) })
        }
    }

    fn shell_server() -> TileServerConfig {
        let mut config = TileServerConfig::new("/bin/sh");
        config.leading_args = vec!["-c".into(), "exec sleep 30".into(), "tile-server".into()];
        config
    }

    struct Fixture {
        _tmp: tempfile::TempDir,
        root: std::path::PathBuf,
        manager: MapManager,
        renderer: Arc<MockRenderer>,
        sink: Arc<RecordingSink>,
    }

    fn fixture() -> Fixture {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().to_path_buf();
        let layout = AppLayout::new(root.join("game"), root.join("loader"));
        let renderer = Arc::new(MockRenderer::default());
        let sink = Arc::new(RecordingSink::default());

        let thumbnails = ThumbnailProvisioner::new(Some(renderer.clone()), shell_server());
        let launcher = GameLauncher::new(shell_server())
            .with_platform(maploader_launcher::Platform::Direct)
            .with_game_args(vec!["-c".into(), "sleep 0.2".into(), "game".into()]);
        let manager = MapManager::new(layout, thumbnails, launcher).with_advisory(sink.clone());

        Fixture {
            _tmp: tmp,
            root,
            manager,
            renderer,
            sink,
        }
    }

    impl Fixture {
        fn package(&self, name: &str, manifest: &serde_json::Value, extra: &[(&str, &[u8])]) -> std::path::PathBuf {
            let path = self.root.join(name);
            write_package(&path, manifest, extra);
            path
        }
    }

    #[tokio::test]
    async fn import_installs_and_records_map() {
        let f = fixture();
        let pkg = f.package("lis.zip", &manifest_value("LIS"), &[("thumb.svg", b"<svg/>")]);

        let response = f.manager.import(&[], &pkg).await;
        assert_eq!(response.status, Status::Success, "{}", response.message);
        assert_eq!(response.message, "Map imported successfully!");
        assert_eq!(response.manifest.as_ref().unwrap().code, "LIS");

        let layout = f.manager.layout();
        assert!(layout.map_dir("LIS").join("roads.geojson.gz").exists());
        assert_eq!(
            std::fs::read(layout.tile_path("LIS")).unwrap(),
            b"PMTiles\x03tile-bytes"
        );
        assert_eq!(std::fs::read(layout.thumbnail_path("LIS")).unwrap(), b"<svg/>");
        assert_eq!(f.manager.installed_codes().unwrap(), vec!["LIS"]);

        // Bundled thumbnail: nothing rendered.
        assert!(f.renderer.codes.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn loaded_code_is_rejected_without_writes() {
        let f = fixture();
        let pkg = f.package("lis.zip", &manifest_value("LIS"), &[]);

        let response = f.manager.import(&["LIS".to_string()], &pkg).await;
        assert_eq!(response.status, Status::Err);
        assert!(response.message.contains("A map with the code LIS already exists"));
        assert!(response.manifest.is_none());
        assert!(!f.manager.layout().map_dir("LIS").exists());
        assert!(!f.manager.layout().tile_path("LIS").exists());
    }

    #[tokio::test]
    async fn vanilla_collision_is_rejected_with_advisory() {
        let f = fixture();
        let catalog = f.manager.layout().catalog_path();
        std::fs::create_dir_all(catalog.parent().unwrap()).unwrap();
        std::fs::write(&catalog, "cities:\n  NYC:\n    name: New York\n").unwrap();
        let pkg = f.package("nyc.zip", &manifest_value("NYC"), &[]);

        let response = f.manager.import(&[], &pkg).await;
        assert_eq!(response.status, Status::Err);
        assert_eq!(response.message, "Vanilla map already exists with this code.");
        assert_eq!(*f.sink.notices.lock().unwrap(), vec!["Map already exists"]);
        assert!(!f.manager.layout().map_dir("NYC").exists());
    }

    #[tokio::test]
    async fn installed_directory_is_never_overwritten() {
        let f = fixture();
        let map_dir = f.manager.layout().map_dir("LIS");
        std::fs::create_dir_all(&map_dir).unwrap();
        std::fs::write(map_dir.join("keep.txt"), b"mine").unwrap();
        let pkg = f.package("lis.zip", &manifest_value("LIS"), &[]);

        let response = f.manager.import(&[], &pkg).await;
        assert_eq!(response.status, Status::Err);
        assert_eq!(std::fs::read(map_dir.join("keep.txt")).unwrap(), b"mine");
        assert!(!map_dir.join("roads.geojson.gz").exists());
    }

    #[tokio::test]
    async fn incomplete_package_lists_missing_files() {
        let f = fixture();
        let pkg = f.root.join("bad.zip");
        {
            use std::io::Write;
            let mut zip = zip::ZipWriter::new(std::fs::File::create(&pkg).unwrap());
            zip.start_file("roads.geojson", zip::write::FileOptions::default()).unwrap();
            zip.write_all(b"{}").unwrap();
            zip.finish().unwrap();
        }

        let response = f.manager.import(&[], &pkg).await;
        assert_eq!(response.status, Status::Err);
        assert_eq!(
            response.message,
            "The selected map package is missing the following required files: \
             runways_taxiways.geojson, demand_data.json, buildings_index.json, config.json, tiles"
        );
    }

    #[tokio::test]
    async fn routing_failure_rolls_back() {
        let f = fixture();
        let tiles_dir = f.manager.layout().tiles_dir();
        std::fs::create_dir_all(tiles_dir.parent().unwrap()).unwrap();
        std::fs::write(&tiles_dir, b"not a directory").unwrap();
        let pkg = f.package("lis.zip", &manifest_value("LIS"), &[]);

        let response = f.manager.import(&[], &pkg).await;
        assert_eq!(response.status, Status::Err);
        assert!(response.message.starts_with("Error importing map: "));
        assert!(!f.manager.layout().map_dir("LIS").exists());
        assert!(f.manager.installed_codes().unwrap().is_empty());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn missing_thumbnail_is_rendered() {
        let f = fixture();
        let mut value = manifest_value("LIS");
        value["thumbnailBbox"] = serde_json::json!([-9.2, 38.7, -9.1, 38.8]);
        let pkg = f.package("lis.zip", &value, &[]);

        let response = f.manager.import(&[], &pkg).await;
        assert_eq!(response.status, Status::Success, "{}", response.message);
        assert_eq!(*f.renderer.codes.lock().unwrap(), vec!["LIS"]);
        assert_eq!(
            std::fs::read(f.manager.layout().thumbnail_path("LIS")).unwrap(),
            b"<svg id=\"LIS\"/>"
        );
    }

    #[tokio::test]
    async fn delete_removes_map_and_reports_missing() {
        let f = fixture();
        let pkg = f.package("lis.zip", &manifest_value("LIS"), &[]);
        assert!(f.manager.import(&[], &pkg).await.is_success());

        let response = f.manager.delete("LIS");
        assert_eq!(response.status, Status::Success);
        assert_eq!(response.message, "Map deleted successfully!");
        assert!(!f.manager.layout().map_dir("LIS").exists());
        assert!(!f.manager.layout().tile_path("LIS").exists());
        assert!(f.manager.list().unwrap().is_empty());

        let again = f.manager.delete("LIS");
        assert_eq!(again.status, Status::Err);
        assert_eq!(again.message, "Map not found");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn start_game_writes_artifact_and_links_lifetimes() {
        let f = fixture();
        let started = f
            .manager
            .start_game(Path::new("/bin/sh"), &[manifest("LIS")])
            .await;
        assert_eq!(started.response.status, Status::Success);
        assert_eq!(started.response.message, "Game started successfully!");

        let mod_dir = f.manager.layout().mod_dir();
        let script = std::fs::read_to_string(mod_dir.join("index.js")).unwrap();
        let session = started.session.unwrap();
        assert!(script.contains(&format!("127.0.0.1:{}/LIS/", session.port())));
        assert!(mod_dir.join("manifest.json").exists());

        let end = session.wait().await.unwrap();
        assert_eq!(end.tile_server, TileServerState::Stopped);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn unplaceable_map_does_not_block_launch() {
        let f = fixture();
        let mut place = manifest("BER");
        place.initial_view_state = None;

        let started = f
            .manager
            .start_game(Path::new("/bin/sh"), &[manifest("LIS"), place])
            .await;
        assert_eq!(started.response.status, Status::Success);

        let config = std::fs::read_to_string(f.manager.layout().mod_dir().join("config.json")).unwrap();
        let document: serde_json::Value = serde_json::from_str(&config).unwrap();
        let codes: Vec<_> = document["cities"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["code"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(codes, vec!["LIS"]);

        started.session.unwrap().wait().await.unwrap();
    }

    #[tokio::test]
    async fn missing_game_is_reported() {
        let f = fixture();
        let started = f
            .manager
            .start_game(Path::new("/nonexistent/game"), &[manifest("LIS")])
            .await;
        assert_eq!(started.response.status, Status::Err);
        assert!(started.response.message.starts_with("Error starting game: "));
        assert!(started.session.is_none());
    }
}
