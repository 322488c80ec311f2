//! Command dispatch.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, bail};
use maploader_file_ops::{
    AppLayout, Selection, default_log_name, select_data_folder, select_file, write_log_file,
};
use maploader_launcher::GameLauncher;
use maploader_manager::MapManager;
use maploader_protocol::MapManifest;
use maploader_thumbnail::{CommandRenderer, ThumbnailProvisioner, ThumbnailRenderer};
use maploader_tiles::{TileServerConfig, default_binary_path};
use serde::Serialize;

use crate::cli::{Cli, Command};
use crate::config::Config;
use crate::prompt::{PromptPicker, StderrAdvisory};

pub async fn run(cli: Cli, mut config: Config, config_path: PathBuf) -> anyhow::Result<()> {
    let (app_data, user_data) = (cli.app_data, cli.user_data);
    let open_manager = |config: &Config| -> anyhow::Result<MapManager> {
        let layout = resolve_layout(config, app_data.clone(), user_data.clone())?;
        Ok(build_manager(config, layout))
    };

    match cli.command {
        Command::Import { package, existing } => {
            let manager = open_manager(&config)?;
            let existing = if existing.is_empty() {
                manager.installed_codes()?
            } else {
                existing
            };
            let response = manager.import(&existing, &package).await;
            print_json(&response)
        }
        Command::Delete { code } => print_json(&open_manager(&config)?.delete(&code)),
        Command::List => print_json(&open_manager(&config)?.list()?),
        Command::Start { game, codes } => {
            let manager = open_manager(&config)?;
            let game_path = game
                .or_else(|| config.game_path())
                .context("no game path configured; pass --game or set game_path")?;
            let selected = select_maps(manager.list()?, &codes)?;

            let started = manager.start_game(&game_path, &selected).await;
            print_json(&started.response)?;

            if let Some(session) = started.session {
                tracing::info!(pid = ?session.game_pid(), port = session.port(), "waiting for game to exit");
                let end = session.wait().await?;
                tracing::info!(status = ?end.game_status, tile_server = ?end.tile_server, "game session ended");
            }
            Ok(())
        }
        Command::WriteLog { name, message } => {
            let manager = open_manager(&config)?;
            let name = name.unwrap_or_else(default_log_name);
            let path = write_log_file(&manager.layout().logs_dir(), &name, &message)?;
            print_json(&path)
        }
        Command::SelectFolder => {
            let mut picker = PromptPicker::new(std::io::stdin().lock(), std::io::stderr());
            match select_data_folder(&mut picker)? {
                Selection::Chosen(path) => {
                    config.app_data_root = path.display().to_string();
                    config.save_to(&config_path)?;
                    print_json(&path)
                }
                Selection::Cancelled => print_json(&serde_json::Value::Null),
            }
        }
        Command::SelectFile => {
            let mut picker = PromptPicker::new(std::io::stdin().lock(), std::io::stderr());
            match select_file(&mut picker)? {
                Selection::Chosen(path) => print_json(&path),
                Selection::Cancelled => print_json(&serde_json::Value::Null),
            }
        }
    }
}

fn resolve_layout(
    config: &Config,
    app_data: Option<PathBuf>,
    user_data: Option<PathBuf>,
) -> anyhow::Result<AppLayout> {
    let Some(app_data_root) = app_data.or_else(|| config.app_data_root()) else {
        bail!("game data folder not set; run `maploader select-folder` or pass --app-data");
    };
    let user_data_root = user_data.unwrap_or_else(|| config.user_data_root());
    Ok(AppLayout::new(app_data_root, user_data_root))
}

fn build_manager(config: &Config, layout: AppLayout) -> MapManager {
    let tile_server = TileServerConfig::new(
        config
            .tile_server_path()
            .unwrap_or_else(default_binary_path),
    );

    let renderer = config.renderer.as_ref().map(|r| {
        Arc::new(
            CommandRenderer::new(&r.program)
                .with_args(r.args.iter().cloned())
                .with_timeout(config.render_timeout()),
        ) as Arc<dyn ThumbnailRenderer>
    });
    let thumbnails = ThumbnailProvisioner::new(renderer, tile_server.clone())
        .with_terminate_timeout(config.terminate_timeout());
    let launcher =
        GameLauncher::new(tile_server).with_terminate_timeout(config.terminate_timeout());

    MapManager::new(layout, thumbnails, launcher)
        .with_advisory(Arc::new(StderrAdvisory))
        .with_tile_zoom_level(config.tile_zoom_level)
}

/// Picks the manifests named by `codes`, in the order given. No codes means
/// every installed map.
fn select_maps(installed: Vec<MapManifest>, codes: &[String]) -> anyhow::Result<Vec<MapManifest>> {
    if codes.is_empty() {
        return Ok(installed);
    }
    codes
        .iter()
        .map(|code| {
            installed
                .iter()
                .find(|m| &m.code == code)
                .cloned()
                .with_context(|| format!("map {code} is not installed"))
        })
        .collect()
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
