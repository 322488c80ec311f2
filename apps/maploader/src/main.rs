//! Map Loader entry point.

mod app;
mod cli;
mod config;
mod prompt;

use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries the JSON responses.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = cli::Cli::parse();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting Map Loader");

    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => config::config_path()?,
    };
    let config = config::Config::load_from(&config_path)?;
    tracing::debug!(path = %config_path.display(), "configuration loaded");

    // A single cooperative scheduler drives every operation.
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    rt.block_on(app::run(cli, config, config_path))
}
