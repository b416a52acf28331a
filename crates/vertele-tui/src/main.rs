mod action;
mod app;
mod app_state;
mod browser;
mod cli;
mod component;
mod components;
mod theme;
mod widgets;

use anyhow::Context;
use clap::Parser;

use vertele_core::categories::CategoryTable;
use vertele_core::config::Config;
use vertele_core::platform;
use vertele_core::player::PlayerLauncher;
use vertele_core::service::PlaybackService;
use vertele_core::store::ChannelStore;

use crate::cli::{Cli, Command};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let data_dir = platform::data_dir();
    std::fs::create_dir_all(&data_dir)?;
    let log_path = data_dir.join("vertele.log");

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    let log_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "debug".to_string());
    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_env_filter(log_filter.as_str())
        .with_ansi(false)
        .init();

    // Print log path to stderr so the operator can tail it immediately.
    eprintln!("vertele log: {}", log_path.display());

    tracing::info!("vertele starting…");

    // ── Load config ──────────────────────────────────────────────────────────
    let config = match &cli.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("could not load config {}", path.display()))?,
        None => Config::load().unwrap_or_else(|e| {
            tracing::warn!("config load failed, using defaults: {}", e);
            Config::default()
        }),
    };

    let categories = CategoryTable::load(&config.ui.categories_file).unwrap_or_else(|e| {
        tracing::warn!(
            "category table {} unusable, using built-in: {}",
            config.ui.categories_file.display(),
            e
        );
        CategoryTable::builtin()
    });

    // ── Store (fatal on failure) ─────────────────────────────────────────────
    let store = ChannelStore::open(cli.store_location(&config))?;
    let mut service = PlaybackService::new(store, PlayerLauncher::new(config.player.clone()));

    match cli.command {
        Some(Command::List) => cli::list(&service, &categories),
        Some(Command::Play { ref instance }) => {
            cli::play(&mut service, instance, cli.player.as_deref()).await
        }
        None => {
            if cli.player.is_none() {
                service.launcher_mut().detect().await;
            }
            let app = app::App::new(service, categories, cli.player)?;
            app.run().await
        }
    }
}
