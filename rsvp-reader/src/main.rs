//! RSVP Reader - Main entry point
//!
//! Reads recent clipboard entries and flashes them one word at a time, with
//! the optical recognition point of each word pinned to the same spot. The
//! reader is driven through a local HTTP API; frames and notifications are
//! streamed over SSE.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use rsvp_common::clipboard::DirectoryClipboard;
use rsvp_common::config::{
    resolve_root_folder, ReaderSettings, TomlConfig, DEFAULT_PORT, ROOT_FOLDER_ENV,
};
use rsvp_common::db::{init_database, init_memory_database};
use rsvp_reader::api::{self, AppContext};
use rsvp_reader::config::Config;
use rsvp_reader::render::spawn_frame_publisher;
use rsvp_reader::{ReaderController, SharedState};
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_LOG_FILTER: &str = "rsvp_reader=debug,tower_http=debug";

/// Command-line arguments for rsvp-reader
#[derive(Parser, Debug)]
#[command(name = "rsvp-reader")]
#[command(about = "Speed reader for recent clipboard text")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, env = "RSVP_PORT")]
    port: Option<u16>,

    /// Root folder for the settings database and clipboard directory
    /// (falls back to RSVP_ROOT_FOLDER, then the config file)
    #[arg(short, long)]
    root_folder: Option<PathBuf>,

    /// Config file (default: <config_dir>/rsvp/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory whose files are the clipboard history
    #[arg(long)]
    clipboard_dir: Option<PathBuf>,

    /// Keep settings in memory only
    #[arg(long)]
    ephemeral: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Config is read before tracing starts so it can set the log level
    let (toml_config, config_warning) = TomlConfig::load_or_default(args.config.as_deref());

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        toml_config
            .log_level
            .as_deref()
            .and_then(|level| EnvFilter::try_new(level).ok())
            .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
    });
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Some(warning) = config_warning {
        warn!("{}", warning);
    }

    let root_folder = resolve_root_folder(args.root_folder.as_deref(), ROOT_FOLDER_ENV, &toml_config);
    let port = args.port.or(toml_config.port).unwrap_or(DEFAULT_PORT);
    let mut config = Config::for_root(root_folder, port, ReaderSettings::from_toml(&toml_config));
    if let Some(dir) = args.clipboard_dir.or_else(|| toml_config.clipboard_dir.clone()) {
        config.clipboard_dir = dir;
    }

    info!("Starting RSVP Reader on port {}", config.port);
    info!("Root folder: {}", config.root_folder.display());
    info!("Clipboard directory: {}", config.clipboard_dir.display());

    if let Err(e) = std::fs::create_dir_all(&config.clipboard_dir) {
        warn!(
            "Failed to create clipboard directory {}: {}",
            config.clipboard_dir.display(),
            e
        );
    }

    let db_pool = if args.ephemeral {
        info!("Using in-memory settings database");
        init_memory_database()
            .await
            .context("Failed to open in-memory database")?
    } else {
        info!("Database: {}", config.db_path.display());
        init_database(&config.db_path)
            .await
            .context("Failed to open settings database")?
    };

    let state = Arc::new(SharedState::new(config.settings.default_wpm));

    // Started first so the opening frame is rendered
    let publisher = spawn_frame_publisher(Arc::clone(&state));

    let clipboard = Arc::new(DirectoryClipboard::new(config.clipboard_dir.clone()));
    let controller =
        ReaderController::start(db_pool, clipboard, Arc::clone(&state), &config.settings).await;

    let ctx = AppContext {
        controller: controller.clone(),
    };
    api::run(config.port, ctx, shutdown_signal())
        .await
        .context("HTTP server failed")?;

    controller.shutdown().await;
    publisher.abort();

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
