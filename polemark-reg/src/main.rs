//! polemark-reg - pole registration assistant
//!
//! Local HTTP service backing the registration flow: identifier
//! normalization and prediction, the continuous-registration session, and
//! routing of photo uploads to the proximity check or manual entry.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use polemark_common::config::{RootFolderInitializer, RootFolderResolver, TomlConfig};
use polemark_common::SessionStore;
use polemark_reg::extractors::ExifCoordinateExtractor;
use polemark_reg::services::{HttpNearbyPoles, NearbyPoles};
use polemark_reg::{build_router, AppState};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const MODULE_NAME: &str = "polemark-reg";
const DEFAULT_PORT: u16 = 5790;

/// Command-line arguments for polemark-reg
#[derive(Parser, Debug)]
#[command(name = "polemark-reg")]
#[command(about = "Pole registration assistant for polemark")]
#[command(version)]
struct Args {
    /// Port to listen on (overrides the config file)
    #[arg(short, long, env = "POLEMARK_REG_PORT")]
    port: Option<u16>,

    /// Root folder holding device-local state
    #[arg(short, long)]
    root_folder: Option<PathBuf>,

    /// Config file (default: ~/.config/polemark/polemark-reg.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Read before tracing starts so logging.level can seed the filter
    let config = TomlConfig::load_for_module(MODULE_NAME, args.config.as_deref())
        .context("Failed to load configuration")?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                let level = &config.logging.level;
                format!("polemark_reg={0},polemark_common={0},tower_http={0}", level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting polemark registration assistant ({}) v{}",
        MODULE_NAME,
        env!("CARGO_PKG_VERSION")
    );

    let root_folder = RootFolderResolver::new(MODULE_NAME)
        .with_cli_arg(args.root_folder)
        .with_toml(&config)
        .resolve();
    let initializer = RootFolderInitializer::new(root_folder);
    initializer
        .ensure_directory_exists()
        .context("Failed to create root folder")?;
    info!("Root folder: {}", initializer.root_folder().display());
    match args.config.as_deref() {
        Some(path) => info!("Config file: {}", path.display()),
        None => info!("Config file: default location (compiled defaults if absent)"),
    }

    let sessions = SessionStore::new(initializer.session_path());
    info!("Session file: {}", sessions.path().display());

    let nearby: Option<Arc<dyn NearbyPoles>> = match config.nearby.url.as_deref() {
        Some(url) => {
            let client =
                HttpNearbyPoles::new(url, Duration::from_millis(config.nearby.timeout_ms))
                    .context("Failed to create nearby-pole client")?;
            info!("Nearby-pole registry: {}", client.endpoint());
            Some(Arc::new(client))
        }
        None => {
            warn!("No nearby.url configured; proximity checks will return no candidates");
            None
        }
    };

    info!(
        duplicate_check_radius_m = config.registration.duplicate_check_radius_m.meters(),
        field_verification_radius_m = config.registration.field_verification_radius_m.meters(),
        max_image_bytes = config.registration.max_image_bytes,
        "Registration settings"
    );

    let state = AppState::new(
        Arc::new(ExifCoordinateExtractor::new()),
        nearby,
        sessions,
        config.registration.clone(),
    );
    let app = build_router(state);

    let port = args.port.or(config.port).unwrap_or(DEFAULT_PORT);
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!("polemark-reg listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
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
