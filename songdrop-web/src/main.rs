//! songdrop-web - Main entry point
//!
//! Starts the song-request queue service: resolves the root folder,
//! opens (or creates) the SQLite database, and serves the public pages,
//! the admin dashboard, and the JSON API on one port.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use songdrop_common::config::{prepare_root_folder, resolve_root_folder};
use songdrop_common::db::init_database;
use songdrop_web::{build_router, AppState};

/// Command-line arguments for songdrop-web
#[derive(Parser, Debug)]
#[command(name = "songdrop-web")]
#[command(about = "Paid song-request queue for DJs")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "5760", env = "SONGDROP_PORT")]
    port: u16,

    /// Root folder holding the database (falls back to env, config file, OS default)
    #[arg(short, long)]
    root_folder: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "songdrop_web=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Log build identification before any database delay
    info!(
        "Starting songdrop-web v{} built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();

    let root_folder = resolve_root_folder(args.root_folder.as_deref(), "SONGDROP_ROOT_FOLDER");
    let db_path = prepare_root_folder(&root_folder)
        .with_context(|| format!("Failed to prepare root folder {}", root_folder.display()))?;
    info!("Database path: {}", db_path.display());

    let pool = init_database(&db_path)
        .await
        .context("Failed to initialize database")?;

    let state = AppState::new(pool);
    let app = build_router(state).layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], args.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!("songdrop-web listening on http://{}", addr);
    info!("Public queue: http://localhost:{}/queue", args.port);
    info!("Admin dashboard: http://localhost:{}/admin", args.port);

    axum::serve(listener, app).await?;

    Ok(())
}
