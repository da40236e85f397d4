//! scorecap-gateway - screenshot intake service
//!
//! Endpoints:
//! - `POST /upload` (multipart field `screenshot`)
//! - `GET /scores`
//! - `PUT /scores/:id`
//! - `GET /health`

use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::Parser;
use scorecap_common::config::ensure_directory_exists;
use scorecap_common::TypeSniffer;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use scorecap_gateway::config::{Args, Config};
use scorecap_gateway::db::{self, ScoreStore};
use scorecap_gateway::services::{IngestionService, ScoringClient};
use scorecap_gateway::{build_router, cors_layer, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "scorecap_gateway=debug,scorecap_common=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Build identification first, before any slow startup work
    info!(
        "Starting scorecap-gateway v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let config = Config::load(Args::parse()).context("Failed to load configuration")?;

    ensure_directory_exists(&config.data_dir)?;
    let db_path = config.database_path();
    info!("Database path: {}", db_path.display());

    let pool = db::init_database_pool(&db_path).await?;
    info!("✓ Connected to database");

    let scorer = ScoringClient::new(&config.cv_service_url, config.relay_timeout)
        .context("Failed to create scoring client")?;
    info!(
        "Scoring service: {} (timeout {:?})",
        scorer.process_url(),
        config.relay_timeout
    );
    info!("Accepted media types: {}", config.allowed_types);

    let ingestion = IngestionService::new(
        TypeSniffer::new(config.allowed_types.clone()),
        scorer,
        ScoreStore::new(pool.clone()),
    );

    let app = build_router(AppState::new(ingestion)).layer(cors_layer(&config.cors_origin)?);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    info!("scorecap-gateway listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    pool.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
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
                tracing::error!("Failed to install signal handler: {}", e);
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
