//! scorecap-cv - scoring service
//!
//! Endpoints:
//! - `POST /process` (multipart field `image`)
//! - `GET /health`

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use scorecap_common::config::load_toml_config;
use scorecap_common::{AllowList, TypeSniffer};
use serde::Deserialize;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use scorecap_cv::{build_router, AppState};

const DEFAULT_PORT: u16 = 8081;

/// Command-line arguments for scorecap-cv
#[derive(Parser, Debug)]
#[command(name = "scorecap-cv")]
#[command(about = "Scoring service: turns screenshots into scenario scores")]
#[command(version)]
struct Args {
    /// TOML config file
    #[arg(short, long, env = "SCORECAP_CV_CONFIG")]
    config: Option<PathBuf>,

    /// Port to listen on
    #[arg(short, long, env = "SCORECAP_CV_PORT")]
    port: Option<u16>,

    /// Accepted media types, comma separated
    #[arg(long, env = "SCORECAP_ALLOWED_TYPES")]
    allowed_types: Option<AllowList>,
}

/// TOML config file contents
#[derive(Debug, Default, Deserialize)]
struct TomlConfig {
    port: Option<u16>,
    allowed_types: Option<Vec<String>>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "scorecap_cv=debug,scorecap_common=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting scorecap-cv v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();
    let toml: TomlConfig =
        load_toml_config(args.config.as_deref()).context("Failed to load configuration")?;

    let port = args.port.or(toml.port).unwrap_or(DEFAULT_PORT);
    let allowed_types = args
        .allowed_types
        .or_else(|| toml.allowed_types.map(AllowList::new))
        .filter(|list| !list.is_empty())
        .unwrap_or_default();
    info!("Accepted media types: {}", allowed_types);

    let app = build_router(AppState::new(TypeSniffer::new(allowed_types)));

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    info!("CV service running on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            match tokio::signal::ctrl_c().await {
                Ok(()) => info!("Received Ctrl+C, shutting down"),
                Err(e) => {
                    tracing::error!("Failed to install Ctrl+C handler: {}", e);
                    std::future::pending::<()>().await
                }
            }
        })
        .await
        .context("Server error")?;

    Ok(())
}
