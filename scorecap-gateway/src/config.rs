//! scorecap-gateway configuration
//!
//! Priority per setting: command line → environment → TOML file → default.

use clap::Parser;
use scorecap_common::config::{load_toml_config, resolve_data_dir};
use scorecap_common::AllowList;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_CV_SERVICE_URL: &str = "http://127.0.0.1:8081";
pub const DEFAULT_RELAY_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:5173";
pub const DATABASE_FILE: &str = "scores.db";

/// Command-line arguments for scorecap-gateway
#[derive(Parser, Debug, Default)]
#[command(name = "scorecap-gateway")]
#[command(about = "Screenshot intake gateway: validates uploads and stores scenario scores")]
#[command(version)]
pub struct Args {
    /// TOML config file
    #[arg(short, long, env = "SCORECAP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Port to listen on
    #[arg(short, long, env = "SCORECAP_GATEWAY_PORT")]
    pub port: Option<u16>,

    /// Folder holding the scores database
    #[arg(short, long, env = "SCORECAP_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Base URL of the scoring service
    #[arg(long, env = "CV_SERVICE_URL")]
    pub cv_service_url: Option<String>,

    /// Deadline for one scoring call, in seconds
    #[arg(long, env = "SCORECAP_RELAY_TIMEOUT_SECS")]
    pub relay_timeout_secs: Option<u64>,

    /// Accepted media types, comma separated
    #[arg(long, env = "SCORECAP_ALLOWED_TYPES")]
    pub allowed_types: Option<AllowList>,

    /// Origin allowed to call the API from a browser
    #[arg(long, env = "SCORECAP_CORS_ORIGIN")]
    pub cors_origin: Option<String>,
}

/// Gateway section of the TOML config file
#[derive(Debug, Default, Deserialize)]
pub struct TomlConfig {
    pub port: Option<u16>,
    pub data_dir: Option<PathBuf>,
    pub cv_service_url: Option<String>,
    pub relay_timeout_secs: Option<u64>,
    pub allowed_types: Option<Vec<String>>,
    pub cors_origin: Option<String>,
}

/// Resolved gateway configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub data_dir: PathBuf,
    pub cv_service_url: String,
    pub relay_timeout: Duration,
    pub allowed_types: AllowList,
    pub cors_origin: String,
}

impl Config {
    /// Resolve from parsed arguments, reading the TOML file they name
    pub fn load(args: Args) -> scorecap_common::Result<Self> {
        let toml: TomlConfig = load_toml_config(args.config.as_deref())?;
        Ok(Self::from_sources(args, toml))
    }

    pub fn from_sources(args: Args, toml: TomlConfig) -> Self {
        Self {
            port: args.port.or(toml.port).unwrap_or(DEFAULT_PORT),
            data_dir: resolve_data_dir(args.data_dir.as_deref(), toml.data_dir.as_deref()),
            cv_service_url: args
                .cv_service_url
                .or(toml.cv_service_url)
                .unwrap_or_else(|| DEFAULT_CV_SERVICE_URL.to_string()),
            relay_timeout: Duration::from_secs(
                args.relay_timeout_secs
                    .or(toml.relay_timeout_secs)
                    .unwrap_or(DEFAULT_RELAY_TIMEOUT_SECS),
            ),
            allowed_types: args
                .allowed_types
                .or_else(|| toml.allowed_types.map(AllowList::new))
                .filter(|list| !list.is_empty())
                .unwrap_or_default(),
            cors_origin: args
                .cors_origin
                .or(toml.cors_origin)
                .unwrap_or_else(|| DEFAULT_CORS_ORIGIN.to_string()),
        }
    }

    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(DATABASE_FILE)
    }
}
