//! Configuration loading and data folder resolution
//!
//! Each service resolves its settings in priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable (clap `env` fallback on the same argument)
//! 3. TOML config file
//! 4. Compiled default (fallback)

use crate::{Error, Result};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Load a service TOML config file
///
/// A missing file is not fatal: a warning is logged and defaults are used.
/// A file that exists but does not parse is a configuration error.
pub fn load_toml_config<T>(path: Option<&Path>) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    let Some(path) = path else {
        return Ok(T::default());
    };

    if !path.exists() {
        warn!(
            "Config file not found: {} (using defaults)",
            path.display()
        );
        return Ok(T::default());
    }

    let content = std::fs::read_to_string(path)?;
    let config = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse TOML failed for {}: {}", path.display(), e)))?;

    info!("Loaded config file: {}", path.display());
    Ok(config)
}

/// Resolve the folder holding the service's persistent state
///
/// `cli_or_env` is the clap argument (which already folds in its env var),
/// `toml_value` the `data_dir` key from the config file.
pub fn resolve_data_dir(cli_or_env: Option<&Path>, toml_value: Option<&Path>) -> PathBuf {
    if let Some(path) = cli_or_env {
        return path.to_path_buf();
    }

    if let Some(path) = toml_value {
        return path.to_path_buf();
    }

    default_data_dir()
}

/// Get OS-dependent default data folder path
pub fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("scorecap"))
        .unwrap_or_else(|| PathBuf::from("./scorecap_data"))
}

/// Create the data folder if missing
pub fn ensure_directory_exists(dir: &Path) -> Result<()> {
    if !dir.exists() {
        std::fs::create_dir_all(dir)?;
        info!("Created data folder: {}", dir.display());
    }
    Ok(())
}
