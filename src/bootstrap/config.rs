//! # Configuration Loader
//!
//! Reads the TOML configuration file into [`AppConfig`] and applies the two
//! shell-level overrides: the `SARAJOD_API_BASE_URL` environment variable and
//! the platform data directory when the file does not name one.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::Context;
use sj_core::config::AppConfig;
use tracing::debug;

pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const API_BASE_URL_ENV: &str = "SARAJOD_API_BASE_URL";
const APP_DIR_NAME: &str = "sarajod";

/// Load configuration from a TOML file.
///
/// Values present in the file are taken as-is; absent keys keep their
/// production defaults.
///
/// # Errors
///
/// Returns error if the file cannot be read or is not valid TOML.
pub fn load_config(config_path: PathBuf) -> anyhow::Result<AppConfig> {
    let content = std::fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;
    let toml_value: toml::Value =
        toml::from_str(&content).context("Failed to parse config as TOML")?;
    AppConfig::from_toml(&toml_value)
}

/// Platform data directory for sarajod (`~/.local/share/sarajod` on Linux).
pub fn default_data_dir() -> anyhow::Result<PathBuf> {
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR_NAME))
        .ok_or_else(|| anyhow::anyhow!("Could not determine the platform data directory"))
}

/// Resolve the effective configuration for this process.
///
/// An explicitly requested file must exist. The default file
/// (`<data_dir>/config.toml`) is optional.
pub fn resolve_config(explicit_path: Option<PathBuf>) -> anyhow::Result<AppConfig> {
    let data_dir = default_data_dir()?;

    let config = match explicit_path {
        Some(path) => load_config(path)?,
        None => load_optional(&data_dir.join(CONFIG_FILE_NAME))?,
    };

    Ok(apply_overrides(
        config,
        std::env::var(API_BASE_URL_ENV).ok(),
        data_dir,
    ))
}

fn load_optional(path: &Path) -> anyhow::Result<AppConfig> {
    match std::fs::metadata(path) {
        Ok(_) => load_config(path.to_path_buf()),
        Err(err) if err.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "no config file, using defaults");
            Ok(AppConfig::default())
        }
        Err(err) => Err(err).with_context(|| format!("Failed to stat {}", path.display())),
    }
}

/// Apply the environment override and fill in an empty data directory.
pub fn apply_overrides(
    mut config: AppConfig,
    base_url_override: Option<String>,
    default_data_dir: PathBuf,
) -> AppConfig {
    if let Some(url) = base_url_override.filter(|url| !url.trim().is_empty()) {
        config.api_base_url = url.trim().trim_end_matches('/').to_string();
    }
    if config.data_dir.as_os_str().is_empty() {
        config.data_dir = default_data_dir;
    }
    config
}
