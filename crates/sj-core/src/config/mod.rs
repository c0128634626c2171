//! Application configuration DTO.
//!
//! Maps the TOML configuration file onto [`AppConfig`]. Keys that are absent
//! from the file fall back to the production defaults below; present values
//! are taken as-is.

use std::path::PathBuf;
use std::time::Duration;

/// Production REST endpoint.
pub const DEFAULT_API_BASE_URL: &str = "https://sarajodapi.vercel.app/api/v1";

/// Matches the request timeout the mobile client used for every call.
pub const DEFAULT_API_TIMEOUT_SECS: u64 = 10;

/// Upper bound for a single remote step of the bootstrap resolver.
pub const DEFAULT_BOOTSTRAP_STEP_TIMEOUT_SECS: u64 = 15;

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Base URL of the REST API, including the `/api/v1` prefix
    pub api_base_url: String,

    /// HTTP client timeout in seconds
    pub api_timeout_secs: u64,

    /// Timeout applied by the resolver around each remote step
    pub bootstrap_step_timeout_secs: u64,

    /// Directory holding the flags file and logs.
    /// Empty means "let the shell pick the platform data dir".
    pub data_dir: PathBuf,
}

impl AppConfig {
    /// Create AppConfig from a parsed TOML document.
    pub fn from_toml(toml_value: &toml::Value) -> anyhow::Result<Self> {
        let defaults = Self::default();

        let api_timeout_secs = match toml_value
            .get("api")
            .and_then(|a| a.get("timeout_secs"))
        {
            Some(v) => read_secs(v, "api.timeout_secs")?,
            None => defaults.api_timeout_secs,
        };

        let bootstrap_step_timeout_secs = match toml_value
            .get("bootstrap")
            .and_then(|b| b.get("step_timeout_secs"))
        {
            Some(v) => read_secs(v, "bootstrap.step_timeout_secs")?,
            None => defaults.bootstrap_step_timeout_secs,
        };

        Ok(Self {
            api_base_url: toml_value
                .get("api")
                .and_then(|a| a.get("base_url"))
                .and_then(|v| v.as_str())
                .map(|s| s.trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_base_url),
            api_timeout_secs,
            bootstrap_step_timeout_secs,
            data_dir: PathBuf::from(
                toml_value
                    .get("storage")
                    .and_then(|s| s.get("data_dir"))
                    .and_then(|v| v.as_str())
                    .unwrap_or(""),
            ),
        })
    }

    pub fn api_timeout(&self) -> Duration {
        Duration::from_secs(self.api_timeout_secs)
    }

    pub fn bootstrap_step_timeout(&self) -> Duration {
        Duration::from_secs(self.bootstrap_step_timeout_secs)
    }

    pub fn flags_file(&self) -> PathBuf {
        self.data_dir.join("flags.json")
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.data_dir.join("logs")
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            api_timeout_secs: DEFAULT_API_TIMEOUT_SECS,
            bootstrap_step_timeout_secs: DEFAULT_BOOTSTRAP_STEP_TIMEOUT_SECS,
            data_dir: PathBuf::new(),
        }
    }
}

fn read_secs(value: &toml::Value, key: &str) -> anyhow::Result<u64> {
    let raw = value
        .as_integer()
        .ok_or_else(|| anyhow::anyhow!("{key} must be an integer"))?;
    u64::try_from(raw).map_err(|_| anyhow::anyhow!("{key} must not be negative, got {raw}"))
}
