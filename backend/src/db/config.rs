//! Application configuration file and environment variable handling.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use super::repository::{ErrorContext, RepositoryError, RepositoryResult};
use crate::services::{VisualScale, DEFAULT_TOP_N};

/// Name of the configuration file searched by [`AppConfig::from_default_location`].
pub const CONFIG_FILE_NAME: &str = "cellnet.toml";

/// Top-level configuration, read from `cellnet.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub data: DataSettings,
    #[serde(default)]
    pub analysis: AnalysisSettings,
    #[serde(default)]
    pub presentation: PresentationSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Empty means any origin
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSettings {
    #[serde(default = "default_snapshot_path")]
    pub snapshot_path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSettings {
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    /// Maximum number of cached analysis results; 0 disables the cache
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresentationSettings {
    #[serde(default = "default_min_size")]
    pub min_size: f64,
    #[serde(default = "default_max_size")]
    pub max_size: f64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_snapshot_path() -> PathBuf {
    PathBuf::from("data/telemetry.json")
}

fn default_top_n() -> usize {
    DEFAULT_TOP_N
}

fn default_cache_capacity() -> usize {
    256
}

fn default_min_size() -> f64 {
    8.0
}

fn default_max_size() -> f64 {
    20.0
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
        }
    }
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            snapshot_path: default_snapshot_path(),
        }
    }
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            top_n: default_top_n(),
            cache_capacity: default_cache_capacity(),
        }
    }
}

impl Default for PresentationSettings {
    fn default() -> Self {
        Self {
            min_size: default_min_size(),
            max_size: default_max_size(),
        }
    }
}

impl PresentationSettings {
    pub fn scale(&self) -> VisualScale {
        VisualScale::new(self.min_size, self.max_size)
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> RepositoryResult<Self> {
        let path = path.as_ref();
        let context = || {
            ErrorContext::new("load_config")
                .with_entity("config")
                .with_entity_id(path.display())
        };

        let content = fs::read_to_string(path).map_err(|e| {
            RepositoryError::configuration_with_context(
                format!("Failed to read config file: {}", e),
                context(),
            )
        })?;

        let config: AppConfig = toml::from_str(&content).map_err(|e| {
            RepositoryError::configuration_with_context(
                format!("Failed to parse config file: {}", e),
                context(),
            )
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the default location.
    ///
    /// Searches for `cellnet.toml` in:
    /// 1. Current directory
    /// 2. `backend/` directory
    /// 3. Parent directory
    pub fn from_default_location() -> RepositoryResult<Self> {
        match default_config_path() {
            Some(path) => Self::from_file(path),
            None => Err(RepositoryError::configuration(format!(
                "No {} found in standard locations",
                CONFIG_FILE_NAME
            ))),
        }
    }

    /// Default-location file if present, built-in defaults otherwise, then
    /// environment overrides on top.
    pub fn load() -> RepositoryResult<Self> {
        let config = match default_config_path() {
            Some(path) => {
                log::info!("Reading configuration from {}", path.display());
                Self::from_file(path)?
            }
            None => {
                log::info!("No {} found, using defaults", CONFIG_FILE_NAME);
                Self::default()
            }
        };
        config.with_env_overrides()
    }

    /// Apply environment overrides.
    ///
    /// # Environment Variables
    /// - `HOST`: bind address
    /// - `PORT`: bind port
    /// - `TELEMETRY_SNAPSHOT`: path of the JSON snapshot
    /// - `DEMAND_TOP_N`: size of the high-demand slice
    /// - `CACHE_CAPACITY`: analysis cache entries
    pub fn with_env_overrides(mut self) -> RepositoryResult<Self> {
        if let Ok(host) = env::var("HOST") {
            self.server.host = host;
        }
        if let Ok(port) = env::var("PORT") {
            self.server.port = parse_env("PORT", &port)?;
        }
        if let Ok(path) = env::var("TELEMETRY_SNAPSHOT") {
            self.data.snapshot_path = PathBuf::from(path);
        }
        if let Ok(top_n) = env::var("DEMAND_TOP_N") {
            self.analysis.top_n = parse_env("DEMAND_TOP_N", &top_n)?;
        }
        if let Ok(capacity) = env::var("CACHE_CAPACITY") {
            self.analysis.cache_capacity = parse_env("CACHE_CAPACITY", &capacity)?;
        }
        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> RepositoryResult<()> {
        let p = &self.presentation;
        if !(p.min_size.is_finite() && p.max_size.is_finite()) || p.min_size > p.max_size {
            return Err(RepositoryError::configuration(format!(
                "presentation.min_size ({}) must not exceed presentation.max_size ({})",
                p.min_size, p.max_size
            )));
        }
        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn default_config_path() -> Option<PathBuf> {
    [
        PathBuf::from(CONFIG_FILE_NAME),
        PathBuf::from("backend").join(CONFIG_FILE_NAME),
        PathBuf::from("..").join(CONFIG_FILE_NAME),
    ]
    .into_iter()
    .find(|path| path.exists())
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> RepositoryResult<T> {
    value.trim().parse().map_err(|_| {
        RepositoryError::configuration_with_context(
            format!("{} has an invalid value '{}'", key, value),
            ErrorContext::new("env_override").with_entity_id(key),
        )
    })
}
