//! Runtime configuration from environment variables
//!
//! A `.env` file in the working directory is loaded first. Parsing itself is
//! done over a lookup closure so it can be exercised without touching the
//! process environment.

use directories::ProjectDirs;
use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

use crate::data::meteostat::{DEFAULT_STATION, METEOSTAT_BASE_URL, METEOSTAT_HOST};

/// Default listen address for `serve`
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

/// Errors that can occur while reading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// `WINTERTEMP_ENV` holds something other than production/development
    #[error("Invalid WINTERTEMP_ENV: '{0}'. Expected 'production' or 'development'")]
    InvalidMode(String),

    /// `BIND_ADDR` is not a socket address
    #[error("Invalid BIND_ADDR: '{0}'")]
    InvalidBindAddr(String),
}

/// Deployment mode, controlling where cache files are read from and written to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunMode {
    #[default]
    Development,
    Production,
}

impl RunMode {
    /// Parses a mode name; matching is case-insensitive
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Ok(RunMode::Production),
            "development" | "dev" => Ok(RunMode::Development),
            _ => Err(ConfigError::InvalidMode(s.to_string())),
        }
    }
}

/// Settings for the server, the fetcher and the viewer
#[derive(Debug, Clone)]
pub struct Config {
    pub mode: RunMode,
    /// RapidAPI key sent as `X-RapidAPI-Key`
    pub api_key: Option<String>,
    /// Value of the `X-RapidAPI-Host` header
    pub api_host: String,
    pub api_base_url: String,
    /// Weather station identifier
    pub station: String,
    /// Pre-seeded cache files
    pub static_cache_dir: PathBuf,
    /// Cache files written at runtime
    pub dynamic_cache_dir: PathBuf,
    /// In production, pre-seeded cache files are fetched from here instead
    pub static_base_url: Option<String>,
    pub bind_addr: SocketAddr,
    /// Winner label for a winter averaging at or above freezing
    pub warm_label: String,
    /// Winner label for a winter averaging below freezing
    pub cold_label: String,
}

impl Config {
    /// Loads `.env` (if present) and reads the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        // A missing .env file is fine
        let _ = dotenvy::dotenv();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds a configuration from a variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let mode = match get("WINTERTEMP_ENV") {
            Some(raw) => RunMode::parse(&raw)?,
            None => RunMode::default(),
        };

        let bind_raw = get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw
            .trim()
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidBindAddr(bind_raw.clone()))?;

        let dynamic_cache_dir = get("DYNAMIC_CACHE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| default_dynamic_dir(mode));

        Ok(Self {
            mode,
            api_key: get("RAPIDAPI_KEY"),
            api_host: get("RAPIDAPI_HOST").unwrap_or_else(|| METEOSTAT_HOST.to_string()),
            api_base_url: get("METEOSTAT_BASE_URL")
                .unwrap_or_else(|| METEOSTAT_BASE_URL.to_string()),
            station: get("METEOSTAT_STATION").unwrap_or_else(|| DEFAULT_STATION.to_string()),
            static_cache_dir: get("STATIC_CACHE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("cache")),
            dynamic_cache_dir,
            static_base_url: get("STATIC_BASE_URL"),
            bind_addr,
            warm_label: get("WINNER_WARM_LABEL").unwrap_or_else(|| "neomonk".to_string()),
            cold_label: get("WINNER_COLD_LABEL").unwrap_or_else(|| "pajaro".to_string()),
        })
    }

    /// Whether pre-seeded cache files should be read over HTTP
    pub fn reads_static_over_http(&self) -> bool {
        self.mode == RunMode::Production && self.static_base_url.is_some()
    }
}

/// Writable cache directory when none is configured
///
/// Production uses the system temp directory. Development prefers the
/// XDG-compliant cache directory (`~/.cache/wintertemp/` on Linux) and falls
/// back to `./dynamic-cache`.
fn default_dynamic_dir(mode: RunMode) -> PathBuf {
    match mode {
        RunMode::Production => std::env::temp_dir().join("dynamic-cache"),
        RunMode::Development => ProjectDirs::from("", "", "wintertemp")
            .map(|dirs| dirs.cache_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("dynamic-cache")),
    }
}
