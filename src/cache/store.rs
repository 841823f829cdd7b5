//! File-per-key JSON store with a read-only static tier
//!
//! Reads consult the static (pre-seeded) tier first and the dynamic tier
//! second. Writes only ever land in the dynamic directory.

use reqwest::{Client, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::Config;

/// Errors that can occur when writing a cache entry
#[derive(Debug, Error)]
pub enum CacheError {
    /// Directory creation or file write failed
    #[error("Cache I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// Value could not be serialized
    #[error("Failed to serialize cache entry: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Where pre-seeded cache files are read from
#[derive(Debug, Clone)]
pub enum StaticSource {
    /// A directory shipped alongside the binary
    Dir(PathBuf),
    /// Static assets served over HTTP, read as `{base_url}/cache/{key}.json`
    Remote { client: Client, base_url: String },
}

/// Persists JSON values under string keys, one file per key
#[derive(Debug, Clone)]
pub struct CacheStore {
    static_source: StaticSource,
    dynamic_dir: PathBuf,
}

impl CacheStore {
    /// Creates a store with the given static source and writable directory
    pub fn new(static_source: StaticSource, dynamic_dir: PathBuf) -> Self {
        Self {
            static_source,
            dynamic_dir,
        }
    }

    /// Creates a store reading pre-seeded files from `static_dir`
    pub fn with_dirs(static_dir: PathBuf, dynamic_dir: PathBuf) -> Self {
        Self::new(StaticSource::Dir(static_dir), dynamic_dir)
    }

    /// Creates a store from the run mode and cache settings
    ///
    /// Production deployments with a static base URL read pre-seeded files
    /// over HTTP; everything else reads the local static directory.
    pub fn from_config(config: &Config) -> Self {
        let static_source = match (&config.static_base_url, config.reads_static_over_http()) {
            (Some(base_url), true) => StaticSource::Remote {
                client: Client::new(),
                base_url: base_url.clone(),
            },
            _ => StaticSource::Dir(config.static_cache_dir.clone()),
        };
        Self::new(static_source, config.dynamic_cache_dir.clone())
    }

    /// Returns the writable directory
    pub fn dynamic_dir(&self) -> &Path {
        &self.dynamic_dir
    }

    fn file_name(key: &str) -> String {
        format!("{}.json", key)
    }

    /// Reads the value stored under `key`
    ///
    /// Returns `None` when neither tier has the key, or when reading or
    /// parsing fails. Failures are logged, never returned.
    pub async fn read<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let from_static = match &self.static_source {
            StaticSource::Dir(dir) => read_file(&dir.join(Self::file_name(key)), key),
            StaticSource::Remote { client, base_url } => {
                read_remote(client, base_url, key).await
            }
        };
        if from_static.is_some() {
            debug!(key, "static cache hit");
            return from_static;
        }

        let from_dynamic = read_file(&self.dynamic_dir.join(Self::file_name(key)), key);
        if from_dynamic.is_some() {
            debug!(key, "dynamic cache hit");
        }
        from_dynamic
    }

    /// Writes `data` under `key` in the dynamic directory
    ///
    /// The directory is created if missing. Errors are logged here; callers
    /// are free to ignore the returned result.
    pub fn write<T: Serialize>(&self, key: &str, data: &T) -> Result<(), CacheError> {
        let result = self.write_inner(key, data);
        match &result {
            Ok(()) => info!(key, dir = %self.dynamic_dir.display(), "cache written"),
            Err(e) => warn!(key, error = %e, "error writing cache"),
        }
        result
    }

    fn write_inner<T: Serialize>(&self, key: &str, data: &T) -> Result<(), CacheError> {
        fs::create_dir_all(&self.dynamic_dir)?;
        let json = serde_json::to_string_pretty(data)?;
        fs::write(self.dynamic_dir.join(Self::file_name(key)), json)?;
        Ok(())
    }
}

/// Reads and parses a cache file; a missing file is a silent miss
fn read_file<T: DeserializeOwned>(path: &Path, key: &str) -> Option<T> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
        Err(e) => {
            warn!(key, path = %path.display(), error = %e, "error reading cache");
            return None;
        }
    };

    match serde_json::from_str(&content) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(key, path = %path.display(), error = %e, "cache entry does not match schema");
            None
        }
    }
}

/// Fetches a cache file from the static asset host; a 404 is a silent miss
async fn read_remote<T: DeserializeOwned>(client: &Client, base_url: &str, key: &str) -> Option<T> {
    let url = format!(
        "{}/cache/{}",
        base_url.trim_end_matches('/'),
        CacheStore::file_name(key)
    );

    let response = match client.get(&url).send().await {
        Ok(response) => response,
        Err(e) => {
            warn!(key, %url, error = %e, "error fetching remote cache");
            return None;
        }
    };

    if response.status() == StatusCode::NOT_FOUND {
        return None;
    }
    if !response.status().is_success() {
        warn!(key, %url, status = %response.status(), "remote cache returned an error status");
        return None;
    }

    match response.json::<T>().await {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(key, %url, error = %e, "remote cache entry does not match schema");
            None
        }
    }
}
