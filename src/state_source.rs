//! # Home Assistant State Fetching and Caching
//!
//! Supplies [`StateSnapshot`]s to the card, either from a JSON dump on disk or
//! from a Home Assistant instance over its REST API.
//!
//! ## Data Source
//! - **Endpoint**: `GET <base_url>/api/states` with a long-lived access token
//!   sent as `Authorization: Bearer <token>`
//! - **Format**: JSON array of `{entity_id, state, attributes, last_updated}`
//!
//! ## Caching Strategy
//! - **Location**: `/tmp/windrose_states.json` (cleared on reboot)
//! - **TTL**: configurable, checked against the file modification time
//! - **Fallback**: a corrupt or stale cache is ignored and states are fetched
//!   again
//!
//! All errors propagate through [`StateError`].

use crate::state::{EntityStateRecord, StateSnapshot};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use std::{fs, io};
use thiserror::Error;

/// Errors that can occur while obtaining a state snapshot.
#[derive(Error, Debug)]
pub enum StateError {
    /// HTTP request failed (network, server, or protocol error)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Cache or dump file operations failed
    #[error("cache IO: {0}")]
    Cache(#[from] io::Error),

    /// The payload was not a valid state list
    #[error("invalid state payload: {0}")]
    Parse(#[from] serde_json::Error),

    /// Cache exists but is older than its TTL
    #[error("cache is stale")]
    Stale,
}

/// Default cache file location.
pub const CACHE: &str = "/tmp/windrose_states.json";

/// Connection details of a Home Assistant instance.
#[derive(Clone, Debug)]
pub struct HassSource {
    pub base_url: String,
    pub token: String,
    pub cache_path: PathBuf,
    pub cache_ttl: Duration,
}

impl HassSource {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: token.into(),
            cache_path: PathBuf::from(CACHE),
            cache_ttl: Duration::from_secs(30),
        }
    }

    pub fn with_cache(mut self, path: impl Into<PathBuf>, ttl: Duration) -> Self {
        self.cache_path = path.into();
        self.cache_ttl = ttl;
        self
    }

    fn states_url(&self) -> String {
        format!("{}/api/states", self.base_url.trim_end_matches('/'))
    }

    /// Fetch the current snapshot, from cache when fresh.
    ///
    /// Cache write failures are logged and otherwise ignored.
    pub async fn fetch(&self) -> Result<StateSnapshot, StateError> {
        match load_cache(&self.cache_path, self.cache_ttl) {
            Ok(snapshot) => return Ok(snapshot),
            Err(e) => log::debug!("state cache unusable: {}", e),
        }

        let snapshot = self.fetch_states().await?;

        if let Err(e) = save_cache(&self.cache_path, &snapshot) {
            log::warn!("failed to write state cache: {}", e);
        }
        Ok(snapshot)
    }

    /// Fetch the current snapshot from the network, bypassing the cache.
    pub async fn fetch_states(&self) -> Result<StateSnapshot, StateError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        let records: Vec<EntityStateRecord> = client
            .get(self.states_url())
            .bearer_auth(&self.token)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        log::info!("fetched {} entity states", records.len());
        Ok(StateSnapshot::from_records(records))
    }
}

/// Read a state dump in the `/api/states` format.
pub fn load_snapshot_file<P: AsRef<Path>>(path: P) -> Result<StateSnapshot, StateError> {
    let json = fs::read_to_string(path)?;
    Ok(StateSnapshot::from_json_str(&json)?)
}

/// Load the cached snapshot if it is younger than `ttl`.
pub fn load_cache<P: AsRef<Path>>(path: P, ttl: Duration) -> Result<StateSnapshot, StateError> {
    let modified = fs::metadata(&path)?.modified()?;
    // A modification time in the future counts as fresh
    let age = SystemTime::now()
        .duration_since(modified)
        .unwrap_or(Duration::ZERO);
    if age > ttl {
        return Err(StateError::Stale);
    }
    load_snapshot_file(path)
}

pub fn save_cache<P: AsRef<Path>>(path: P, snapshot: &StateSnapshot) -> Result<(), StateError> {
    fs::write(path, snapshot.to_json_string()?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn snapshot() -> StateSnapshot {
        StateSnapshot::from_records([
            EntityStateRecord::new("sensor.wind_speed", "3.4").with_unit("m/s"),
            EntityStateRecord::new("sensor.wind_direction", "90"),
        ])
    }

    #[test]
    fn test_cache_roundtrip() {
        let file = NamedTempFile::new().unwrap();
        save_cache(file.path(), &snapshot()).unwrap();

        let loaded = load_cache(file.path(), Duration::from_secs(60)).unwrap();
        assert_eq!(loaded, snapshot());
    }

    #[test]
    fn test_stale_cache_is_rejected() {
        let file = NamedTempFile::new().unwrap();
        save_cache(file.path(), &snapshot()).unwrap();
        std::thread::sleep(Duration::from_millis(20));

        let result = load_cache(file.path(), Duration::ZERO);
        assert!(matches!(result, Err(StateError::Stale)));
    }

    #[test]
    fn test_corrupt_cache_is_a_parse_error() {
        let file = NamedTempFile::new().unwrap();
        fs::write(file.path(), "{ not json").unwrap();

        let result = load_cache(file.path(), Duration::from_secs(60));
        assert!(matches!(result, Err(StateError::Parse(_))));
    }

    #[test]
    fn test_missing_file_is_a_cache_error() {
        let result = load_snapshot_file("/nonexistent/states.json");
        assert!(matches!(result, Err(StateError::Cache(_))));
    }

    #[test]
    fn test_states_url() {
        let source = HassSource::new("http://homeassistant.local:8123/", "token");
        assert_eq!(
            source.states_url(),
            "http://homeassistant.local:8123/api/states"
        );
    }

    #[tokio::test]
    async fn test_fetch_prefers_fresh_cache() {
        let file = NamedTempFile::new().unwrap();
        save_cache(file.path(), &snapshot()).unwrap();

        // Unroutable address: only the cache can satisfy this fetch
        let source = HassSource::new("http://127.0.0.1:9", "token")
            .with_cache(file.path(), Duration::from_secs(60));
        assert_eq!(source.fetch().await.unwrap(), snapshot());
    }
}
