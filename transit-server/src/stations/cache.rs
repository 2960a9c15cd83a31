//! Persisted copy of the geocoded station list.

use std::sync::Arc;

use tracing::warn;

use crate::domain::Station;

use super::error::StationError;
use super::store::KeyValueStore;

/// Store key holding the station list.
pub const STATIONS_KEY: &str = "cached_stations";

/// Station cache over a [`KeyValueStore`].
///
/// The entry is a JSON array of stations. It never expires; the directory
/// clears it explicitly.
#[derive(Clone)]
pub struct StationCache {
    store: Arc<dyn KeyValueStore>,
}

impl StationCache {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Try to load stations from the cache.
    ///
    /// Returns `None` if the entry doesn't exist or is unreadable. Read
    /// failures are logged, not returned.
    pub fn load(&self) -> Option<Vec<Station>> {
        let contents = match self.store.get(STATIONS_KEY) {
            Ok(contents) => contents?,
            Err(e) => {
                warn!(error = %e, "Failed to read station cache");
                return None;
            }
        };

        match serde_json::from_str(&contents) {
            Ok(stations) => Some(stations),
            Err(e) => {
                warn!(error = %e, "Discarding corrupt station cache");
                None
            }
        }
    }

    /// Save stations to the cache.
    pub fn save(&self, stations: &[Station]) -> Result<(), StationError> {
        let json = serde_json::to_string(stations).map_err(|e| StationError::Cache {
            message: format!("failed to serialize cache: {}", e),
        })?;

        self.store.set(STATIONS_KEY, &json)
    }

    /// Remove the cached entry.
    pub fn clear(&self) -> Result<(), StationError> {
        self.store.remove(STATIONS_KEY)
    }
}
