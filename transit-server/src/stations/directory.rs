//! The set of known stations.
//!
//! Stations are every stop name referenced by any route, geocoded to a
//! position. The list is expensive to build (one geocoder call per name),
//! so it is kept in memory and persisted through [`StationCache`] until
//! explicitly invalidated.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::domain::{Coordinates, Station, StationKey};
use crate::planner::{Candidate, within_radius};
use crate::routes::RouteSource;

use super::Geocoder;
use super::cache::StationCache;
use super::error::StationError;

/// Default timeout for a single geocoder lookup.
const DEFAULT_GEOCODE_TIMEOUT: Duration = Duration::from_secs(10);

/// Default number of lookups in flight during a rebuild.
const DEFAULT_MAX_CONCURRENT_GEOCODES: usize = 8;

/// Tuning for directory rebuilds.
#[derive(Debug, Clone)]
pub struct DirectoryConfig {
    pub geocode_timeout: Duration,
    pub max_concurrent_geocodes: usize,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            geocode_timeout: DEFAULT_GEOCODE_TIMEOUT,
            max_concurrent_geocodes: DEFAULT_MAX_CONCURRENT_GEOCODES,
        }
    }
}

/// Immutable snapshot of the station set, keyed by normalised name.
#[derive(Debug, Clone, Default)]
pub struct StationIndex {
    stations: Vec<Station>,
    by_key: HashMap<StationKey, usize>,
}

impl StationIndex {
    /// Build an index. When two names normalise to the same key the first
    /// one wins.
    pub fn new(stations: Vec<Station>) -> Self {
        let mut by_key = HashMap::with_capacity(stations.len());
        let mut kept = Vec::with_capacity(stations.len());

        for station in stations {
            if by_key.contains_key(station.key()) {
                continue;
            }
            by_key.insert(station.key().clone(), kept.len());
            kept.push(station);
        }

        Self {
            stations: kept,
            by_key,
        }
    }

    pub fn get(&self, key: &StationKey) -> Option<&Station> {
        self.by_key.get(key).map(|&i| &self.stations[i])
    }

    /// Look up a station by free-text name, matched on its key.
    pub fn find_by_name(&self, name: &str) -> Option<&Station> {
        self.get(&StationKey::from_name(name))
    }

    /// Canonical display name for a key.
    pub fn display_name(&self, key: &StationKey) -> Option<&str> {
        self.get(key).map(Station::name)
    }

    /// Stations within `radius_km` of a point, closest first.
    pub fn nearby(&self, point: &Coordinates, radius_km: f64) -> Vec<Candidate> {
        within_radius(point, &self.stations, radius_km)
    }

    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }
}

/// Thread-safe station directory.
///
/// Readers share an `Arc` snapshot; rebuilds are serialised so concurrent
/// callers never geocode the same list twice.
pub struct StationDirectory<G> {
    index: RwLock<Option<Arc<StationIndex>>>,
    rebuild: Mutex<()>,
    cache: StationCache,
    geocoder: G,
    config: DirectoryConfig,
}

impl<G: Geocoder + Sync> StationDirectory<G> {
    pub fn new(geocoder: G, cache: StationCache, config: DirectoryConfig) -> Self {
        Self {
            index: RwLock::new(None),
            rebuild: Mutex::new(()),
            cache,
            geocoder,
            config,
        }
    }

    /// The current snapshot, if one has been built.
    pub async fn snapshot(&self) -> Option<Arc<StationIndex>> {
        self.index.read().await.clone()
    }

    /// Return the station set, building it if necessary.
    ///
    /// Order of preference: the in-memory copy, the persisted cache, a
    /// full rebuild from the route list. A rebuild only fails when the
    /// route list cannot be fetched; individual geocoding failures just
    /// drop that station.
    pub async fn build_or_load<R>(&self, routes: &R) -> Result<Arc<StationIndex>, StationError>
    where
        R: RouteSource + Sync,
    {
        if let Some(index) = self.snapshot().await {
            return Ok(index);
        }

        let _guard = self.rebuild.lock().await;

        // Another caller may have finished a rebuild while we waited
        if let Some(index) = self.snapshot().await {
            return Ok(index);
        }

        let index = match self.cache.load() {
            Some(stations) => {
                debug!(stations = stations.len(), "Loaded stations from cache");
                Arc::new(StationIndex::new(stations))
            }
            None => {
                let routes = routes.fetch_routes().await?;
                let names = unique_stop_names(routes.iter().flat_map(|r| r.stop_names()));
                let stations = self.geocode_all(names).await;

                if let Err(e) = self.cache.save(&stations) {
                    warn!(error = %e, "Failed to persist station cache");
                }
                Arc::new(StationIndex::new(stations))
            }
        };

        *self.index.write().await = Some(Arc::clone(&index));
        Ok(index)
    }

    /// Geocode a single name.
    ///
    /// Failures and timeouts are logged and reported as `None`.
    pub async fn geocode(&self, name: &str) -> Option<Station> {
        match self.lookup(name).await {
            Ok(found) => found,
            Err(e) => {
                warn!(name, error = %e, "Geocoding failed");
                None
            }
        }
    }

    /// Drop the persisted and in-memory station sets.
    pub async fn invalidate(&self) -> Result<(), StationError> {
        let _guard = self.rebuild.lock().await;
        *self.index.write().await = None;
        self.cache.clear()?;
        info!("Station directory invalidated");
        Ok(())
    }

    async fn lookup(&self, name: &str) -> Result<Option<Station>, StationError> {
        let found = tokio::time::timeout(self.config.geocode_timeout, self.geocoder.geocode(name))
            .await
            .map_err(|_| StationError::Timeout {
                query: name.to_string(),
            })??;
        Ok(found.map(|coordinates| Station::new(name, coordinates)))
    }

    /// Geocode every name with bounded concurrency, keeping input order.
    async fn geocode_all(&self, names: Vec<String>) -> Vec<Station> {
        let requested = names.len();
        let results: Vec<_> = futures::stream::iter(names)
            .map(|name| async move {
                let result = self.lookup(&name).await;
                (name, result)
            })
            .buffered(self.config.max_concurrent_geocodes.max(1))
            .collect()
            .await;

        let mut stations = Vec::with_capacity(results.len());
        let mut failed = 0usize;
        let mut unmatched = 0usize;

        for (name, result) in results {
            match result {
                Ok(Some(station)) => stations.push(station),
                Ok(None) => {
                    debug!(name = %name, "No geocoder match");
                    unmatched += 1;
                }
                Err(e) => {
                    warn!(name = %name, error = %e, "Geocoding failed");
                    failed += 1;
                }
            }
        }

        info!(
            requested,
            resolved = stations.len(),
            unmatched,
            failed,
            "Built station directory"
        );
        stations
    }
}

/// Distinct stop names in first-seen order, deduplicated by key.
fn unique_stop_names<'a>(names: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    names
        .filter(|name| {
            let key = StationKey::from_name(name);
            !key.is_empty() && seen.insert(key)
        })
        .map(str::to_string)
        .collect()
}
