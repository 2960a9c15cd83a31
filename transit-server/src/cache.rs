//! Caching layer for upstream lookups.
//!
//! The route list changes rarely, and building the graph from it is the
//! most expensive step of a request. Both are cached together with a TTL,
//! so concurrent requests share one fetch and one graph.
//!
//! Free-text place lookups are cached separately by normalised name.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;
use tracing::debug;

use crate::domain::{Coordinates, Route, StationKey};
use crate::planner::RouteNetwork;
use crate::routes::{RouteError, RouteSource};

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for the route list and its graph.
    pub route_ttl: Duration,

    /// TTL for geocoded place names.
    pub geocode_ttl: Duration,

    /// Maximum number of cached place names.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            route_ttl: Duration::from_secs(10 * 60),
            geocode_ttl: Duration::from_secs(24 * 60 * 60),
            max_capacity: 1000,
        }
    }
}

/// Route source with caching.
///
/// Wraps a `RouteSource` and caches the fetched list together with the
/// graph built from it.
pub struct CachedRoutes<R> {
    source: R,
    networks: MokaCache<(), RouteNetwork>,
}

impl<R: RouteSource + Sync> CachedRoutes<R> {
    /// Create a new cached source.
    pub fn new(source: R, config: &CacheConfig) -> Self {
        let networks = MokaCache::builder()
            .time_to_live(config.route_ttl)
            .max_capacity(1)
            .build();

        Self { source, networks }
    }

    /// The current route list and graph, fetching if not cached.
    ///
    /// Concurrent callers on a cold cache share a single fetch. Failures
    /// are not cached.
    pub async fn network(&self) -> Result<RouteNetwork, RouteError> {
        self.networks
            .try_get_with((), async {
                let routes = self.source.fetch_routes().await?;
                debug!(routes = routes.len(), "Fetched route list");
                Ok::<_, RouteError>(RouteNetwork::new(routes))
            })
            .await
            .map_err(RouteError::Shared)
    }

    /// Drop the cached route list.
    pub fn invalidate(&self) {
        self.networks.invalidate_all();
    }
}

impl<R: RouteSource + Sync> RouteSource for CachedRoutes<R> {
    async fn fetch_routes(&self) -> Result<Arc<Vec<Route>>, RouteError> {
        Ok(self.network().await?.routes)
    }
}

/// Cache of free-text place lookups, keyed by normalised name.
///
/// Only successful lookups are stored.
pub struct GeocodeCache {
    places: MokaCache<StationKey, Coordinates>,
}

impl GeocodeCache {
    pub fn new(config: &CacheConfig) -> Self {
        let places = MokaCache::builder()
            .time_to_live(config.geocode_ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { places }
    }

    pub async fn get(&self, name: &str) -> Option<Coordinates> {
        self.places.get(&StationKey::from_name(name)).await
    }

    pub async fn insert(&self, name: &str, coordinates: Coordinates) {
        self.places
            .insert(StationKey::from_name(name), coordinates)
            .await;
    }

    /// Drop every cached place.
    pub fn clear(&self) {
        self.places.invalidate_all();
    }
}
