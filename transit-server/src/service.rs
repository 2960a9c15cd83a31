//! Trip-planning service.
//!
//! Ties the route source, station directory and planner together into
//! the operations callers use: search by stop names, plan between names
//! or positions, and look up stations and routes.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveTime;
use tracing::{debug, info, warn};

use crate::cache::{CacheConfig, CachedRoutes, GeocodeCache};
use crate::domain::{Coordinates, Route, RouteCode, StationKey, Trip};
use crate::planner::{
    Candidate, DirectMatch, PlannerConfig, RouteNetwork, TripPlanner, direct_matches,
};
use crate::routes::RouteSource;
use crate::stations::{
    DirectoryConfig, Geocoder, KeyValueStore, StationCache, StationDirectory, StationIndex,
};

/// Default time allowed for fetching routes and building the station set.
const DEFAULT_PREPARE_TIMEOUT: Duration = Duration::from_secs(60);

/// Error from the trip service.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ServiceError {
    /// Route or station data could not be obtained in time.
    #[error("data unavailable: {0}")]
    Unavailable(String),
}

/// One end of a requested trip.
#[derive(Debug, Clone, PartialEq)]
pub enum Waypoint {
    /// A stop or place name, resolved through the directory or geocoder.
    Name(String),
    Position(Coordinates),
}

/// Result of a search by names.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// At least one route serves both stops in order.
    Direct(Vec<DirectMatch>),
    /// No single route does; this is the planned trip.
    Planned(Trip),
    NotFound,
}

/// Configuration for the trip service.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub planner: PlannerConfig,
    pub cache: CacheConfig,
    pub directory: DirectoryConfig,
    /// Time allowed for fetching routes and building the station set.
    pub prepare_timeout: Duration,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            planner: PlannerConfig::default(),
            cache: CacheConfig::default(),
            directory: DirectoryConfig::default(),
            prepare_timeout: DEFAULT_PREPARE_TIMEOUT,
        }
    }
}

/// Trip-planning service.
pub struct TripService<R, G> {
    routes: Arc<CachedRoutes<R>>,
    directory: Arc<StationDirectory<G>>,
    geocodes: GeocodeCache,
    config: ServiceConfig,
}

impl<R, G> TripService<R, G>
where
    R: RouteSource + Send + Sync + 'static,
    G: Geocoder + Send + Sync + 'static,
{
    pub fn new(routes: R, geocoder: G, store: Arc<dyn KeyValueStore>, config: ServiceConfig) -> Self {
        let directory = StationDirectory::new(
            geocoder,
            StationCache::new(store),
            config.directory.clone(),
        );

        Self {
            routes: Arc::new(CachedRoutes::new(routes, &config.cache)),
            directory: Arc::new(directory),
            geocodes: GeocodeCache::new(&config.cache),
            config,
        }
    }

    /// Search by stop names.
    ///
    /// Routes serving both stops in order are returned directly. Otherwise
    /// both names are resolved to positions and the planner is run.
    pub async fn search(
        &self,
        from: &str,
        to: &str,
        now: NaiveTime,
    ) -> Result<SearchOutcome, ServiceError> {
        let network = self.network().await?;

        let matches = direct_matches(&network.routes, from, to, now, self.config.planner.headway());
        if !matches.is_empty() {
            debug!(from, to, matches = matches.len(), "Direct routes found");
            return Ok(SearchOutcome::Direct(matches));
        }

        debug!(from, to, "No direct route, planning");
        let trip = self
            .plan(Waypoint::Name(from.to_string()), Waypoint::Name(to.to_string()))
            .await?;

        Ok(match trip {
            Some(trip) => SearchOutcome::Planned(trip),
            None => SearchOutcome::NotFound,
        })
    }

    /// Plan a trip between two waypoints.
    ///
    /// `Ok(None)` means no trip exists: an endpoint could not be resolved,
    /// had no nearby station, or is not connected.
    pub async fn plan(
        &self,
        origin: Waypoint,
        destination: Waypoint,
    ) -> Result<Option<Trip>, ServiceError> {
        let (network, stations) = self.prepare().await?;

        let (origin, destination) = tokio::join!(
            self.resolve(&stations, &origin),
            self.resolve(&stations, &destination)
        );
        let (Some(origin), Some(destination)) = (origin, destination) else {
            info!("Could not resolve trip endpoints");
            return Ok(None);
        };

        let planner = TripPlanner::new(&network.graph, &self.config.planner);
        match planner.plan(&stations, &origin, &destination) {
            Ok(trip) => {
                info!(
                    minutes = trip.total_minutes(),
                    transfers = trip.transfer_count(),
                    legs = trip.legs().len(),
                    "Planned trip"
                );
                Ok(Some(trip))
            }
            Err(reason) => {
                info!(%reason, "No trip found");
                Ok(None)
            }
        }
    }

    /// Routes with a stop matching `name` in either direction.
    pub async fn routes_serving(&self, name: &str) -> Result<Vec<Route>, ServiceError> {
        let key = StationKey::from_name(name);
        if key.is_empty() {
            return Ok(Vec::new());
        }

        let network = self.network().await?;
        Ok(network
            .routes
            .iter()
            .filter(|route| route.serves(&key))
            .cloned()
            .collect())
    }

    /// The route with the given public code, ignoring ASCII case.
    pub async fn route_by_code(&self, code: &RouteCode) -> Result<Option<Route>, ServiceError> {
        let network = self.network().await?;
        Ok(network
            .routes
            .iter()
            .find(|route| route.code.as_str().eq_ignore_ascii_case(code.as_str()))
            .cloned())
    }

    /// Known stations within `radius_km` of a point, closest first.
    pub async fn nearby_stations(
        &self,
        point: &Coordinates,
        radius_km: f64,
    ) -> Result<Vec<Candidate>, ServiceError> {
        let (_, stations) = self.prepare().await?;
        Ok(stations.nearby(point, radius_km))
    }

    /// Load routes and the station set ahead of the first request.
    ///
    /// Returns the number of known stations.
    pub async fn warm_up(&self) -> Result<usize, ServiceError> {
        let (network, stations) = self.prepare().await?;
        info!(
            routes = network.routes.len(),
            stations = stations.len(),
            "Route data ready"
        );
        Ok(stations.len())
    }

    /// Discard the station set and cached place lookups.
    ///
    /// The next request rebuilds the station set from scratch.
    pub async fn invalidate_stations(&self) -> Result<(), ServiceError> {
        self.geocodes.clear();
        self.directory.invalidate().await.map_err(|e| {
            warn!(error = %e, "Failed to invalidate station directory");
            ServiceError::Unavailable(e.to_string())
        })
    }

    async fn network(&self) -> Result<RouteNetwork, ServiceError> {
        self.routes.network().await.map_err(|e| {
            warn!(error = %e, "Route data unavailable");
            ServiceError::Unavailable(e.to_string())
        })
    }

    /// Fetch routes and the station set concurrently, within the timeout.
    ///
    /// The station build runs as its own task, so a timed-out request
    /// does not abandon a half-finished rebuild.
    async fn prepare(&self) -> Result<(RouteNetwork, Arc<StationIndex>), ServiceError> {
        let directory = Arc::clone(&self.directory);
        let routes = Arc::clone(&self.routes);
        let build = tokio::spawn(async move { directory.build_or_load(routes.as_ref()).await });

        let work = async { tokio::join!(self.network(), build) };
        let (network, stations) = tokio::time::timeout(self.config.prepare_timeout, work)
            .await
            .map_err(|_| {
                warn!(
                    timeout_secs = self.config.prepare_timeout.as_secs(),
                    "Timed out preparing route data"
                );
                ServiceError::Unavailable("timed out preparing route data".to_string())
            })?;

        let network = network?;
        let stations = stations
            .map_err(|e| ServiceError::Unavailable(format!("station build failed: {e}")))?
            .map_err(|e| {
                warn!(error = %e, "Station directory unavailable");
                ServiceError::Unavailable(e.to_string())
            })?;

        Ok((network, stations))
    }

    /// Resolve a waypoint to a position.
    ///
    /// Names are tried against the station set, then the place cache,
    /// then the geocoder.
    async fn resolve(&self, stations: &StationIndex, waypoint: &Waypoint) -> Option<Coordinates> {
        let name = match waypoint {
            Waypoint::Position(coordinates) => return Some(*coordinates),
            Waypoint::Name(name) => name,
        };

        if let Some(station) = stations.find_by_name(name) {
            return Some(station.coordinates());
        }
        if let Some(coordinates) = self.geocodes.get(name).await {
            return Some(coordinates);
        }

        let place = self.directory.geocode(name).await?;
        self.geocodes.insert(name, place.coordinates()).await;
        Some(place.coordinates())
    }
}
