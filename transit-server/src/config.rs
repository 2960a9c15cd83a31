//! Server configuration from environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use crate::planner::PlannerConfig;

/// Default address to listen on.
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

/// Default directory for the persisted station set.
const DEFAULT_STATION_CACHE_DIR: &str = "cache";

/// Upper bound for the widened candidate search radius.
pub const MAX_SEARCH_RADIUS_KM: f64 = 100.0;

/// Error reading configuration.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("missing configuration: {0}")]
    Missing(&'static str),

    #[error("invalid {name}={value:?}: {message}")]
    Invalid {
        name: &'static str,
        value: String,
        message: String,
    },
}

/// Where route data comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum RouteSourceConfig {
    /// Upstream route API base URL.
    Remote(String),
    /// Local JSON file in the upstream format.
    File(PathBuf),
}

/// Where place lookups go.
#[derive(Debug, Clone, PartialEq)]
pub enum GeocoderSourceConfig {
    Remote { base_url: String, api_key: String },
    /// Local JSON table of name to position.
    File(PathBuf),
}

/// Everything the server needs at start-up.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub routes: RouteSourceConfig,
    pub geocoder: GeocoderSourceConfig,
    pub station_cache_dir: PathBuf,
    pub bind_addr: SocketAddr,
    pub planner: PlannerConfig,
}

impl ServerConfig {
    /// Read configuration from the process environment.
    ///
    /// File sources (`ROUTES_FILE`, `GEOCODER_FILE`) take precedence over
    /// the remote APIs.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let routes = match (var("ROUTES_FILE"), var("ROUTES_API_URL")) {
            (Some(path), _) => RouteSourceConfig::File(PathBuf::from(path)),
            (None, Some(url)) => RouteSourceConfig::Remote(url),
            (None, None) => return Err(ConfigError::Missing("ROUTES_API_URL or ROUTES_FILE")),
        };

        let geocoder = match var("GEOCODER_FILE") {
            Some(path) => GeocoderSourceConfig::File(PathBuf::from(path)),
            None => GeocoderSourceConfig::Remote {
                base_url: var("GEOCODER_API_URL")
                    .ok_or(ConfigError::Missing("GEOCODER_API_URL or GEOCODER_FILE"))?,
                api_key: var("GEOCODER_API_KEY").ok_or(ConfigError::Missing("GEOCODER_API_KEY"))?,
            },
        };

        let station_cache_dir = PathBuf::from(
            var("STATION_CACHE_DIR").unwrap_or_else(|| DEFAULT_STATION_CACHE_DIR.to_string()),
        );

        let bind_addr = parse(
            "BIND_ADDR",
            var("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
        )?;

        let defaults = PlannerConfig::default();
        let planner = PlannerConfig {
            walk_speed_kmh: parse_or("WALK_SPEED_KMH", var("WALK_SPEED_KMH"), defaults.walk_speed_kmh)?,
            transfer_penalty_mins: parse_or(
                "TRANSFER_PENALTY_MIN",
                var("TRANSFER_PENALTY_MIN"),
                defaults.transfer_penalty_mins,
            )?,
            k_nearest: parse_or("K_NEAREST", var("K_NEAREST"), defaults.k_nearest)?,
            search_radius_km: parse_or(
                "SEARCH_RADIUS_KM",
                var("SEARCH_RADIUS_KM"),
                defaults.search_radius_km,
            )?,
            max_radius_km: parse_or("MAX_RADIUS_KM", var("MAX_RADIUS_KM"), defaults.max_radius_km)?,
            ..defaults
        };
        validate_planner(&planner)?;

        Ok(Self {
            routes,
            geocoder,
            station_cache_dir,
            bind_addr,
            planner,
        })
    }
}

fn parse<T>(name: &'static str, value: String) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        name,
        message: e.to_string(),
        value,
    })
}

fn parse_or<T>(name: &'static str, value: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.map_or(Ok(default), |v| parse(name, v))
}

fn validate_planner(config: &PlannerConfig) -> Result<(), ConfigError> {
    let invalid = |name, value: String, message: &str| {
        Err(ConfigError::Invalid {
            name,
            value,
            message: message.to_string(),
        })
    };

    if !(config.walk_speed_kmh.is_finite() && config.walk_speed_kmh > 0.0) {
        return invalid("WALK_SPEED_KMH", config.walk_speed_kmh.to_string(), "must be positive");
    }
    if config.k_nearest == 0 {
        return invalid("K_NEAREST", "0".to_string(), "must be at least 1");
    }
    if !(config.search_radius_km.is_finite() && config.search_radius_km > 0.0) {
        return invalid(
            "SEARCH_RADIUS_KM",
            config.search_radius_km.to_string(),
            "must be positive",
        );
    }
    if !(config.max_radius_km.is_finite() && config.max_radius_km >= config.search_radius_km) {
        return invalid(
            "MAX_RADIUS_KM",
            config.max_radius_km.to_string(),
            "must be at least SEARCH_RADIUS_KM",
        );
    }
    if config.max_radius_km > MAX_SEARCH_RADIUS_KM {
        return invalid(
            "MAX_RADIUS_KM",
            config.max_radius_km.to_string(),
            &format!("must be at most {MAX_SEARCH_RADIUS_KM}"),
        );
    }
    Ok(())
}
