use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use transit_server::config::{GeocoderSourceConfig, RouteSourceConfig, ServerConfig};
use transit_server::routes::{RouteBackend, RouteClient, RouteClientConfig, StaticRoutes};
use transit_server::service::{ServiceConfig, TripService};
use transit_server::stations::{
    FileStore, GeocodeBackend, GeocoderClient, GeocoderConfig, StaticGeocoder,
};
use transit_server::web::{AppState, create_router};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = ServerConfig::from_env().expect("Invalid configuration");

    let routes = match &config.routes {
        RouteSourceConfig::Remote(url) => {
            info!(%url, "Using route API");
            RouteBackend::Remote(
                RouteClient::new(RouteClientConfig::new(url)).expect("Failed to create route client"),
            )
        }
        RouteSourceConfig::File(path) => {
            info!(path = %path.display(), "Using route file");
            RouteBackend::Static(StaticRoutes::from_json_file(path).expect("Failed to load route file"))
        }
    };

    let geocoder = match &config.geocoder {
        GeocoderSourceConfig::Remote { base_url, api_key } => {
            info!(url = %base_url, "Using geocoder API");
            GeocodeBackend::Remote(
                GeocoderClient::new(GeocoderConfig::new(base_url, api_key))
                    .expect("Failed to create geocoder client"),
            )
        }
        GeocoderSourceConfig::File(path) => {
            info!(path = %path.display(), "Using place file");
            GeocodeBackend::Static(
                StaticGeocoder::from_json_file(path).expect("Failed to load place file"),
            )
        }
    };

    let store = Arc::new(FileStore::new(&config.station_cache_dir));
    info!(dir = %config.station_cache_dir.display(), "Station cache directory");

    let service_config = ServiceConfig {
        planner: config.planner.clone(),
        ..ServiceConfig::default()
    };
    let state = AppState::new(TripService::new(routes, geocoder, store, service_config));

    // Not fatal: the first request retries
    let warm = Arc::clone(&state.service);
    tokio::spawn(async move {
        match warm.warm_up().await {
            Ok(stations) => info!(stations, "Loaded station set"),
            Err(e) => warn!(error = %e, "Failed to load route data at start-up"),
        }
    });

    let app = create_router(state);

    let addr = config.bind_addr;
    info!(%addr, "Bus trip planner listening");
    info!("  GET  /health              - Health check");
    info!("  GET  /routes/search       - Search by stop names");
    info!("  POST /trip/plan           - Plan a trip");
    info!("  GET  /stations/nearby     - Stations near a point");
    info!("  GET  /stations/routes     - Routes serving a stop");
    info!("  POST /stations/invalidate - Rebuild the station set");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");
    axum::serve(listener, app).await.expect("Server error");
}
