//! Application state for the web layer.

use std::sync::Arc;

use crate::routes::RouteBackend;
use crate::service::TripService;
use crate::stations::GeocodeBackend;

/// The trip service as configured for the server.
pub type AppService = TripService<RouteBackend, GeocodeBackend>;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<AppService>,
}

impl AppState {
    pub fn new(service: AppService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}
