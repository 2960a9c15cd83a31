//! Route-data sources.
//!
//! Routes come from an upstream HTTP API that returns loosely typed
//! records. Everything is validated into [`Route`] at this boundary; the
//! rest of the crate never sees the raw payload.

mod client;
mod error;
mod mock;
mod types;

use std::future::Future;
use std::sync::Arc;

use crate::domain::Route;

pub use client::{RouteClient, RouteClientConfig};
pub use error::RouteError;
pub use mock::StaticRoutes;
pub use types::{
    DEFAULT_TRIP_DURATION_MINUTES, MAX_TRIP_DURATION_MINUTES, RouteDto, RoutesResponse,
    convert_routes,
};

/// Trait for providing the full route list.
///
/// This abstraction allows the planner to be tested with static data.
pub trait RouteSource {
    fn fetch_routes(&self) -> impl Future<Output = Result<Arc<Vec<Route>>, RouteError>> + Send;
}

/// The route source chosen at start-up.
#[derive(Debug, Clone)]
pub enum RouteBackend {
    Remote(RouteClient),
    Static(StaticRoutes),
}

impl RouteSource for RouteBackend {
    async fn fetch_routes(&self) -> Result<Arc<Vec<Route>>, RouteError> {
        match self {
            RouteBackend::Remote(client) => client.fetch_routes().await,
            RouteBackend::Static(routes) => routes.fetch_routes().await,
        }
    }
}
