//! Static route source for offline use and tests.
//!
//! Serves a fixed route list, either built in code or loaded from a JSON
//! file in the same format the upstream `/busroutes` endpoint returns.

use std::path::Path;
use std::sync::Arc;

use crate::domain::Route;

use super::RouteSource;
use super::error::RouteError;
use super::types::{RoutesResponse, convert_routes};

/// Route source backed by an in-memory list.
#[derive(Debug, Clone, Default)]
pub struct StaticRoutes {
    routes: Arc<Vec<Route>>,
}

impl StaticRoutes {
    pub fn new(routes: Vec<Route>) -> Self {
        Self {
            routes: Arc::new(routes),
        }
    }

    /// Parse an upstream-format payload (`{"Data": [...]}`).
    pub fn from_json_str(json: &str) -> Result<Self, RouteError> {
        let parsed: RoutesResponse = serde_json::from_str(json).map_err(|e| RouteError::Json {
            message: e.to_string(),
        })?;
        Ok(Self::new(convert_routes(parsed.data)))
    }

    /// Load an upstream-format payload from disk.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, RouteError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| RouteError::File {
            message: format!("failed to read {}: {}", path.display(), e),
        })?;
        Self::from_json_str(&json)
    }
}

impl RouteSource for StaticRoutes {
    async fn fetch_routes(&self) -> Result<Arc<Vec<Route>>, RouteError> {
        Ok(self.routes.clone())
    }
}
