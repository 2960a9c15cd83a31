//! Route-data HTTP client.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::domain::Route;

use super::RouteSource;
use super::error::RouteError;
use super::types::{RoutesResponse, convert_routes};

/// Default page size; large enough to fetch the whole network at once.
const DEFAULT_PAGE_SIZE: u32 = 1000;

/// Configuration for the route-data client.
#[derive(Debug, Clone)]
pub struct RouteClientConfig {
    /// Base URL of the route-data API (without trailing slash)
    pub base_url: String,
    /// Number of routes requested per page
    pub page_size: u32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl RouteClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            timeout_secs: 30,
        }
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set page size.
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }
}

/// Client for the upstream route-data API.
#[derive(Debug, Clone)]
pub struct RouteClient {
    http: reqwest::Client,
    base_url: String,
    page_size: u32,
}

impl RouteClient {
    pub fn new(config: RouteClientConfig) -> Result<Self, RouteError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
            page_size: config.page_size,
        })
    }

    /// Fetch every route in one page.
    pub async fn fetch_all(&self) -> Result<Vec<Route>, RouteError> {
        let url = format!("{}/busroutes", self.base_url);

        let response = self
            .http
            .get(&url)
            .query(&[("page", "1".to_string()), ("pageSize", self.page_size.to_string())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RouteError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;
        let parsed: RoutesResponse = serde_json::from_str(&body).map_err(|e| RouteError::Json {
            message: e.to_string(),
        })?;

        let routes = convert_routes(parsed.data);
        debug!(routes = routes.len(), "Fetched routes");
        Ok(routes)
    }
}

impl RouteSource for RouteClient {
    async fn fetch_routes(&self) -> Result<Arc<Vec<Route>>, RouteError> {
        self.fetch_all().await.map(Arc::new)
    }
}
