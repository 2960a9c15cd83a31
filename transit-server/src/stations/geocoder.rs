//! Place-lookup (geocoding) HTTP client.
//!
//! Resolves a free-text place name to coordinates using a GeoJSON search
//! endpoint (`/search?text=...&limit=1`). Only the first feature is used.

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use tokio::sync::Semaphore;
use tracing::debug;

use crate::domain::Coordinates;

use super::Geocoder;
use super::error::StationError;

/// Default maximum concurrent lookups.
const DEFAULT_MAX_CONCURRENT: usize = 8;

/// Default result language.
const DEFAULT_LANGUAGE: &str = "vi";

/// GeoJSON search response. Only the fields we read.
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    /// `[lon, lat]`, GeoJSON order.
    coordinates: Vec<f64>,
}

/// Configuration for the geocoder client.
#[derive(Debug, Clone)]
pub struct GeocoderConfig {
    /// API key sent as the `key` query parameter
    pub api_key: String,
    /// Base URL of the search API (without trailing slash)
    pub base_url: String,
    /// Language of results
    pub language: String,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl GeocoderConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: 10,
        }
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Geocoder backed by a GeoJSON search API.
///
/// Uses a semaphore to limit concurrent requests and avoid rate limiting.
#[derive(Debug, Clone)]
pub struct GeocoderClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    language: String,
    semaphore: Arc<Semaphore>,
}

impl GeocoderClient {
    pub fn new(config: GeocoderConfig) -> Result<Self, StationError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
            api_key: config.api_key,
            language: config.language,
            semaphore: Arc::new(Semaphore::new(config.max_concurrent.max(1))),
        })
    }

    /// Look up a place name.
    ///
    /// Returns `Ok(None)` when the service has no match.
    pub async fn search(&self, query: &str) -> Result<Option<Coordinates>, StationError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| StationError::Api {
                status: 0,
                message: "Semaphore closed".to_string(),
            })?;

        let url = format!("{}/search", self.base_url);
        let response = self
            .http
            .get(&url)
            .query(&[
                ("text", query),
                ("limit", "1"),
                ("lang", self.language.as_str()),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StationError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;
        let parsed: SearchResponse = serde_json::from_str(&body).map_err(|e| StationError::Json {
            message: e.to_string(),
        })?;

        Ok(first_position(parsed, query))
    }
}

/// Extract the first feature's position, if it is a valid point.
fn first_position(response: SearchResponse, query: &str) -> Option<Coordinates> {
    let feature = response.features.into_iter().next()?;
    match feature.geometry.coordinates.as_slice() {
        [lon, lat, ..] => match Coordinates::try_new(*lat, *lon) {
            Ok(coords) => Some(coords),
            Err(e) => {
                debug!(query, error = %e, "Geocoder returned unusable position");
                None
            }
        },
        _ => None,
    }
}

impl Geocoder for GeocoderClient {
    async fn geocode(&self, query: &str) -> Result<Option<Coordinates>, StationError> {
        self.search(query).await
    }
}
