//! Station directory error types.

use crate::routes::RouteError;

/// Errors that can occur while geocoding or caching stations.
#[derive(Debug, thiserror::Error)]
pub enum StationError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Geocoder returned an error status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response JSON
    #[error("JSON parse error: {message}")]
    Json { message: String },

    /// Cache operation failed
    #[error("cache error: {message}")]
    Cache { message: String },

    /// Lookup did not answer in time
    #[error("geocode timed out for {query}")]
    Timeout { query: String },

    /// Route list needed to enumerate stop names was unavailable
    #[error("route data unavailable: {0}")]
    Routes(#[from] RouteError),
}
