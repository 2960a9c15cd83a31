//! Route-data error types.

use std::sync::Arc;

/// Errors from fetching route data.
#[derive(Debug, thiserror::Error)]
pub enum RouteError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response JSON
    #[error("JSON parse error: {message}")]
    Json { message: String },

    /// Local route file could not be read
    #[error("route file error: {message}")]
    File { message: String },

    /// A failed fetch shared between concurrent callers of the cache
    #[error(transparent)]
    Shared(Arc<RouteError>),
}
