//! Domain error types.
//!
//! These errors represent validation failures at the ingestion boundary,
//! where loosely typed upstream payloads become domain records. They are
//! distinct from API/IO errors.

/// Domain-level errors for validation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DomainError {
    /// Route record has no usable code
    #[error("route code must not be empty")]
    EmptyRouteCode,

    /// Time string could not be parsed
    #[error("invalid time of day: {0}")]
    InvalidTime(String),

    /// Coordinates outside the valid WGS84 range
    #[error("invalid coordinates: ({lat}, {lon})")]
    InvalidCoordinates { lat: f64, lon: f64 },
}
