//! Static geocoder for offline use and tests.
//!
//! Answers lookups from a fixed name → position table, matched on the
//! normalised station key. The table can be loaded from a JSON object of
//! the form `{"Bến Thành": {"lat": 10.77, "lon": 106.70}, ...}`.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use crate::domain::{Coordinates, StationKey};

use super::Geocoder;
use super::error::StationError;

/// Geocoder backed by an in-memory table.
#[derive(Debug, Clone, Default)]
pub struct StaticGeocoder {
    places: HashMap<StationKey, Coordinates>,
    failing: HashSet<StationKey>,
}

impl StaticGeocoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a known place.
    pub fn with_place(mut self, name: &str, coordinates: Coordinates) -> Self {
        self.places.insert(StationKey::from_name(name), coordinates);
        self
    }

    /// Make lookups of `name` fail with an error, as a flaky upstream would.
    pub fn with_failure(mut self, name: &str) -> Self {
        self.failing.insert(StationKey::from_name(name));
        self
    }

    pub fn from_json_str(json: &str) -> Result<Self, StationError> {
        let table: HashMap<String, Coordinates> =
            serde_json::from_str(json).map_err(|e| StationError::Json {
                message: e.to_string(),
            })?;
        Ok(table
            .into_iter()
            .fold(Self::new(), |geo, (name, coords)| geo.with_place(&name, coords)))
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, StationError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| StationError::Cache {
            message: format!("failed to read {}: {}", path.display(), e),
        })?;
        Self::from_json_str(&json)
    }
}

impl Geocoder for StaticGeocoder {
    async fn geocode(&self, query: &str) -> Result<Option<Coordinates>, StationError> {
        let key = StationKey::from_name(query);
        if self.failing.contains(&key) {
            return Err(StationError::Api {
                status: 503,
                message: format!("lookup failed for {query}"),
            });
        }
        Ok(self.places.get(&key).copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn matches_on_normalised_name() {
        let geo = StaticGeocoder::new().with_place("Bến Thành", Coordinates::new(10.77, 106.70));
        let found = geo.geocode("ben thanh").await.unwrap();
        assert_eq!(found, Some(Coordinates::new(10.77, 106.70)));
        assert_eq!(geo.geocode("Chợ Lớn").await.unwrap(), None);
    }

    #[tokio::test]
    async fn configured_failures_error() {
        let geo = StaticGeocoder::new().with_failure("Chợ Lớn");
        assert!(geo.geocode("Cho Lon").await.is_err());
    }

    #[tokio::test]
    async fn loads_json_table() {
        let geo = StaticGeocoder::from_json_str(
            r#"{"Bến Thành": {"lat": 10.77, "lon": 106.70}, "Suối Tiên": {"lat": 10.87, "lon": 106.80}}"#,
        )
        .unwrap();
        assert_eq!(
            geo.geocode("suoi tien").await.unwrap(),
            Some(Coordinates::new(10.87, 106.80))
        );
    }
}
