//! Known stations and place lookup.
//!
//! Every stop name referenced by a route is geocoded once and kept in a
//! [`StationDirectory`], persisted through a [`KeyValueStore`] until
//! explicitly invalidated.

mod cache;
mod directory;
mod error;
mod geocoder;
mod mock;
mod store;

use std::future::Future;

use crate::domain::Coordinates;

pub use cache::{STATIONS_KEY, StationCache};
pub use directory::{DirectoryConfig, StationDirectory, StationIndex};
pub use error::StationError;
pub use geocoder::{GeocoderClient, GeocoderConfig};
pub use mock::StaticGeocoder;
pub use store::{FileStore, KeyValueStore, MemoryStore};

/// Trait for resolving a place name to a position.
///
/// `Ok(None)` means the lookup succeeded but found nothing.
pub trait Geocoder {
    fn geocode(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Option<Coordinates>, StationError>> + Send;
}

/// The geocoder chosen at start-up.
#[derive(Debug, Clone)]
pub enum GeocodeBackend {
    Remote(GeocoderClient),
    Static(StaticGeocoder),
}

impl Geocoder for GeocodeBackend {
    async fn geocode(&self, query: &str) -> Result<Option<Coordinates>, StationError> {
        match self {
            GeocodeBackend::Remote(client) => client.geocode(query).await,
            GeocodeBackend::Static(geo) => geo.geocode(query).await,
        }
    }
}
