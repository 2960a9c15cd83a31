//! Geographic coordinates.

use geo::{Distance, Haversine, Point};
use serde::{Deserialize, Serialize};

use super::DomainError;

/// A WGS84 position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Construct coordinates from untrusted input.
    ///
    /// Rejects non-finite values and values outside the valid
    /// latitude/longitude ranges.
    pub fn try_new(lat: f64, lon: f64) -> Result<Self, DomainError> {
        let valid = lat.is_finite()
            && lon.is_finite()
            && (-90.0..=90.0).contains(&lat)
            && (-180.0..=180.0).contains(&lon);
        if !valid {
            return Err(DomainError::InvalidCoordinates { lat, lon });
        }
        Ok(Self { lat, lon })
    }

    /// Great-circle distance in metres, rounded to the nearest metre.
    pub fn distance_meters(&self, other: &Coordinates) -> u32 {
        let meters = Haversine::distance(self.to_point(), other.to_point());
        meters.round() as u32
    }

    fn to_point(self) -> Point<f64> {
        Point::new(self.lon, self.lat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BEN_THANH: Coordinates = Coordinates::new(10.7725, 106.6980);
    const SUOI_TIEN: Coordinates = Coordinates::new(10.8660, 106.8030);

    #[test]
    fn zero_distance_to_self() {
        assert_eq!(BEN_THANH.distance_meters(&BEN_THANH), 0);
    }

    #[test]
    fn distance_is_symmetric() {
        assert_eq!(
            BEN_THANH.distance_meters(&SUOI_TIEN),
            SUOI_TIEN.distance_meters(&BEN_THANH)
        );
    }

    #[test]
    fn known_distance() {
        // Ben Thanh to Suoi Tien is roughly 15.5 km as the crow flies
        let d = BEN_THANH.distance_meters(&SUOI_TIEN);
        assert!((15_000..16_000).contains(&d), "got {d}");
    }

    #[test]
    fn one_hundredth_degree_latitude() {
        let a = Coordinates::new(10.0, 106.0);
        let b = Coordinates::new(10.01, 106.0);
        approx::assert_abs_diff_eq!(a.distance_meters(&b) as f64, 1112.0, epsilon = 2.0);
    }

    #[test]
    fn try_new_validates_ranges() {
        assert!(Coordinates::try_new(10.0, 106.0).is_ok());
        assert!(Coordinates::try_new(91.0, 0.0).is_err());
        assert!(Coordinates::try_new(0.0, -180.5).is_err());
        assert!(Coordinates::try_new(f64::NAN, 0.0).is_err());
        assert!(Coordinates::try_new(0.0, f64::INFINITY).is_err());
    }
}
