//! Walking between places.
//!
//! The rider walks from their origin to a boarding station and from an
//! alighting station to their destination. This module turns straight-line
//! distances into walking times at a configured speed.

use crate::domain::Coordinates;

/// Default walking speed in km/h.
pub const DEFAULT_WALK_SPEED_KMH: f64 = 4.8;

/// Distance and time of a walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalkEstimate {
    pub meters: u32,
    /// Whole minutes, rounded to nearest.
    pub minutes: u32,
}

/// Converts distances into walking times.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WalkingModel {
    speed_kmh: f64,
}

impl WalkingModel {
    pub fn new(speed_kmh: f64) -> Self {
        Self { speed_kmh }
    }

    pub fn speed_kmh(&self) -> f64 {
        self.speed_kmh
    }

    /// Metres covered per minute, never below 1.
    fn meters_per_minute(&self) -> f64 {
        (self.speed_kmh * 1000.0 / 60.0).max(1.0)
    }

    /// Exact (fractional) minutes to walk `meters`.
    ///
    /// Used as the edge weight during search; never negative.
    pub fn minutes_for(&self, meters: u32) -> f64 {
        f64::from(meters) / self.meters_per_minute()
    }

    /// Walk estimate between two positions.
    pub fn estimate(&self, from: &Coordinates, to: &Coordinates) -> WalkEstimate {
        let meters = from.distance_meters(to);
        WalkEstimate {
            meters,
            minutes: self.minutes_for(meters).round() as u32,
        }
    }
}

impl Default for WalkingModel {
    fn default() -> Self {
        Self::new(DEFAULT_WALK_SPEED_KMH)
    }
}
