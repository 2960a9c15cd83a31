//! Search configuration for the trip planner.

use chrono::Duration;

use crate::walkable::WalkingModel;

/// Configuration parameters for trip search.
#[derive(Debug, Clone)]
pub struct PlannerConfig {
    /// Walking speed (km/h).
    pub walk_speed_kmh: f64,

    /// Extra minutes charged when changing from one route to another.
    pub transfer_penalty_mins: u32,

    /// Maximum number of candidate stations per endpoint.
    pub k_nearest: usize,

    /// Initial candidate search radius (km).
    pub search_radius_km: f64,

    /// Largest radius the candidate search grows to before falling back
    /// to the globally nearest stations (km).
    pub max_radius_km: f64,

    /// Assumed minutes between departures on a route.
    pub headway_mins: u32,

    /// Whether a trip may consist of walking only.
    pub allow_walk_only: bool,
}

impl PlannerConfig {
    /// Returns the headway as a Duration.
    pub fn headway(&self) -> Duration {
        Duration::minutes(i64::from(self.headway_mins))
    }

    /// Walking model at the configured speed.
    pub fn walking(&self) -> WalkingModel {
        WalkingModel::new(self.walk_speed_kmh)
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            walk_speed_kmh: 4.8,
            transfer_penalty_mins: 5,
            k_nearest: 5,
            search_radius_km: 2.0,
            max_radius_km: 6.0,
            headway_mins: 15,
            allow_walk_only: true,
        }
    }
}
