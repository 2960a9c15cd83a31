//! Rider-facing leg types.
//!
//! A `Leg` is one homogeneous stretch of a trip: all walking, or all on
//! one bus route.

use std::fmt;

use super::RouteCode;

/// One end of a walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Place {
    /// The rider's raw starting point.
    Origin,
    /// The rider's raw end point.
    Destination,
    /// A known station, by display name.
    Station(String),
}

impl Place {
    pub fn label(&self) -> &str {
        match self {
            Place::Origin => "origin",
            Place::Destination => "destination",
            Place::Station(name) => name,
        }
    }
}

impl fmt::Display for Place {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A walk between two places.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkLeg {
    pub from: Place,
    pub to: Place,
    pub meters: u32,
    pub minutes: u32,
}

/// One hop of a bus leg, between consecutive stops.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusSegment {
    pub from: String,
    pub to: String,
    /// Ride time of this hop (no transfer penalty).
    pub minutes: u32,
}

/// A ride on a single route.
///
/// `minutes` includes any transfer penalty paid to board this route, so
/// it can exceed the sum of the segment ride times.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusLeg {
    pub route_code: RouteCode,
    pub route_name: String,
    pub from: String,
    pub to: String,
    pub minutes: u32,
    pub stop_count: usize,
    pub segments: Vec<BusSegment>,
}

impl BusLeg {
    /// Ride time without the transfer penalty.
    pub fn ride_minutes(&self) -> u32 {
        self.segments
            .iter()
            .map(|s| s.minutes)
            .fold(0u32, u32::saturating_add)
    }

    /// Transfer penalty folded into this leg.
    pub fn transfer_minutes(&self) -> u32 {
        self.minutes.saturating_sub(self.ride_minutes())
    }
}

/// A leg of a trip: walking or riding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Leg {
    Walk(WalkLeg),
    Bus(BusLeg),
}

impl Leg {
    pub fn minutes(&self) -> u32 {
        match self {
            Leg::Walk(walk) => walk.minutes,
            Leg::Bus(bus) => bus.minutes,
        }
    }

    pub fn is_bus(&self) -> bool {
        matches!(self, Leg::Bus(_))
    }

    pub fn is_walk(&self) -> bool {
        matches!(self, Leg::Walk(_))
    }

    pub fn as_bus(&self) -> Option<&BusLeg> {
        match self {
            Leg::Bus(bus) => Some(bus),
            Leg::Walk(_) => None,
        }
    }

    pub fn as_walk(&self) -> Option<&WalkLeg> {
        match self {
            Leg::Walk(walk) => Some(walk),
            Leg::Bus(_) => None,
        }
    }
}
