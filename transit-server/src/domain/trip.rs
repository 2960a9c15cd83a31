//! Trip type.
//!
//! A `Trip` is the planner's answer: an ordered list of walk and bus legs
//! from the rider's origin to their destination.

use super::{BusLeg, Leg, WalkLeg};

/// A planned trip.
///
/// # Invariants
///
/// - `total_minutes` is the exact sum of the legs' minutes
/// - `transfer_count` is one less than the number of bus legs (or 0)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trip {
    legs: Vec<Leg>,
    total_minutes: u32,
    transfer_count: usize,
}

impl Trip {
    /// Build a trip, deriving the totals from the legs.
    pub fn new(legs: Vec<Leg>) -> Self {
        let total_minutes = legs
            .iter()
            .map(Leg::minutes)
            .fold(0u32, u32::saturating_add);
        let bus_legs = legs.iter().filter(|l| l.is_bus()).count();
        Self {
            legs,
            total_minutes,
            transfer_count: bus_legs.saturating_sub(1),
        }
    }

    pub fn legs(&self) -> &[Leg] {
        &self.legs
    }

    pub fn total_minutes(&self) -> u32 {
        self.total_minutes
    }

    pub fn transfer_count(&self) -> usize {
        self.transfer_count
    }

    pub fn bus_legs(&self) -> impl Iterator<Item = &BusLeg> {
        self.legs.iter().filter_map(Leg::as_bus)
    }

    pub fn walk_legs(&self) -> impl Iterator<Item = &WalkLeg> {
        self.legs.iter().filter_map(Leg::as_walk)
    }

    /// Number of stops ridden across all bus legs.
    pub fn bus_stop_count(&self) -> usize {
        self.bus_legs().map(|b| b.stop_count).sum()
    }

    /// Total walking distance in metres.
    pub fn walk_meters(&self) -> u32 {
        self.walk_legs().map(|w| w.meters).sum()
    }

    /// True when the trip never boards a bus.
    pub fn is_walk_only(&self) -> bool {
        self.bus_legs().next().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BusSegment, Place, RouteCode};

    fn walk(minutes: u32) -> Leg {
        Leg::Walk(WalkLeg {
            from: Place::Origin,
            to: Place::Station("A".into()),
            meters: minutes * 80,
            minutes,
        })
    }

    fn bus(code: &str, minutes: u32, stops: usize) -> Leg {
        Leg::Bus(BusLeg {
            route_code: RouteCode::parse(code).unwrap(),
            route_name: format!("Route {code}"),
            from: "A".into(),
            to: "B".into(),
            minutes,
            stop_count: stops,
            segments: vec![BusSegment {
                from: "A".into(),
                to: "B".into(),
                minutes,
            }],
        })
    }

    #[test]
    fn totals_follow_legs() {
        let trip = Trip::new(vec![walk(4), bus("19", 20, 3), bus("52", 11, 2), walk(3)]);
        assert_eq!(trip.total_minutes(), 38);
        assert_eq!(trip.transfer_count(), 1);
        assert_eq!(trip.bus_stop_count(), 5);
        assert_eq!(trip.walk_meters(), 560);
        assert!(!trip.is_walk_only());
    }

    #[test]
    fn single_bus_has_no_transfers() {
        let trip = Trip::new(vec![walk(2), bus("19", 20, 3), walk(1)]);
        assert_eq!(trip.transfer_count(), 0);
    }

    #[test]
    fn walk_only_trip() {
        let trip = Trip::new(vec![walk(6), walk(2)]);
        assert_eq!(trip.transfer_count(), 0);
        assert!(trip.is_walk_only());
        assert_eq!(trip.total_minutes(), 8);
    }

    #[test]
    fn empty_trip() {
        let trip = Trip::new(vec![]);
        assert_eq!(trip.total_minutes(), 0);
        assert_eq!(trip.transfer_count(), 0);
        assert!(trip.legs().is_empty());
    }
}
