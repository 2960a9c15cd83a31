//! Turning a raw search path into rider-facing legs.

use crate::domain::{
    BusLeg, BusSegment, Coordinates, Leg, Place, StationKey, Trip, WalkLeg,
};
use crate::stations::StationIndex;
use crate::walkable::WalkingModel;

use super::graph::GraphEdge;
use super::search::PathEdge;

/// Collapses a path into walk and bus legs.
///
/// Consecutive rides on the same route merge into one bus leg; a route
/// change starts a new one. Walks to and from the rider's raw endpoints
/// are re-measured from the raw coordinates.
pub struct LegSynthesizer<'a> {
    walking: WalkingModel,
    stations: &'a StationIndex,
}

impl<'a> LegSynthesizer<'a> {
    pub fn new(walking: WalkingModel, stations: &'a StationIndex) -> Self {
        Self { walking, stations }
    }

    pub fn synthesize(
        &self,
        path: &[PathEdge],
        origin: &Coordinates,
        destination: &Coordinates,
    ) -> Trip {
        let mut legs: Vec<Leg> = Vec::new();
        // Last stop of the bus leg being built, if the previous step was a ride
        let mut tail: Option<&StationKey> = None;

        for step in path {
            match step {
                PathEdge::WalkFromOrigin { to, .. } => {
                    tail = None;
                    let walk = self.walking.estimate(origin, &to.coordinates());
                    legs.push(Leg::Walk(WalkLeg {
                        from: Place::Origin,
                        to: Place::Station(to.name().to_string()),
                        meters: walk.meters,
                        minutes: walk.minutes,
                    }));
                }
                PathEdge::WalkToDestination { from, .. } => {
                    tail = None;
                    let walk = self.walking.estimate(&from.coordinates(), destination);
                    legs.push(Leg::Walk(WalkLeg {
                        from: Place::Station(from.name().to_string()),
                        to: Place::Destination,
                        meters: walk.meters,
                        minutes: walk.minutes,
                    }));
                }
                PathEdge::Ride { edge, penalty_mins } => {
                    let cost = edge.minutes.saturating_add(*penalty_mins);
                    let contiguous = tail == Some(&edge.from);
                    tail = Some(&edge.to);

                    if let Some(Leg::Bus(leg)) = legs.last_mut()
                        && contiguous
                        && leg.route_code == edge.route_code
                    {
                        leg.to = self.name(&edge.to, &edge.to_display);
                        leg.minutes = leg.minutes.saturating_add(cost);
                        leg.stop_count += 1;
                        leg.segments.push(self.segment(edge));
                        continue;
                    }
                    legs.push(Leg::Bus(BusLeg {
                        route_code: edge.route_code.clone(),
                        route_name: edge.route_name.clone(),
                        from: self.name(&edge.from, &edge.from_display),
                        to: self.name(&edge.to, &edge.to_display),
                        minutes: cost,
                        stop_count: 1,
                        segments: vec![self.segment(edge)],
                    }));
                }
            }
        }

        Trip::new(legs)
    }

    fn segment(&self, edge: &GraphEdge) -> BusSegment {
        BusSegment {
            from: self.name(&edge.from, &edge.from_display),
            to: self.name(&edge.to, &edge.to_display),
            minutes: edge.minutes,
        }
    }

    /// Directory display name, falling back to the route's spelling.
    fn name(&self, key: &StationKey, fallback: &str) -> String {
        self.stations
            .display_name(key)
            .unwrap_or(fallback)
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{RouteCode, Station};

    fn ride(code: &str, from: &str, to: &str, minutes: u32, penalty_mins: u32) -> PathEdge {
        PathEdge::Ride {
            edge: GraphEdge {
                from: StationKey::from_name(from),
                to: StationKey::from_name(to),
                route_code: RouteCode::parse(code).unwrap(),
                route_name: format!("Route {code}"),
                minutes,
                from_display: from.to_lowercase(),
                to_display: to.to_lowercase(),
            },
            penalty_mins,
        }
    }

    fn station(name: &str, lat: f64) -> Station {
        Station::new(name, Coordinates::new(lat, 106.0))
    }

    #[test]
    fn merges_rides_on_the_same_route() {
        let a = station("Stop A", 10.0);
        let d = station("Stop D", 10.1);
        let index = StationIndex::new(vec![a.clone(), d.clone()]);
        let synth = LegSynthesizer::new(WalkingModel::default(), &index);

        let origin = Coordinates::new(10.0, 106.0);
        let destination = Coordinates::new(10.1, 106.0);
        let path = vec![
            PathEdge::WalkFromOrigin { to: a, meters: 0 },
            ride("01", "Stop A", "Stop B", 10, 0),
            ride("01", "Stop B", "Stop C", 10, 0),
            ride("02", "Stop C", "Stop D", 7, 5),
            PathEdge::WalkToDestination { from: d, meters: 0 },
        ];

        let trip = synth.synthesize(&path, &origin, &destination);
        let legs = trip.legs();
        assert_eq!(legs.len(), 4);

        let first = legs[1].as_bus().unwrap();
        assert_eq!(first.route_code.as_str(), "01");
        assert_eq!(first.from, "Stop A");
        // Not in the directory, so the route's spelling is used
        assert_eq!(first.to, "stop c");
        assert_eq!(first.stop_count, 2);
        assert_eq!(first.minutes, 20);
        assert_eq!(first.segments.len(), 2);

        let second = legs[2].as_bus().unwrap();
        assert_eq!(second.minutes, 12);
        assert_eq!(second.ride_minutes(), 7);
        assert_eq!(second.transfer_minutes(), 5);
        assert_eq!(second.to, "Stop D");

        assert_eq!(trip.transfer_count(), 1);
        assert_eq!(trip.bus_stop_count(), 3);
        assert_eq!(trip.total_minutes(), 32);
    }

    #[test]
    fn walks_are_measured_from_raw_points() {
        let a = station("Stop A", 10.01);
        let index = StationIndex::new(vec![a.clone()]);
        let synth = LegSynthesizer::new(WalkingModel::default(), &index);

        let origin = Coordinates::new(10.0, 106.0);
        // Path carries a stale distance; the leg is re-measured
        let path = vec![
            PathEdge::WalkFromOrigin {
                to: a.clone(),
                meters: 1,
            },
            PathEdge::WalkToDestination { from: a, meters: 1 },
        ];

        let trip = synth.synthesize(&path, &origin, &origin);
        let walk = trip.legs()[0].as_walk().unwrap();
        assert_eq!(walk.from, Place::Origin);
        assert_eq!(walk.to, Place::Station("Stop A".into()));
        assert!((1100..1125).contains(&walk.meters));
        assert_eq!(walk.minutes, 14);

        let back = trip.legs()[1].as_walk().unwrap();
        assert_eq!(back.to, Place::Destination);
        assert!(trip.is_walk_only());
        assert_eq!(trip.transfer_count(), 0);
        assert_eq!(trip.total_minutes(), 28);
    }

    #[test]
    fn same_route_after_a_gap_starts_a_new_leg() {
        let index = StationIndex::default();
        let synth = LegSynthesizer::new(WalkingModel::default(), &index);
        let here = Coordinates::new(10.0, 106.0);

        let path = vec![
            ride("01", "A", "B", 5, 0),
            ride("01", "C", "D", 5, 0),
        ];
        let trip = synth.synthesize(&path, &here, &here);
        assert_eq!(trip.bus_legs().count(), 2);
    }

    #[test]
    fn huge_ride_minutes_saturate() {
        let index = StationIndex::default();
        let synth = LegSynthesizer::new(WalkingModel::default(), &index);
        let here = Coordinates::new(10.0, 106.0);

        let path = vec![
            ride("01", "A", "B", u32::MAX, 0),
            ride("01", "B", "C", u32::MAX, 0),
            ride("02", "C", "D", u32::MAX, 5),
        ];
        let trip = synth.synthesize(&path, &here, &here);

        let first = trip.legs()[0].as_bus().unwrap();
        assert_eq!(first.minutes, u32::MAX);
        assert_eq!(first.ride_minutes(), u32::MAX);
        assert_eq!(trip.total_minutes(), u32::MAX);
    }
}
