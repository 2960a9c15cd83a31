//! Data transfer objects for web requests and responses.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::domain::{BusLeg, Coordinates, Leg, Route, Trip, WalkLeg};
use crate::planner::{Candidate, DirectMatch};
use crate::service::{SearchOutcome, Waypoint};

/// Default radius for nearby-station lookups (km).
pub const DEFAULT_NEARBY_RADIUS_KM: f64 = 5.0;

/// Largest radius accepted for nearby-station lookups (km).
pub const MAX_NEARBY_RADIUS_KM: f64 = 50.0;

/// Request to search between two stop names.
#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub from: String,
    pub to: String,
}

/// One end of a trip: a name or a position.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum WaypointRequest {
    Name { name: String },
    Position { lat: f64, lon: f64 },
}

impl WaypointRequest {
    /// Validate into a waypoint.
    pub fn into_waypoint(self) -> Result<Waypoint, String> {
        match self {
            WaypointRequest::Name { name } => {
                let name = name.trim();
                if name.is_empty() {
                    return Err("place name must not be empty".to_string());
                }
                Ok(Waypoint::Name(name.to_string()))
            }
            WaypointRequest::Position { lat, lon } => Coordinates::try_new(lat, lon)
                .map(Waypoint::Position)
                .map_err(|e| e.to_string()),
        }
    }
}

/// Request to plan a trip.
#[derive(Debug, Deserialize)]
pub struct PlanRequest {
    pub origin: WaypointRequest,
    pub destination: WaypointRequest,
}

/// Request for stations near a point.
#[derive(Debug, Deserialize)]
pub struct NearbyRequest {
    pub lat: f64,
    pub lon: f64,
    pub radius_km: Option<f64>,
}

/// Request for routes serving a stop.
#[derive(Debug, Deserialize)]
pub struct StationRoutesRequest {
    pub name: String,
}

/// Result of a search or plan.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SearchResponse {
    Direct { matches: Vec<DirectMatchResult> },
    Planned { trip: TripResult },
    NotFound,
}

/// A single route serving both stops.
#[derive(Debug, Serialize)]
pub struct DirectMatchResult {
    pub route_code: String,
    pub route_name: String,
    /// "outbound" or "return"
    pub direction: &'static str,
    pub boarding_stop: String,
    pub alighting_stop: String,
    pub stop_count: usize,
    pub path_preview: Vec<String>,
    pub duration_minutes: u32,
    /// Estimated next departure (HH:MM)
    pub next_departure: String,
    /// Service has ended for today; `next_departure` is tomorrow's first bus
    pub departs_tomorrow: bool,
}

/// A planned trip.
#[derive(Debug, Serialize)]
pub struct TripResult {
    pub total_minutes: u32,
    pub transfer_count: usize,
    pub bus_stop_count: usize,
    pub walk_meters: u32,
    pub legs: Vec<LegResult>,
}

/// A leg of a trip.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LegResult {
    Walk(WalkResult),
    Bus(BusResult),
}

/// A walking leg.
///
/// Endpoints are "origin", "destination" or a station name.
#[derive(Debug, Serialize)]
pub struct WalkResult {
    pub from: String,
    pub to: String,
    pub meters: u32,
    pub minutes: u32,
}

/// A bus leg.
#[derive(Debug, Serialize)]
pub struct BusResult {
    pub route_code: String,
    pub route_name: String,
    pub from: String,
    pub to: String,
    pub minutes: u32,
    pub stop_count: usize,
    pub segments: Vec<SegmentResult>,
}

/// One hop of a bus leg.
#[derive(Debug, Serialize)]
pub struct SegmentResult {
    pub from: String,
    pub to: String,
    pub minutes: u32,
}

/// A station near a point.
#[derive(Debug, Serialize)]
pub struct StationResult {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub distance_meters: u32,
}

#[derive(Debug, Serialize)]
pub struct NearbyResponse {
    pub stations: Vec<StationResult>,
}

/// A route serving a stop.
#[derive(Debug, Serialize)]
pub struct RouteResult {
    pub code: String,
    pub name: String,
    pub outbound_stops: Vec<String>,
    pub return_stops: Vec<String>,
    pub trip_duration_minutes: u32,
    pub first_departure: Option<String>,
    pub last_departure: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StationRoutesResponse {
    pub routes: Vec<RouteResult>,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Format a time of day as HH:MM.
pub fn format_time(time: &NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

impl SearchResponse {
    pub fn from_outcome(outcome: &SearchOutcome) -> Self {
        match outcome {
            SearchOutcome::Direct(matches) => SearchResponse::Direct {
                matches: matches.iter().map(DirectMatchResult::from_match).collect(),
            },
            SearchOutcome::Planned(trip) => SearchResponse::Planned {
                trip: TripResult::from_trip(trip),
            },
            SearchOutcome::NotFound => SearchResponse::NotFound,
        }
    }

    pub fn from_trip(trip: Option<&Trip>) -> Self {
        match trip {
            Some(trip) => SearchResponse::Planned {
                trip: TripResult::from_trip(trip),
            },
            None => SearchResponse::NotFound,
        }
    }
}

impl DirectMatchResult {
    pub fn from_match(m: &DirectMatch) -> Self {
        Self {
            route_code: m.route_code.as_str().to_string(),
            route_name: m.route_name.clone(),
            direction: m.direction.as_str(),
            boarding_stop: m.boarding_stop.clone(),
            alighting_stop: m.alighting_stop.clone(),
            stop_count: m.stop_count,
            path_preview: m.path_preview.clone(),
            duration_minutes: m.duration_minutes,
            next_departure: format_time(&m.next_departure.time),
            departs_tomorrow: m.next_departure.is_tomorrow,
        }
    }
}

impl TripResult {
    pub fn from_trip(trip: &Trip) -> Self {
        let legs = trip
            .legs()
            .iter()
            .map(|leg| match leg {
                Leg::Walk(walk) => LegResult::Walk(WalkResult::from_walk(walk)),
                Leg::Bus(bus) => LegResult::Bus(BusResult::from_bus(bus)),
            })
            .collect();

        Self {
            total_minutes: trip.total_minutes(),
            transfer_count: trip.transfer_count(),
            bus_stop_count: trip.bus_stop_count(),
            walk_meters: trip.walk_meters(),
            legs,
        }
    }
}

impl WalkResult {
    pub fn from_walk(walk: &WalkLeg) -> Self {
        Self {
            from: walk.from.label().to_string(),
            to: walk.to.label().to_string(),
            meters: walk.meters,
            minutes: walk.minutes,
        }
    }
}

impl BusResult {
    pub fn from_bus(bus: &BusLeg) -> Self {
        Self {
            route_code: bus.route_code.as_str().to_string(),
            route_name: bus.route_name.clone(),
            from: bus.from.clone(),
            to: bus.to.clone(),
            minutes: bus.minutes,
            stop_count: bus.stop_count,
            segments: bus
                .segments
                .iter()
                .map(|s| SegmentResult {
                    from: s.from.clone(),
                    to: s.to.clone(),
                    minutes: s.minutes,
                })
                .collect(),
        }
    }
}

impl StationResult {
    pub fn from_candidate(candidate: &Candidate) -> Self {
        let coords = candidate.station.coordinates();
        Self {
            name: candidate.station.name().to_string(),
            lat: coords.lat,
            lon: coords.lon,
            distance_meters: candidate.distance_meters,
        }
    }
}

impl RouteResult {
    pub fn from_route(route: &Route) -> Self {
        Self {
            code: route.code.as_str().to_string(),
            name: route.name.clone(),
            outbound_stops: route.outbound_stops.clone(),
            return_stops: route.return_stops.clone(),
            trip_duration_minutes: route.trip_duration_minutes,
            first_departure: route.operating_hours.map(|h| format_time(&h.first_departure)),
            last_departure: route.operating_hours.map(|h| format_time(&h.last_departure)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        BusSegment, Direction, NextDeparture, OperatingHours, Place, RouteCode,
    };

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn sample_trip() -> Trip {
        Trip::new(vec![
            Leg::Walk(WalkLeg {
                from: Place::Origin,
                to: Place::Station("Bến Thành".into()),
                meters: 240,
                minutes: 3,
            }),
            Leg::Bus(BusLeg {
                route_code: RouteCode::parse("19").unwrap(),
                route_name: "Bến Thành - Suối Tiên".into(),
                from: "Bến Thành".into(),
                to: "Suối Tiên".into(),
                minutes: 40,
                stop_count: 1,
                segments: vec![BusSegment {
                    from: "Bến Thành".into(),
                    to: "Suối Tiên".into(),
                    minutes: 40,
                }],
            }),
            Leg::Walk(WalkLeg {
                from: Place::Station("Suối Tiên".into()),
                to: Place::Destination,
                meters: 80,
                minutes: 1,
            }),
        ])
    }

    #[test]
    fn planned_response_shape() {
        let response = SearchResponse::from_trip(Some(&sample_trip()));
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["type"], "planned");
        assert_eq!(json["trip"]["total_minutes"], 44);
        assert_eq!(json["trip"]["transfer_count"], 0);
        assert_eq!(json["trip"]["walk_meters"], 320);
        assert_eq!(json["trip"]["legs"][0]["type"], "walk");
        assert_eq!(json["trip"]["legs"][0]["from"], "origin");
        assert_eq!(json["trip"]["legs"][1]["type"], "bus");
        assert_eq!(json["trip"]["legs"][1]["route_code"], "19");
        assert_eq!(json["trip"]["legs"][2]["to"], "destination");
    }

    #[test]
    fn not_found_response_shape() {
        let json = serde_json::to_value(SearchResponse::from_trip(None)).unwrap();
        assert_eq!(json, serde_json::json!({"type": "not_found"}));
    }

    #[test]
    fn direct_match_formats_departure() {
        let m = DirectMatch {
            route_code: RouteCode::parse("01").unwrap(),
            route_name: "Tuyến 01".into(),
            direction: Direction::Return,
            boarding_stop: "A".into(),
            alighting_stop: "B".into(),
            stop_count: 1,
            path_preview: vec!["A".into(), "B".into()],
            duration_minutes: 30,
            next_departure: NextDeparture {
                time: t(5, 0),
                is_tomorrow: true,
            },
        };

        let json = serde_json::to_value(SearchResponse::from_outcome(&SearchOutcome::Direct(vec![m])))
            .unwrap();
        assert_eq!(json["type"], "direct");
        assert_eq!(json["matches"][0]["direction"], "return");
        assert_eq!(json["matches"][0]["next_departure"], "05:00");
        assert_eq!(json["matches"][0]["departs_tomorrow"], true);
    }

    #[test]
    fn waypoint_requests_validate() {
        let name: WaypointRequest = serde_json::from_str(r#"{"name": " Bến Thành "}"#).unwrap();
        assert_eq!(name.into_waypoint().unwrap(), Waypoint::Name("Bến Thành".into()));

        let pos: WaypointRequest = serde_json::from_str(r#"{"lat": 10.77, "lon": 106.7}"#).unwrap();
        assert_eq!(
            pos.into_waypoint().unwrap(),
            Waypoint::Position(Coordinates::new(10.77, 106.7))
        );

        let blank: WaypointRequest = serde_json::from_str(r#"{"name": "  "}"#).unwrap();
        assert!(blank.into_waypoint().is_err());

        let bad: WaypointRequest = serde_json::from_str(r#"{"lat": 91.0, "lon": 0.0}"#).unwrap();
        assert!(bad.into_waypoint().is_err());
    }

    #[test]
    fn route_result_includes_hours() {
        let route = Route::new(
            RouteCode::parse("19").unwrap(),
            "Bến Thành - Suối Tiên",
            vec!["Bến Thành".into(), "Suối Tiên".into()],
            vec![],
            45,
        )
        .with_operating_hours(OperatingHours::new(t(5, 0), t(20, 30)));

        let result = RouteResult::from_route(&route);
        assert_eq!(result.code, "19");
        assert_eq!(result.first_departure.as_deref(), Some("05:00"));
        assert_eq!(result.last_departure.as_deref(), Some("20:30"));
    }

    #[test]
    fn format_time_test() {
        assert_eq!(format_time(&t(14, 30)), "14:30");
        assert_eq!(format_time(&t(7, 5)), "07:05");
    }
}
