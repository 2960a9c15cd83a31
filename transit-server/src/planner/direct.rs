//! Same-route matches between two named stops.
//!
//! Before running the full planner, check whether a single route already
//! visits both stops in the right order. No graph is needed for this.

use chrono::{NaiveTime, TimeDelta};

use crate::domain::{Direction, NextDeparture, Route, RouteCode, StationKey};

/// A route that serves `from` before `to` in one direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectMatch {
    pub route_code: RouteCode,
    pub route_name: String,
    pub direction: Direction,
    /// Stop names as written on the route.
    pub boarding_stop: String,
    pub alighting_stop: String,
    /// Hops between boarding and alighting.
    pub stop_count: usize,
    /// Stops from boarding to alighting, inclusive.
    pub path_preview: Vec<String>,
    pub duration_minutes: u32,
    pub next_departure: NextDeparture,
}

/// Find every route direction visiting `from` and later `to`.
///
/// Names are compared by [`StationKey`]. Within a direction only the
/// first occurrence of each stop counts. Results are ordered by
/// `stop_count`, ties keeping route order.
pub fn direct_matches(
    routes: &[Route],
    from: &str,
    to: &str,
    now: NaiveTime,
    headway: TimeDelta,
) -> Vec<DirectMatch> {
    let from_key = StationKey::from_name(from);
    let to_key = StationKey::from_name(to);
    if from_key.is_empty() || to_key.is_empty() {
        return Vec::new();
    }

    let mut matches = Vec::new();
    for route in routes {
        for (direction, stops) in route.directions() {
            let Some((board, alight)) = positions(stops, &from_key, &to_key) else {
                continue;
            };
            if board >= alight {
                continue;
            }

            let next_departure = match &route.operating_hours {
                Some(hours) => hours.next_departure(now, headway),
                None => NextDeparture {
                    time: now,
                    is_tomorrow: false,
                },
            };

            matches.push(DirectMatch {
                route_code: route.code.clone(),
                route_name: route.name.clone(),
                direction,
                boarding_stop: stops[board].clone(),
                alighting_stop: stops[alight].clone(),
                stop_count: alight - board,
                path_preview: stops[board..=alight].to_vec(),
                duration_minutes: route.trip_duration_minutes,
                next_departure,
            });
        }
    }

    // Stable sort keeps route order for equal counts
    matches.sort_by_key(|m| m.stop_count);
    matches
}

/// First index of each key in a stop list.
fn positions(stops: &[String], from: &StationKey, to: &StationKey) -> Option<(usize, usize)> {
    let keys: Vec<StationKey> = stops.iter().map(|s| StationKey::from_name(s)).collect();
    let board = keys.iter().position(|k| k == from)?;
    let alight = keys.iter().position(|k| k == to)?;
    Some((board, alight))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{OperatingHours, parse_time_of_day};

    fn t(s: &str) -> NaiveTime {
        parse_time_of_day(s).unwrap()
    }

    fn every_15() -> TimeDelta {
        TimeDelta::minutes(15)
    }

    fn route(code: &str, outbound: &[&str]) -> Route {
        let outbound: Vec<String> = outbound.iter().map(|s| s.to_string()).collect();
        let mut back = outbound.clone();
        back.reverse();
        Route::new(RouteCode::parse(code).unwrap(), format!("Route {code}"), outbound, back, 45)
    }

    #[test]
    fn matches_in_travel_direction_only() {
        let routes = vec![route("01", &["Bến Thành", "Chợ Lớn", "Bến xe Miền Tây"])];

        let found = direct_matches(&routes, "ben thanh", "BẾN XE MIỀN TÂY", t("09:00"), every_15());
        assert_eq!(found.len(), 1);
        let m = &found[0];
        assert_eq!(m.direction, Direction::Outbound);
        assert_eq!(m.boarding_stop, "Bến Thành");
        assert_eq!(m.alighting_stop, "Bến xe Miền Tây");
        assert_eq!(m.stop_count, 2);
        assert_eq!(m.path_preview.len(), 3);
        assert_eq!(m.duration_minutes, 45);

        let back = direct_matches(&routes, "Bến xe Miền Tây", "Bến Thành", t("09:00"), every_15());
        assert_eq!(back.len(), 1);
        assert_eq!(back[0].direction, Direction::Return);
    }

    #[test]
    fn one_way_route_has_no_reverse_match() {
        let r = Route::new(
            RouteCode::parse("05").unwrap(),
            "Loop",
            vec!["A".into(), "B".into(), "C".into()],
            vec![],
            30,
        );
        assert!(direct_matches(&[r], "C", "A", t("09:00"), every_15()).is_empty());
    }

    #[test]
    fn sorted_by_stop_count_stably() {
        let routes = vec![
            route("long", &["A", "X", "Y", "B"]),
            route("short1", &["A", "B"]),
            route("short2", &["Z", "A", "B"]),
        ];

        let found = direct_matches(&routes, "A", "B", t("09:00"), every_15());
        let codes: Vec<_> = found.iter().map(|m| m.route_code.as_str()).collect();
        assert_eq!(codes, vec!["short1", "short2", "long"]);
    }

    #[test]
    fn same_stop_or_blank_is_no_match() {
        let routes = vec![route("01", &["A", "B"])];
        assert!(direct_matches(&routes, "A", "a", t("09:00"), every_15()).is_empty());
        assert!(direct_matches(&routes, "  ", "B", t("09:00"), every_15()).is_empty());
    }

    #[test]
    fn next_departure_uses_operating_hours() {
        let r = route("01", &["A", "B"]).with_operating_hours(OperatingHours::new(t("05:00"), t("22:00")));
        let plain = route("02", &["A", "B"]);

        let found = direct_matches(&[r, plain], "A", "B", t("09:07"), every_15());
        assert_eq!(found[0].next_departure.time, t("09:15"));
        assert!(!found[0].next_departure.is_tomorrow);
        assert_eq!(found[1].next_departure.time, t("09:07"));
    }
}
