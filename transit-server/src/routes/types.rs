//! Route-data API response DTOs.
//!
//! These types map directly to the upstream `/busroutes` JSON payload.
//! The upstream is loosely typed: codes arrive as strings or numbers,
//! durations as numbers, numeric strings or nothing at all. Everything is
//! `Option` here and validated once, in [`convert_routes`].

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::domain::{DomainError, OperatingHours, Route, RouteCode, parse_time_of_day, split_path};

/// Trip duration assumed when the upstream omits one.
pub const DEFAULT_TRIP_DURATION_MINUTES: u32 = 60;

/// Longest trip duration accepted from upstream; larger values are clamped.
pub const MAX_TRIP_DURATION_MINUTES: u32 = 24 * 60;

/// Response from `GET /busroutes`.
#[derive(Debug, Clone, Deserialize)]
pub struct RoutesResponse {
    /// Route records, kept untyped so one bad record cannot fail the page.
    #[serde(rename = "Data", default)]
    pub data: Vec<Value>,
}

/// One upstream route record.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RouteDto {
    /// Public route code; string or number.
    #[serde(default)]
    pub route_code: Option<Value>,

    #[serde(default)]
    pub route_name: Option<String>,

    /// Outbound stops, "Stop A - Stop B - ...".
    #[serde(default)]
    pub path_to_destination: Option<String>,

    /// Return stops, "Stop B - Stop A - ...".
    #[serde(default)]
    pub path_to_start: Option<String>,

    /// End-to-end minutes; number or numeric string.
    #[serde(default)]
    pub trip_duration: Option<Value>,

    /// First departure of the day ("05:00" or "05:00:00").
    #[serde(default)]
    pub start_time: Option<String>,

    /// Last departure of the day.
    #[serde(default)]
    pub end_time: Option<String>,
}

impl RouteDto {
    /// Validate and normalise into a domain route.
    pub fn into_route(self) -> Result<Route, DomainError> {
        let code = match &self.route_code {
            Some(Value::String(s)) => RouteCode::parse(s)?,
            Some(Value::Number(n)) => RouteCode::parse(&n.to_string())?,
            _ => return Err(DomainError::EmptyRouteCode),
        };

        let outbound = self.path_to_destination.as_deref().map(split_path);
        let inbound = self.path_to_start.as_deref().map(split_path);

        let route = Route::new(
            code,
            self.route_name.unwrap_or_default().trim(),
            outbound.unwrap_or_default(),
            inbound.unwrap_or_default(),
            trip_duration_minutes(self.trip_duration.as_ref()),
        );

        match operating_hours(self.start_time.as_deref(), self.end_time.as_deref()) {
            Some(Ok(hours)) => Ok(route.with_operating_hours(hours)),
            Some(Err(e)) => {
                debug!(route = %route.code, error = %e, "Ignoring malformed operating hours");
                Ok(route)
            }
            None => Ok(route),
        }
    }
}

/// Interpret the upstream duration, falling back to the default for
/// missing, zero, negative or unparseable values. Durations longer than a
/// day are clamped to [`MAX_TRIP_DURATION_MINUTES`].
fn trip_duration_minutes(value: Option<&Value>) -> u32 {
    let minutes = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match minutes {
        Some(m) if m.is_finite() && m >= 0.5 => {
            m.round().min(f64::from(MAX_TRIP_DURATION_MINUTES)) as u32
        }
        _ => DEFAULT_TRIP_DURATION_MINUTES,
    }
}

fn operating_hours(
    start: Option<&str>,
    end: Option<&str>,
) -> Option<Result<OperatingHours, DomainError>> {
    let (start, end) = (start?, end?);
    if start.trim().is_empty() || end.trim().is_empty() {
        return None;
    }
    Some(
        parse_time_of_day(start)
            .and_then(|s| parse_time_of_day(end).map(|e| OperatingHours::new(s, e))),
    )
}

/// Convert raw route records, dropping (and logging) the malformed ones.
pub fn convert_routes(records: Vec<Value>) -> Vec<Route> {
    let total = records.len();
    let routes: Vec<Route> = records
        .into_iter()
        .enumerate()
        .filter_map(|(idx, value)| {
            let dto: RouteDto = match serde_json::from_value(value) {
                Ok(dto) => dto,
                Err(e) => {
                    warn!(index = idx, error = %e, "Dropping unreadable route record");
                    return None;
                }
            };
            match dto.into_route() {
                Ok(route) => Some(route),
                Err(e) => {
                    warn!(index = idx, error = %e, "Dropping invalid route record");
                    None
                }
            }
        })
        .collect();

    debug!(total, kept = routes.len(), "Converted route records");
    routes
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn converts_full_record() {
        let value = json!({
            "RouteCode": "19",
            "RouteName": "Bến Thành - Suối Tiên",
            "PathToDestination": "Bến Thành - Thảo Cầm Viên - Suối Tiên",
            "PathToStart": "Suối Tiên - Bến Thành",
            "TripDuration": 50,
            "StartTime": "05:00",
            "EndTime": "20:30:00"
        });
        let routes = convert_routes(vec![value]);
        assert_eq!(routes.len(), 1);

        let route = &routes[0];
        assert_eq!(route.code.as_str(), "19");
        assert_eq!(route.name, "Bến Thành - Suối Tiên");
        assert_eq!(route.outbound_stops.len(), 3);
        assert_eq!(route.return_stops, vec!["Suối Tiên", "Bến Thành"]);
        assert_eq!(route.trip_duration_minutes, 50);
        let hours = route.operating_hours.unwrap();
        assert_eq!(hours.first_departure, parse_time_of_day("05:00").unwrap());
        assert_eq!(hours.last_departure, parse_time_of_day("20:30").unwrap());
    }

    #[test]
    fn numeric_code_and_string_duration() {
        let value = json!({
            "RouteCode": 52,
            "PathToDestination": "A - B",
            "TripDuration": " 35 "
        });
        let route = convert_routes(vec![value]).pop().unwrap();
        assert_eq!(route.code.as_str(), "52");
        assert_eq!(route.name, "");
        assert_eq!(route.trip_duration_minutes, 35);
        assert!(route.return_stops.is_empty());
        assert!(route.operating_hours.is_none());
    }

    #[test]
    fn missing_or_zero_duration_defaults() {
        assert_eq!(trip_duration_minutes(None), DEFAULT_TRIP_DURATION_MINUTES);
        assert_eq!(trip_duration_minutes(Some(&json!(0))), DEFAULT_TRIP_DURATION_MINUTES);
        assert_eq!(trip_duration_minutes(Some(&json!(-5))), DEFAULT_TRIP_DURATION_MINUTES);
        assert_eq!(trip_duration_minutes(Some(&json!("n/a"))), DEFAULT_TRIP_DURATION_MINUTES);
        assert_eq!(trip_duration_minutes(Some(&json!(null))), DEFAULT_TRIP_DURATION_MINUTES);
        assert_eq!(trip_duration_minutes(Some(&json!(44.6))), 45);
    }

    #[test]
    fn oversized_duration_is_clamped() {
        let value = json!({
            "RouteCode": "99",
            "PathToDestination": "Bến Thành - Nhà hát Thành phố",
            "TripDuration": 1e12
        });
        let route = convert_routes(vec![value]).pop().unwrap();
        assert_eq!(route.trip_duration_minutes, MAX_TRIP_DURATION_MINUTES);
        assert_eq!(
            trip_duration_minutes(Some(&json!("99999999"))),
            MAX_TRIP_DURATION_MINUTES
        );
    }

    #[test]
    fn malformed_hours_are_ignored_not_fatal() {
        let value = json!({
            "RouteCode": "8",
            "PathToDestination": "A - B",
            "StartTime": "early",
            "EndTime": "22:00"
        });
        let route = convert_routes(vec![value]).pop().unwrap();
        assert!(route.operating_hours.is_none());
    }

    #[test]
    fn drops_records_without_code() {
        let records = vec![
            json!({"RouteName": "No code", "PathToDestination": "A - B"}),
            json!({"RouteCode": "   ", "PathToDestination": "A - B"}),
            json!({"RouteCode": true}),
            json!("not an object"),
            json!({"RouteCode": "1", "PathToDestination": "A - B"}),
        ];
        let routes = convert_routes(records);
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].code.as_str(), "1");
    }

    #[test]
    fn response_without_data_is_empty() {
        let response: RoutesResponse = serde_json::from_str("{}").unwrap();
        assert!(response.data.is_empty());
    }
}
