//! Bus route types.

use std::fmt;

use chrono::{NaiveTime, TimeDelta};

use super::{DomainError, StationKey};

/// Separator between stop names in upstream path strings.
pub const PATH_SEPARATOR: &str = " - ";

/// Public code of a bus route (e.g. "19", "D4").
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RouteCode(String);

impl RouteCode {
    /// Parse a route code, trimming whitespace.
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(DomainError::EmptyRouteCode);
        }
        Ok(RouteCode(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for RouteCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RouteCode({})", self.0)
    }
}

impl fmt::Display for RouteCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which of a route's two stop sequences is meant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Start of the line towards its destination.
    Outbound,
    /// Destination back towards the start.
    Return,
}

impl Direction {
    pub const BOTH: [Direction; 2] = [Direction::Outbound, Direction::Return];

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Outbound => "outbound",
            Direction::Return => "return",
        }
    }
}

/// First and last scheduled departure of the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperatingHours {
    pub first_departure: NaiveTime,
    pub last_departure: NaiveTime,
}

/// Estimated next departure of a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NextDeparture {
    pub time: NaiveTime,
    /// Service has finished for today; `time` is tomorrow's first bus.
    pub is_tomorrow: bool,
}

impl OperatingHours {
    pub fn new(first_departure: NaiveTime, last_departure: NaiveTime) -> Self {
        Self {
            first_departure,
            last_departure,
        }
    }

    /// Estimate the next departure at `now`, assuming buses leave every
    /// `headway` from the first departure. Headways under a minute count
    /// as one minute.
    pub fn next_departure(&self, now: NaiveTime, headway: TimeDelta) -> NextDeparture {
        if now < self.first_departure {
            return NextDeparture {
                time: self.first_departure,
                is_tomorrow: false,
            };
        }
        if now > self.last_departure {
            return NextDeparture {
                time: self.first_departure,
                is_tomorrow: true,
            };
        }

        let headway = headway.num_minutes().max(1);
        let elapsed = (now - self.first_departure).num_minutes();
        let wait_slots = (elapsed + headway - 1) / headway;
        let (time, _) = self
            .first_departure
            .overflowing_add_signed(TimeDelta::minutes(wait_slots * headway));

        NextDeparture {
            time,
            is_tomorrow: false,
        }
    }
}

/// Parse an upstream time of day (`HH:MM` or `HH:MM:SS`).
pub fn parse_time_of_day(s: &str) -> Result<NaiveTime, DomainError> {
    let trimmed = s.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M"))
        .map_err(|_| DomainError::InvalidTime(trimmed.to_string()))
}

/// Split an upstream path ("Stop A - Stop B - ...") into stop names.
///
/// Parts are trimmed and empty parts dropped.
pub fn split_path(path: &str) -> Vec<String> {
    path.split(PATH_SEPARATOR)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// A bus route with its two stop sequences.
///
/// # Invariants
///
/// - `code` is non-empty
/// - a direction with fewer than 2 stops is allowed but rides nowhere
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub code: RouteCode,
    pub name: String,
    pub outbound_stops: Vec<String>,
    pub return_stops: Vec<String>,
    pub trip_duration_minutes: u32,
    pub operating_hours: Option<OperatingHours>,
}

impl Route {
    pub fn new(
        code: RouteCode,
        name: impl Into<String>,
        outbound_stops: Vec<String>,
        return_stops: Vec<String>,
        trip_duration_minutes: u32,
    ) -> Self {
        Self {
            code,
            name: name.into(),
            outbound_stops,
            return_stops,
            trip_duration_minutes,
            operating_hours: None,
        }
    }

    pub fn with_operating_hours(mut self, hours: OperatingHours) -> Self {
        self.operating_hours = Some(hours);
        self
    }

    /// Stop names for one direction.
    pub fn stops(&self, direction: Direction) -> &[String] {
        match direction {
            Direction::Outbound => &self.outbound_stops,
            Direction::Return => &self.return_stops,
        }
    }

    /// Both directions, outbound first.
    pub fn directions(&self) -> impl Iterator<Item = (Direction, &[String])> {
        Direction::BOTH.into_iter().map(|d| (d, self.stops(d)))
    }

    /// Every stop name in both directions, in order, with repeats.
    pub fn stop_names(&self) -> impl Iterator<Item = &str> {
        self.outbound_stops
            .iter()
            .chain(self.return_stops.iter())
            .map(String::as_str)
    }

    /// True if any stop in either direction normalises to `key`.
    pub fn serves(&self, key: &StationKey) -> bool {
        self.stop_names().any(|s| &StationKey::from_name(s) == key)
    }
}
