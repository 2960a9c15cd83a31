//! Domain types for the bus trip planner.
//!
//! This module contains the core domain model types that represent
//! validated route and station data. Types enforce their invariants at
//! construction time, so code that receives them can trust their validity.

mod coords;
mod error;
mod leg;
mod route;
mod station;
mod trip;

pub use coords::Coordinates;
pub use error::DomainError;
pub use leg::{BusLeg, BusSegment, Leg, Place, WalkLeg};
pub use route::{
    Direction, NextDeparture, OperatingHours, PATH_SEPARATOR, Route, RouteCode, parse_time_of_day,
    split_path,
};
pub use station::{Station, StationKey};
pub use trip::Trip;
