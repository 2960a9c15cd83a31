//! Web layer for the bus trip planner.
//!
//! Provides JSON endpoints for searching routes, planning trips and
//! looking up stations.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::{AppService, AppState};
