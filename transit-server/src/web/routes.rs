//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::Local;
use tracing::{info, warn};

use crate::domain::{Coordinates, RouteCode};
use crate::service::ServiceError;

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/routes/search", get(search_routes))
        .route("/routes/:code", get(route_detail))
        .route("/trip/plan", post(plan_trip))
        .route("/stations/nearby", get(nearby_stations))
        .route("/stations/routes", get(station_routes))
        .route("/stations/invalidate", post(invalidate_stations))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Search between two stop names.
///
/// Returns same-route matches when any exist, otherwise a planned trip.
async fn search_routes(
    State(state): State<AppState>,
    Query(req): Query<SearchRequest>,
) -> Result<Json<SearchResponse>, AppError> {
    let from = req.from.trim();
    let to = req.to.trim();
    if from.is_empty() || to.is_empty() {
        return Err(AppError::BadRequest {
            message: "both from and to are required".to_string(),
        });
    }

    let now = Local::now().time();
    let outcome = state.service.search(from, to, now).await?;
    Ok(Json(SearchResponse::from_outcome(&outcome)))
}

/// One route by its public code.
async fn route_detail(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<RouteResult>, AppError> {
    let code = RouteCode::parse(&code).map_err(|e| AppError::BadRequest {
        message: e.to_string(),
    })?;

    match state.service.route_by_code(&code).await? {
        Some(route) => Ok(Json(RouteResult::from_route(&route))),
        None => Err(AppError::NotFound {
            message: format!("no route {code}"),
        }),
    }
}

/// Plan a trip between names or positions.
async fn plan_trip(
    State(state): State<AppState>,
    Json(req): Json<PlanRequest>,
) -> Result<Json<SearchResponse>, AppError> {
    let origin = req
        .origin
        .into_waypoint()
        .map_err(|message| AppError::BadRequest {
            message: format!("invalid origin: {message}"),
        })?;
    let destination = req
        .destination
        .into_waypoint()
        .map_err(|message| AppError::BadRequest {
            message: format!("invalid destination: {message}"),
        })?;

    let trip = state.service.plan(origin, destination).await?;
    Ok(Json(SearchResponse::from_trip(trip.as_ref())))
}

/// Stations near a point, closest first.
async fn nearby_stations(
    State(state): State<AppState>,
    Query(req): Query<NearbyRequest>,
) -> Result<Json<NearbyResponse>, AppError> {
    let point = Coordinates::try_new(req.lat, req.lon).map_err(|e| AppError::BadRequest {
        message: e.to_string(),
    })?;

    let radius_km = req.radius_km.unwrap_or(DEFAULT_NEARBY_RADIUS_KM);
    if !radius_km.is_finite() || radius_km <= 0.0 || radius_km > MAX_NEARBY_RADIUS_KM {
        return Err(AppError::BadRequest {
            message: format!("radius_km must be in (0, {MAX_NEARBY_RADIUS_KM}]"),
        });
    }

    let candidates = state.service.nearby_stations(&point, radius_km).await?;
    let stations = candidates.iter().map(StationResult::from_candidate).collect();
    Ok(Json(NearbyResponse { stations }))
}

/// Routes serving a stop.
async fn station_routes(
    State(state): State<AppState>,
    Query(req): Query<StationRoutesRequest>,
) -> Result<Json<StationRoutesResponse>, AppError> {
    if req.name.trim().is_empty() {
        return Err(AppError::BadRequest {
            message: "name is required".to_string(),
        });
    }

    let routes = state.service.routes_serving(&req.name).await?;
    let routes = routes.iter().map(RouteResult::from_route).collect();
    Ok(Json(StationRoutesResponse { routes }))
}

/// Discard the station set; the next request rebuilds it.
async fn invalidate_stations(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    state.service.invalidate_stations().await?;
    info!("Station directory invalidated");
    Ok(StatusCode::NO_CONTENT)
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Unavailable { message: String },
}

impl From<ServiceError> for AppError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Unavailable(message) => AppError::Unavailable { message },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => {
                info!(%message, "Rejected request");
                (StatusCode::BAD_REQUEST, message)
            }
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Unavailable { message } => {
                // Upstream detail stays in the log
                warn!(%message, "Upstream data unavailable");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "temporarily unavailable".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
