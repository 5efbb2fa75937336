//! Location API routes
//!
//! - `GET /v1/locations/:ip` - Look up a location by IP address

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};

use super::super::AppState;
use crate::api::response::{ApiError, ApiResponse};

/// Creates the locations router with all routes configured
pub fn locations_routes() -> Router<AppState> {
    Router::new().route("/:ip", get(get_location))
}

/// Look up a location by IP address
///
/// # Response
///
/// - `200 OK` - Location found, joined with its city and country
/// - `400 Bad Request` - Malformed IP address
/// - `404 Not Found` - No location recorded for this IP
#[tracing::instrument(skip(state), fields(ip = %ip))]
async fn get_location(
    State(state): State<AppState>,
    Path(ip): Path<String>,
) -> Result<Response, ApiError> {
    let response = super::queries::get_by_ip(state.store.as_ref(), &ip).await?;

    Ok((StatusCode::OK, Json(ApiResponse::success(response))).into_response())
}
