//! Country API routes
//!
//! - `GET /v1/countries` - List all countries
//! - `GET /v1/countries/:code` - Get a country by code
//! - `GET /v1/countries/:code/cities` - List the cities of a country

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};

use super::super::AppState;
use crate::api::response::{ApiError, ApiResponse};

/// Creates the countries router with all routes configured
pub fn countries_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_countries))
        .route("/:code", get(get_country))
        .route("/:code/cities", get(list_country_cities))
}

/// List all countries
#[tracing::instrument(skip(state))]
async fn list_countries(State(state): State<AppState>) -> Result<Response, ApiError> {
    let countries = super::queries::list(state.store.as_ref()).await?;

    Ok((StatusCode::OK, Json(ApiResponse::success(countries))).into_response())
}

/// Get a single country by code
///
/// # Response
///
/// - `200 OK` - Country found
/// - `404 Not Found` - Unknown country code
#[tracing::instrument(skip(state), fields(code = %code))]
async fn get_country(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Response, ApiError> {
    let country = super::queries::get_by_code(state.store.as_ref(), &code).await?;

    Ok((StatusCode::OK, Json(ApiResponse::success(country))).into_response())
}

/// List the cities linked to a country
///
/// # Response
///
/// - `200 OK` - Cities of the country (possibly empty)
/// - `404 Not Found` - Unknown country code
#[tracing::instrument(skip(state), fields(code = %code))]
async fn list_country_cities(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Response, ApiError> {
    let cities = super::queries::cities_of(state.store.as_ref(), &code).await?;

    Ok((StatusCode::OK, Json(ApiResponse::success(cities))).into_response())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
        Router,
    };
    use geodata_core::models::{NewCity, NewCountry};
    use geodata_core::store::{GeoStore, MemoryStore};
    use tower::ServiceExt;

    use super::*;

    fn test_router(store: Arc<MemoryStore>) -> Router {
        countries_routes().with_state(AppState { store })
    }

    #[tokio::test]
    async fn test_list_countries() {
        let store = Arc::new(MemoryStore::new());
        store
            .create_country(NewCountry {
                code: "SI".to_string(),
                name: "Slovenia".to_string(),
            })
            .await
            .unwrap();
        store
            .create_country(NewCountry {
                code: "CZ".to_string(),
                name: "Czechia".to_string(),
            })
            .await
            .unwrap();

        let app = test_router(store);

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(json["data"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_get_country_not_found() {
        let app = test_router(Arc::new(MemoryStore::new()));

        let response = app
            .oneshot(Request::builder().uri("/XX").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_list_country_cities() {
        let store = Arc::new(MemoryStore::new());
        let country = store
            .create_country(NewCountry {
                code: "SI".to_string(),
                name: "Slovenia".to_string(),
            })
            .await
            .unwrap();
        store
            .create_city(NewCity {
                country_id: country.id,
                name: "Ljubljana".to_string(),
            })
            .await
            .unwrap();

        let app = test_router(store);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/SI/cities")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(json["data"][0]["name"], "Ljubljana");
    }

    #[tokio::test]
    async fn test_list_country_cities_empty() {
        let store = Arc::new(MemoryStore::new());
        store
            .create_country(NewCountry {
                code: "LI".to_string(),
                name: "Liechtenstein".to_string(),
            })
            .await
            .unwrap();

        let app = test_router(store);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/LI/cities")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(json["data"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_list_cities_of_unknown_country() {
        let app = test_router(Arc::new(MemoryStore::new()));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/XX/cities")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
