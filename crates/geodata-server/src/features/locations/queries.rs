//! Location read operations

use geodata_core::models::{City, Country, Location};
use geodata_core::store::{GeoStore, StoreError};
use serde::Serialize;

use crate::api::response::ApiError;

/// A location joined with its resolved city and country.
#[derive(Debug, Serialize)]
pub struct LocationResponse {
    pub location: Location,
    pub city: City,
    pub country: Country,
}

/// Errors that can occur when looking up a location by IP
#[derive(Debug, thiserror::Error)]
pub enum GetLocationError {
    #[error("location not found")]
    NotFound,

    #[error("{0}")]
    Validation(String),

    #[error("store error: {0}")]
    Store(StoreError),
}

impl From<StoreError> for GetLocationError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => GetLocationError::NotFound,
            StoreError::Validation(msg) => GetLocationError::Validation(msg),
            err => GetLocationError::Store(err),
        }
    }
}

impl From<GetLocationError> for ApiError {
    fn from(err: GetLocationError) -> Self {
        match err {
            GetLocationError::NotFound => ApiError::NotFound("location not found".to_string()),
            GetLocationError::Validation(msg) => ApiError::BadRequest(msg),
            GetLocationError::Store(err) => ApiError::Internal(err.to_string()),
        }
    }
}

/// Look up the location recorded for an IP and join it with its city and
/// country.
pub async fn get_by_ip(
    store: &dyn GeoStore,
    ip: &str,
) -> Result<LocationResponse, GetLocationError> {
    let location = store.location_by_ip(ip).await?;
    let city = store.city_by_id(location.city_id).await?;
    let country = store.country_by_id(city.country_id).await?;

    Ok(LocationResponse {
        location,
        city,
        country,
    })
}
