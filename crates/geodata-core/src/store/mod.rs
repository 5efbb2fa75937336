//! Persistence layer for geodata entities
//!
//! [`GeoStore`] is the single seam between the business logic and the
//! database. The import pipeline and the HTTP API are both written
//! against it; [`PgStore`] backs production, [`MemoryStore`] backs tests.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{City, Country, Location, NewCity, NewCountry, NewLocation};
use crate::validation::{validate_country_code, validate_ip, validate_name};

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Errors surfaced by store operations.
///
/// `NotFound`, `Validation` and `Duplicate` drive control flow in the
/// import pipeline and the API error mapping; everything else is carried
/// as `Database`.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("entity not found")]
    NotFound,

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("entity already exists")]
    Duplicate,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Create/query access to the three geodata entity kinds.
///
/// Implementations validate inputs before persisting and map duplicate
/// keys to [`StoreError::Duplicate`] so callers can treat pre-existing
/// reference entities as a recoverable condition.
#[async_trait]
pub trait GeoStore: Send + Sync {
    /// Add a country. Fails with `Duplicate` when the code is taken.
    async fn create_country(&self, country: NewCountry) -> StoreResult<Country>;

    /// Get a country by its identifier.
    async fn country_by_id(&self, id: Uuid) -> StoreResult<Country>;

    /// Get a country by its code.
    async fn country_by_code(&self, code: &str) -> StoreResult<Country>;

    /// All countries, unordered.
    async fn countries(&self) -> StoreResult<Vec<Country>>;

    /// Add a city. Fails with `Duplicate` when the (country, name) pair
    /// is taken.
    async fn create_city(&self, city: NewCity) -> StoreResult<City>;

    /// Get a city by its identifier.
    async fn city_by_id(&self, id: Uuid) -> StoreResult<City>;

    /// All cities linked to the given country. Fails with `NotFound`
    /// when the country has none.
    async fn cities_by_country(&self, country_id: Uuid) -> StoreResult<Vec<City>>;

    /// Add a location.
    async fn create_location(&self, location: NewLocation) -> StoreResult<Location>;

    /// Get the location recorded for an IP address.
    async fn location_by_ip(&self, ip: &str) -> StoreResult<Location>;
}

fn validate_new_country(country: &NewCountry) -> StoreResult<()> {
    validate_country_code(&country.code)
        .map_err(|err| StoreError::Validation(err.to_string()))?;
    validate_name(&country.name).map_err(|err| StoreError::Validation(err.to_string()))?;
    Ok(())
}

fn validate_new_city(city: &NewCity) -> StoreResult<()> {
    validate_name(&city.name).map_err(|err| StoreError::Validation(err.to_string()))?;
    Ok(())
}

fn validate_new_location(location: &NewLocation) -> StoreResult<()> {
    validate_ip(&location.ip).map_err(|err| StoreError::Validation(err.to_string()))?;
    Ok(())
}

fn validate_lookup_ip(ip: &str) -> StoreResult<()> {
    validate_ip(ip).map_err(|err| StoreError::Validation(err.to_string()))
}
