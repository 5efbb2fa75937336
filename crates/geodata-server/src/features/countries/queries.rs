//! Country read operations

use geodata_core::models::{City, Country};
use geodata_core::store::{GeoStore, StoreError};

/// All known countries.
pub async fn list(store: &dyn GeoStore) -> Result<Vec<Country>, StoreError> {
    store.countries().await
}

/// One country by its code.
pub async fn get_by_code(store: &dyn GeoStore, code: &str) -> Result<Country, StoreError> {
    store.country_by_code(code).await
}

/// The cities of a country, looked up by country code. A country without
/// cities yields an empty list; an unknown code is `NotFound`.
pub async fn cities_of(store: &dyn GeoStore, code: &str) -> Result<Vec<City>, StoreError> {
    let country = store.country_by_code(code).await?;

    match store.cities_by_country(country.id).await {
        Ok(cities) => Ok(cities),
        Err(StoreError::NotFound) => Ok(Vec::new()),
        Err(err) => Err(err),
    }
}
