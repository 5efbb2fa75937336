//! In-memory store
//!
//! Mirrors the Postgres implementation's observable semantics, including
//! `Duplicate` on unique keys and `NotFound` for countries without
//! cities. Used by the pipeline and router tests, and by anything that
//! needs a [`GeoStore`] without a database.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::{
    validate_lookup_ip, validate_new_city, validate_new_country, validate_new_location, GeoStore,
    StoreError, StoreResult,
};
use crate::models::{City, Country, Location, NewCity, NewCountry, NewLocation};

#[derive(Default)]
struct Inner {
    countries: Vec<Country>,
    cities: Vec<City>,
    locations: Vec<Location>,
    // How many create_country calls were made per code, duplicates
    // included. Lets tests observe that partitioned workers resolve a
    // given code exactly once.
    country_create_attempts: HashMap<String, u64>,
}

/// Thread-safe in-memory [`GeoStore`] implementation.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All cities across every country.
    pub async fn cities(&self) -> Vec<City> {
        self.inner.lock().await.cities.clone()
    }

    /// All stored locations.
    pub async fn locations(&self) -> Vec<Location> {
        self.inner.lock().await.locations.clone()
    }

    /// Number of `create_country` calls observed for a code.
    pub async fn country_create_attempts(&self, code: &str) -> u64 {
        self.inner
            .lock()
            .await
            .country_create_attempts
            .get(code)
            .copied()
            .unwrap_or(0)
    }
}

#[async_trait]
impl GeoStore for MemoryStore {
    async fn create_country(&self, country: NewCountry) -> StoreResult<Country> {
        let mut inner = self.inner.lock().await;
        *inner
            .country_create_attempts
            .entry(country.code.clone())
            .or_insert(0) += 1;

        validate_new_country(&country)?;

        if inner.countries.iter().any(|c| c.code == country.code) {
            return Err(StoreError::Duplicate);
        }

        let now = Utc::now();
        let created = Country {
            id: Uuid::new_v4(),
            code: country.code,
            name: country.name,
            date_created: now,
            date_updated: now,
        };
        inner.countries.push(created.clone());

        Ok(created)
    }

    async fn country_by_id(&self, id: Uuid) -> StoreResult<Country> {
        self.inner
            .lock()
            .await
            .countries
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn country_by_code(&self, code: &str) -> StoreResult<Country> {
        self.inner
            .lock()
            .await
            .countries
            .iter()
            .find(|c| c.code == code)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn countries(&self) -> StoreResult<Vec<Country>> {
        Ok(self.inner.lock().await.countries.clone())
    }

    async fn create_city(&self, city: NewCity) -> StoreResult<City> {
        validate_new_city(&city)?;

        let mut inner = self.inner.lock().await;
        if inner
            .cities
            .iter()
            .any(|c| c.country_id == city.country_id && c.name == city.name)
        {
            return Err(StoreError::Duplicate);
        }

        let now = Utc::now();
        let created = City {
            id: Uuid::new_v4(),
            country_id: city.country_id,
            name: city.name,
            date_created: now,
            date_updated: now,
        };
        inner.cities.push(created.clone());

        Ok(created)
    }

    async fn city_by_id(&self, id: Uuid) -> StoreResult<City> {
        self.inner
            .lock()
            .await
            .cities
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn cities_by_country(&self, country_id: Uuid) -> StoreResult<Vec<City>> {
        let cities: Vec<City> = self
            .inner
            .lock()
            .await
            .cities
            .iter()
            .filter(|c| c.country_id == country_id)
            .cloned()
            .collect();

        if cities.is_empty() {
            return Err(StoreError::NotFound);
        }

        Ok(cities)
    }

    async fn create_location(&self, location: NewLocation) -> StoreResult<Location> {
        validate_new_location(&location)?;

        let now = Utc::now();
        let created = Location {
            id: Uuid::new_v4(),
            city_id: location.city_id,
            ip: location.ip,
            latitude: location.latitude,
            longitude: location.longitude,
            mystery_value: location.mystery_value,
            date_created: now,
            date_updated: now,
        };
        self.inner.lock().await.locations.push(created.clone());

        Ok(created)
    }

    async fn location_by_ip(&self, ip: &str) -> StoreResult<Location> {
        validate_lookup_ip(ip)?;

        self.inner
            .lock()
            .await
            .locations
            .iter()
            .find(|l| l.ip == ip)
            .cloned()
            .ok_or(StoreError::NotFound)
    }
}
