//! Per-worker reference entity resolution
//!
//! Each worker owns one [`RefCaches`] instance. Because every country
//! code is routed to exactly one worker for the lifetime of a run, these
//! caches are authoritative within the worker and need no locking.

use std::collections::HashMap;

use tracing::debug;
use uuid::Uuid;

use super::worker::RowError;
use crate::models::{NewCity, NewCountry};
use crate::store::{GeoStore, StoreError};

/// Worker-local caches mapping reference keys to stored identifiers.
#[derive(Debug, Default)]
pub(crate) struct RefCaches {
    countries: HashMap<String, Uuid>,
    cities: HashMap<(String, Uuid), Uuid>,
}

impl RefCaches {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Resolve a (code, name) pair to a country identifier, creating the
    /// country when it is not yet known.
    ///
    /// A `Duplicate` from the store means the country pre-exists from an
    /// earlier run; the caches are reloaded from the store and resolution
    /// is retried against them once.
    pub(crate) async fn resolve_country<S>(
        &mut self,
        store: &S,
        code: &str,
        name: &str,
    ) -> Result<Uuid, RowError>
    where
        S: GeoStore + ?Sized,
    {
        if let Some(&id) = self.countries.get(code) {
            return Ok(id);
        }

        let created = store
            .create_country(NewCountry {
                code: code.to_string(),
                name: name.to_string(),
            })
            .await;

        match created {
            Ok(country) => {
                self.countries.insert(code.to_string(), country.id);
                Ok(country.id)
            },
            Err(StoreError::Duplicate) => {
                self.reload(store, code).await?;
                self.countries
                    .get(code)
                    .copied()
                    .ok_or(RowError::UnresolvedCountry)
            },
            Err(err) => Err(RowError::Store(err)),
        }
    }

    /// Resolve a (city name, country id) pair to a city identifier,
    /// creating the city when it is not yet known.
    pub(crate) async fn resolve_city<S>(
        &mut self,
        store: &S,
        name: &str,
        country_id: Uuid,
    ) -> Result<Uuid, RowError>
    where
        S: GeoStore + ?Sized,
    {
        let key = (name.to_string(), country_id);
        if let Some(&id) = self.cities.get(&key) {
            return Ok(id);
        }

        let city = store
            .create_city(NewCity {
                country_id,
                name: name.to_string(),
            })
            .await
            .map_err(RowError::Store)?;

        self.cities.insert(key, city.id);
        Ok(city.id)
    }

    /// Load the country for `code` and every city already linked to it
    /// into the caches. A country with no cities yet loads as an empty
    /// set.
    async fn reload<S>(&mut self, store: &S, code: &str) -> Result<(), RowError>
    where
        S: GeoStore + ?Sized,
    {
        let country = store.country_by_code(code).await.map_err(RowError::Store)?;

        let cities = match store.cities_by_country(country.id).await {
            Ok(cities) => cities,
            Err(StoreError::NotFound) => Vec::new(),
            Err(err) => return Err(RowError::Store(err)),
        };

        debug!(code, cities = cities.len(), "reloaded reference caches");

        self.countries.insert(code.to_string(), country.id);
        for city in cities {
            self.cities.insert((city.name, country.id), city.id);
        }

        Ok(())
    }
}
