//! Postgres-backed store
//!
//! Runtime-checked sqlx queries over the `countries`, `cities` and
//! `locations` tables created by the workspace migrations. Row structs
//! are mapped field-by-field into the domain types.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use async_trait::async_trait;

use super::{
    validate_lookup_ip, validate_new_city, validate_new_country, validate_new_location, GeoStore,
    StoreError, StoreResult,
};
use crate::models::{City, Country, Location, NewCity, NewCountry, NewLocation};

/// Postgres SQLSTATE for unique constraint violations.
const UNIQUE_VIOLATION: &str = "23505";

/// Store implementation backed by a Postgres connection pool.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().as_deref() == Some(UNIQUE_VIOLATION),
        _ => false,
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CountryRow {
    id: Uuid,
    code: String,
    name: String,
    date_created: DateTime<Utc>,
    date_updated: DateTime<Utc>,
}

impl From<CountryRow> for Country {
    fn from(row: CountryRow) -> Self {
        Country {
            id: row.id,
            code: row.code,
            name: row.name,
            date_created: row.date_created,
            date_updated: row.date_updated,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CityRow {
    id: Uuid,
    country_id: Uuid,
    name: String,
    date_created: DateTime<Utc>,
    date_updated: DateTime<Utc>,
}

impl From<CityRow> for City {
    fn from(row: CityRow) -> Self {
        City {
            id: row.id,
            country_id: row.country_id,
            name: row.name,
            date_created: row.date_created,
            date_updated: row.date_updated,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct LocationRow {
    id: Uuid,
    city_id: Uuid,
    ip: String,
    latitude: f64,
    longitude: f64,
    mystery_value: i64,
    date_created: DateTime<Utc>,
    date_updated: DateTime<Utc>,
}

impl From<LocationRow> for Location {
    fn from(row: LocationRow) -> Self {
        Location {
            id: row.id,
            city_id: row.city_id,
            ip: row.ip,
            latitude: row.latitude,
            longitude: row.longitude,
            mystery_value: row.mystery_value,
            date_created: row.date_created,
            date_updated: row.date_updated,
        }
    }
}

#[async_trait]
impl GeoStore for PgStore {
    async fn create_country(&self, country: NewCountry) -> StoreResult<Country> {
        validate_new_country(&country)?;

        let now = Utc::now();
        let row = sqlx::query_as::<_, CountryRow>(
            r#"
            INSERT INTO countries (id, code, name, date_created, date_updated)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, code, name, date_created, date_updated
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&country.code)
        .bind(&country.name)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|err| {
            if is_unique_violation(&err) {
                StoreError::Duplicate
            } else {
                StoreError::Database(err)
            }
        })?;

        Ok(row.into())
    }

    async fn country_by_id(&self, id: Uuid) -> StoreResult<Country> {
        let row = sqlx::query_as::<_, CountryRow>(
            r#"
            SELECT id, code, name, date_created, date_updated
            FROM countries
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Country::from).ok_or(StoreError::NotFound)
    }

    async fn country_by_code(&self, code: &str) -> StoreResult<Country> {
        let row = sqlx::query_as::<_, CountryRow>(
            r#"
            SELECT id, code, name, date_created, date_updated
            FROM countries
            WHERE code = $1
            "#,
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Country::from).ok_or(StoreError::NotFound)
    }

    async fn countries(&self) -> StoreResult<Vec<Country>> {
        let rows = sqlx::query_as::<_, CountryRow>(
            r#"
            SELECT id, code, name, date_created, date_updated
            FROM countries
            ORDER BY code
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Country::from).collect())
    }

    async fn create_city(&self, city: NewCity) -> StoreResult<City> {
        validate_new_city(&city)?;

        let now = Utc::now();
        let row = sqlx::query_as::<_, CityRow>(
            r#"
            INSERT INTO cities (id, country_id, name, date_created, date_updated)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, country_id, name, date_created, date_updated
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(city.country_id)
        .bind(&city.name)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|err| {
            if is_unique_violation(&err) {
                StoreError::Duplicate
            } else {
                StoreError::Database(err)
            }
        })?;

        Ok(row.into())
    }

    async fn city_by_id(&self, id: Uuid) -> StoreResult<City> {
        let row = sqlx::query_as::<_, CityRow>(
            r#"
            SELECT id, country_id, name, date_created, date_updated
            FROM cities
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(City::from).ok_or(StoreError::NotFound)
    }

    async fn cities_by_country(&self, country_id: Uuid) -> StoreResult<Vec<City>> {
        let rows = sqlx::query_as::<_, CityRow>(
            r#"
            SELECT id, country_id, name, date_created, date_updated
            FROM cities
            WHERE country_id = $1
            ORDER BY name
            "#,
        )
        .bind(country_id)
        .fetch_all(&self.pool)
        .await?;

        if rows.is_empty() {
            return Err(StoreError::NotFound);
        }

        Ok(rows.into_iter().map(City::from).collect())
    }

    async fn create_location(&self, location: NewLocation) -> StoreResult<Location> {
        validate_new_location(&location)?;

        let now = Utc::now();
        let row = sqlx::query_as::<_, LocationRow>(
            r#"
            INSERT INTO locations
                (id, city_id, ip, latitude, longitude, mystery_value, date_created, date_updated)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, city_id, ip, latitude, longitude, mystery_value,
                      date_created, date_updated
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(location.city_id)
        .bind(&location.ip)
        .bind(location.latitude)
        .bind(location.longitude)
        .bind(location.mystery_value)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn location_by_ip(&self, ip: &str) -> StoreResult<Location> {
        validate_lookup_ip(ip)?;

        let row = sqlx::query_as::<_, LocationRow>(
            r#"
            SELECT id, city_id, ip, latitude, longitude, mystery_value,
                   date_created, date_updated
            FROM locations
            WHERE ip = $1
            LIMIT 1
            "#,
        )
        .bind(ip)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Location::from).ok_or(StoreError::NotFound)
    }
}
