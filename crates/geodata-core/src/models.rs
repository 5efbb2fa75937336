//! Domain types for the geodata platform
//!
//! Countries and cities are reference entities shared by many locations;
//! a location is one geolocation data point linked to its city.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A country reference entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Country {
    /// Unique identifier.
    pub id: Uuid,
    /// ISO-style country code, e.g. "SI".
    pub code: String,
    /// Display name of the country.
    pub name: String,
    /// When the country was added.
    pub date_created: DateTime<Utc>,
    /// When the country was last modified.
    pub date_updated: DateTime<Utc>,
}

/// What we require from clients when adding a Country.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCountry {
    pub code: String,
    pub name: String,
}

/// A city reference entity, scoped to one country.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    /// Unique identifier.
    pub id: Uuid,
    /// The country this city belongs to.
    pub country_id: Uuid,
    /// Display name of the city.
    pub name: String,
    /// When the city was added.
    pub date_created: DateTime<Utc>,
    /// When the city was last modified.
    pub date_updated: DateTime<Utc>,
}

/// What we require from clients when adding a City.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCity {
    pub country_id: Uuid,
    pub name: String,
}

/// One geolocation data point: an IP address with its coordinates and
/// opaque business value, linked to a resolved city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Unique identifier.
    pub id: Uuid,
    /// The city this location resolves to.
    pub city_id: Uuid,
    /// IP address in dotted/colon notation.
    pub ip: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Opaque integer carried through from the source data.
    pub mystery_value: i64,
    /// When the location was added.
    pub date_created: DateTime<Utc>,
    /// When the location was last modified.
    pub date_updated: DateTime<Utc>,
}

/// What we require from clients when adding a Location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewLocation {
    pub city_id: Uuid,
    pub ip: String,
    pub latitude: f64,
    pub longitude: f64,
    pub mystery_value: i64,
}
