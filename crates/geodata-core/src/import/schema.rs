//! CSV schema definition for geolocation dumps
//!
//! The expected column set is fixed; a source file whose header deviates
//! from it in name, order or count is rejected before any row is
//! processed.

use std::collections::HashMap;

use csv_async::StringRecord;
use thiserror::Error;

pub const IP_ADDRESS: &str = "ip_address";
pub const COUNTRY_CODE: &str = "country_code";
pub const COUNTRY: &str = "country";
pub const CITY: &str = "city";
pub const LATITUDE: &str = "latitude";
pub const LONGITUDE: &str = "longitude";
pub const MYSTERY_VALUE: &str = "mystery_value";

/// Column names in the order the input file must provide them.
pub const SCHEMA_COLUMNS: [&str; 7] = [
    IP_ADDRESS,
    COUNTRY_CODE,
    COUNTRY,
    CITY,
    LATITUDE,
    LONGITUDE,
    MYSTERY_VALUE,
];

/// A column name that is not part of the schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("field with name {0} not found")]
pub struct UnknownColumn(pub String);

/// Maps schema column names to their positional indices.
///
/// Built once before the worker pool starts and immutable afterwards, so
/// dispatcher and workers can read it without synchronization.
#[derive(Debug, Clone)]
pub struct FieldIndex {
    positions: HashMap<&'static str, usize>,
}

impl FieldIndex {
    pub fn new() -> Self {
        let positions = SCHEMA_COLUMNS
            .iter()
            .enumerate()
            .map(|(idx, name)| (*name, idx))
            .collect();

        Self { positions }
    }

    /// Positional index of a schema column.
    pub fn index_of(&self, column: &str) -> Result<usize, UnknownColumn> {
        self.positions
            .get(column)
            .copied()
            .ok_or_else(|| UnknownColumn(column.to_string()))
    }

    /// Whether a header record matches the schema exactly, by name and
    /// position. Reordered columns are rejected, not remapped.
    pub fn validate_header(&self, record: &StringRecord) -> bool {
        record.len() == SCHEMA_COLUMNS.len()
            && SCHEMA_COLUMNS
                .iter()
                .zip(record.iter())
                .all(|(want, got)| *want == got)
    }
}

impl Default for FieldIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(fields: &[&str]) -> StringRecord {
        StringRecord::from(fields.to_vec())
    }

    #[test]
    fn test_index_of() {
        let index = FieldIndex::new();

        assert_eq!(index.index_of(IP_ADDRESS), Ok(0));
        assert_eq!(index.index_of(COUNTRY_CODE), Ok(1));
        assert_eq!(index.index_of(MYSTERY_VALUE), Ok(6));
        assert_eq!(
            index.index_of("postal_code"),
            Err(UnknownColumn("postal_code".to_string()))
        );
    }

    #[test]
    fn test_validate_header_accepts_exact_match() {
        let index = FieldIndex::new();

        assert!(index.validate_header(&record(&[
            "ip_address",
            "country_code",
            "country",
            "city",
            "latitude",
            "longitude",
            "mystery_value",
        ])));
    }

    #[test]
    fn test_validate_header_rejects_missing_column() {
        let index = FieldIndex::new();

        assert!(!index.validate_header(&record(&[
            "country_code",
            "country",
            "city",
            "latitude",
            "longitude",
            "mystery_value",
        ])));
    }

    #[test]
    fn test_validate_header_rejects_reordered_columns() {
        let index = FieldIndex::new();

        assert!(!index.validate_header(&record(&[
            "country_code",
            "ip_address",
            "country",
            "city",
            "latitude",
            "longitude",
            "mystery_value",
        ])));
    }

    #[test]
    fn test_validate_header_rejects_extra_column() {
        let index = FieldIndex::new();

        assert!(!index.validate_header(&record(&[
            "ip_address",
            "country_code",
            "country",
            "city",
            "latitude",
            "longitude",
            "mystery_value",
            "accuracy",
        ])));
    }
}
