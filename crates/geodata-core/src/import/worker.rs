//! Import worker
//!
//! A worker drains one partition queue, resolves reference entities
//! through its local caches, and persists one location per record. Row
//! failures are counted and never abort the worker or the run.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use csv_async::StringRecord;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::debug;

use super::resolver::RefCaches;
use super::schema::{self, FieldIndex, UnknownColumn};
use crate::models::NewLocation;
use crate::store::{GeoStore, StoreError};

/// Why a single row was counted as failed.
#[derive(Debug, Error)]
pub(crate) enum RowError {
    #[error(transparent)]
    UnknownColumn(#[from] UnknownColumn),

    #[error("record has no value for column {0}")]
    MissingField(&'static str),

    #[error("invalid numeric value in column {0}")]
    InvalidNumber(&'static str),

    #[error("country not present in store after cache reload")]
    UnresolvedCountry,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Drain `tasks` until the channel closes, incrementing the shared
/// counters per processed record.
pub(crate) async fn run<S>(
    mut tasks: mpsc::Receiver<StringRecord>,
    store: Arc<S>,
    index: FieldIndex,
    good: Arc<AtomicU64>,
    failed: Arc<AtomicU64>,
) where
    S: GeoStore + ?Sized,
{
    let mut caches = RefCaches::new();

    while let Some(record) = tasks.recv().await {
        match process_record(store.as_ref(), &index, &mut caches, &record).await {
            Ok(()) => {
                good.fetch_add(1, Ordering::Relaxed);
            },
            Err(err) => {
                debug!(error = %err, "dropping record");
                failed.fetch_add(1, Ordering::Relaxed);
            },
        }
    }
}

fn field<'r>(
    record: &'r StringRecord,
    index: &FieldIndex,
    column: &'static str,
) -> Result<&'r str, RowError> {
    let idx = index.index_of(column)?;
    record.get(idx).ok_or(RowError::MissingField(column))
}

async fn process_record<S>(
    store: &S,
    index: &FieldIndex,
    caches: &mut RefCaches,
    record: &StringRecord,
) -> Result<(), RowError>
where
    S: GeoStore + ?Sized,
{
    let ip = field(record, index, schema::IP_ADDRESS)?;
    let country_code = field(record, index, schema::COUNTRY_CODE)?;
    let country_name = field(record, index, schema::COUNTRY)?;
    let city_name = field(record, index, schema::CITY)?;
    let latitude_raw = field(record, index, schema::LATITUDE)?;
    let longitude_raw = field(record, index, schema::LONGITUDE)?;
    let mystery_raw = field(record, index, schema::MYSTERY_VALUE)?;

    let country_id = caches
        .resolve_country(store, country_code, country_name)
        .await?;
    let city_id = caches.resolve_city(store, city_name, country_id).await?;

    let mystery_value: i64 = mystery_raw
        .parse()
        .map_err(|_| RowError::InvalidNumber(schema::MYSTERY_VALUE))?;
    let latitude: f64 = latitude_raw
        .parse()
        .map_err(|_| RowError::InvalidNumber(schema::LATITUDE))?;
    let longitude: f64 = longitude_raw
        .parse()
        .map_err(|_| RowError::InvalidNumber(schema::LONGITUDE))?;

    store
        .create_location(NewLocation {
            city_id,
            ip: ip.to_string(),
            latitude,
            longitude,
            mystery_value,
        })
        .await?;

    Ok(())
}
