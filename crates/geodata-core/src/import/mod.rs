//! Partitioned concurrent CSV import pipeline
//!
//! Streams geolocation records from a delimited source, fans them out to
//! a fixed pool of workers partitioned by country code, resolves
//! reference entities through per-worker caches, and aggregates run
//! statistics.
//!
//! Rows sharing a country code always land on the same worker (the
//! partition assignment is write-once per key), which is what makes the
//! unsynchronized resolution caches in [`resolver`] safe. The only
//! cross-worker state is the pair of atomic counters.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use csv_async::{AsyncReaderBuilder, StringRecord};
use serde::Serialize;
use thiserror::Error;
use tokio::io::AsyncRead;
use tokio::sync::mpsc;
use tracing::{error, info};

use crate::store::GeoStore;

pub mod schema;

mod resolver;
mod worker;

pub use schema::{FieldIndex, UnknownColumn, SCHEMA_COLUMNS};

/// Capacity of each worker's input queue. A full queue blocks the
/// dispatcher, throttling ingestion to the slowest worker.
const TASK_QUEUE_CAPACITY: usize = 10;

/// Emit a progress event every this many data rows.
const PROGRESS_INTERVAL: u64 = 10_000;

/// Outcome of one import run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportStats {
    /// Data rows seen by the dispatcher (the header is not counted).
    pub total: u64,
    /// Rows persisted successfully.
    pub good: u64,
    /// Rows dropped after a per-row failure.
    pub failed: u64,
    /// Wall-clock time of the whole run.
    pub duration: Duration,
}

/// Fatal import errors. Per-row failures are counted in
/// [`ImportStats::failed`] instead.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("file in wrong format")]
    InvalidFormat,

    #[error("failed to read input: {0}")]
    Read(#[from] csv_async::Error),
}

/// Runs import jobs against a [`GeoStore`].
pub struct Importer<S: ?Sized> {
    store: Arc<S>,
}

impl<S> Importer<S>
where
    S: GeoStore + ?Sized + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Import a CSV stream, fanning records out to `workers_count`
    /// workers (at least one).
    ///
    /// The first non-blank record must match the expected schema exactly
    /// or the run fails with [`ImportError::InvalidFormat`] before any
    /// row is processed. A malformed record aborts the run with a read
    /// error; every other failure is per-row and only counted.
    pub async fn import<R>(
        &self,
        input: R,
        workers_count: usize,
    ) -> Result<ImportStats, ImportError>
    where
        R: AsyncRead + Unpin + Send,
    {
        let workers_count = workers_count.max(1);

        // The index must be complete before any worker can observe it.
        let index = FieldIndex::new();
        let start = Instant::now();

        let good = Arc::new(AtomicU64::new(0));
        let failed = Arc::new(AtomicU64::new(0));

        info!(count = workers_count, "starting import workers");

        let mut senders = Vec::with_capacity(workers_count);
        let mut handles = Vec::with_capacity(workers_count);
        for _ in 0..workers_count {
            let (tx, rx) = mpsc::channel(TASK_QUEUE_CAPACITY);
            senders.push(tx);
            handles.push(tokio::spawn(worker::run(
                rx,
                Arc::clone(&self.store),
                index.clone(),
                Arc::clone(&good),
                Arc::clone(&failed),
            )));
        }

        // country_code is a schema column, so the lookup cannot fail.
        let code_idx = index
            .index_of(schema::COUNTRY_CODE)
            .map_err(|_| ImportError::InvalidFormat)?;

        let mut reader = AsyncReaderBuilder::new()
            .has_headers(false)
            .create_reader(input);

        let mut saw_header = false;
        let mut total: u64 = 0;
        let mut usage = vec![0u64; workers_count];
        let mut assignments: HashMap<String, usize> = HashMap::new();

        let mut record = StringRecord::new();
        loop {
            // A read error is fatal; dropping the senders on return lets
            // the already-spawned workers drain and exit.
            if !reader.read_record(&mut record).await? {
                break;
            }

            if record.is_empty() {
                continue;
            }

            if !saw_header {
                if !index.validate_header(&record) {
                    return Err(ImportError::InvalidFormat);
                }
                saw_header = true;
                continue;
            }

            total += 1;

            let key = record.get(code_idx).unwrap_or_default();
            let worker_idx = match assignments.get(key) {
                Some(&idx) => idx,
                None => {
                    let idx = least_loaded(&usage);
                    usage[idx] += 1;
                    assignments.insert(key.to_string(), idx);
                    idx
                },
            };

            if senders[worker_idx].send(record.clone()).await.is_err() {
                // The worker is gone; its queue contents are lost, but
                // the run keeps its counting contract.
                failed.fetch_add(1, Ordering::Relaxed);
            }

            if total % PROGRESS_INTERVAL == 0 {
                info!(lines = total, "processed");
            }
        }

        drop(senders);
        for handle in handles {
            if let Err(err) = handle.await {
                error!(error = %err, "import worker panicked");
            }
        }

        Ok(ImportStats {
            total,
            good: good.load(Ordering::Relaxed),
            failed: failed.load(Ordering::Relaxed),
            duration: start.elapsed(),
        })
    }
}

/// Index of the least-loaded worker: lowest usage count, first index on
/// ties.
fn least_loaded(usage: &[u64]) -> usize {
    let mut selected = 0;
    for (idx, &load) in usage.iter().enumerate() {
        if load < usage[selected] {
            selected = idx;
        }
    }
    selected
}
