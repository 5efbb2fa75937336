//! Geodata Core Library
//!
//! Domain model and business logic for the geodata platform:
//!
//! - **Models**: countries, cities and located IP records
//! - **Store**: the [`store::GeoStore`] persistence trait with Postgres
//!   and in-memory implementations
//! - **Import**: the partitioned concurrent CSV import pipeline
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use geodata_core::import::Importer;
//! use geodata_core::store::MemoryStore;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let store = Arc::new(MemoryStore::new());
//!     let input = tokio::fs::File::open("./data/dump.csv").await?;
//!     let stats = Importer::new(store).import(input, 8).await?;
//!     tracing::info!(good = stats.good, failed = stats.failed, "import finished");
//!     Ok(())
//! }
//! ```

pub mod import;
pub mod models;
pub mod store;
pub mod validation;

pub use models::{City, Country, Location, NewCity, NewCountry, NewLocation};
pub use store::{GeoStore, StoreError};
