//! Geodata Server Library
//!
//! HTTP read API over the geodata store.
//!
//! # Overview
//!
//! - **API Endpoints**: location lookup by IP plus country/city reads
//! - **Database**: PostgreSQL via the `geodata-core` store
//! - **Configuration**: environment-based configuration management
//! - **Middleware**: CORS and request tracing
//!
//! # Architecture
//!
//! Each feature is a vertical slice under [`features`] with its own
//! queries and routes; handlers are standalone async functions written
//! against the [`geodata_core::store::GeoStore`] trait, so tests can run
//! the full router on the in-memory store.

pub mod api;
pub mod config;
pub mod features;
pub mod middleware;

pub use api::response::{ApiError, ApiResult};
