//! Feature modules implementing the geodata API
//!
//! Each feature is a vertical slice with its own queries and routes:
//!
//! - **locations**: location lookup by IP address
//! - **countries**: country listing and per-country city reads
//!
//! Handlers are standalone async functions written against the
//! [`geodata_core::store::GeoStore`] trait.

pub mod countries;
pub mod locations;

use std::sync::Arc;

use axum::Router;
use geodata_core::store::GeoStore;

/// Shared state for all feature routes
#[derive(Clone)]
pub struct AppState {
    /// Store backing every read endpoint
    pub store: Arc<dyn GeoStore>,
}

/// Creates the API router with all feature routes mounted
///
/// - `/locations` - location lookup by IP
/// - `/countries` - country and city reads
pub fn router(state: AppState) -> Router<()> {
    Router::new()
        .nest(
            "/locations",
            locations::locations_routes().with_state(state.clone()),
        )
        .nest("/countries", countries::countries_routes().with_state(state))
}
