//! Location lookup feature

pub mod queries;
pub mod routes;

pub use routes::locations_routes;
