//! Country and city read feature

pub mod queries;
pub mod routes;

pub use routes::countries_routes;
