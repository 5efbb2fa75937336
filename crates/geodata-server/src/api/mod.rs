//! API response types and error mapping

pub mod response;
