//! Geodata Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared logging setup for the geodata workspace.
//!
//! Every binary initializes the same tracing subscriber through
//! [`logging::init_logging`], configured from the environment or a
//! builder.
//!
//! # Example
//!
//! ```no_run
//! use geodata_common::logging::{init_logging, LogConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = LogConfig::from_env()?;
//!     init_logging(&config)?;
//!     tracing::info!("ready");
//!     Ok(())
//! }
//! ```

pub mod logging;
