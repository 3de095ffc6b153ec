#![forbid(unsafe_code)]
//! till-core: register model, validation, and store for the till
//! point-of-sale.
//!
//! # Conventions
//!
//! - **Errors**: domain and store failures are typed (`thiserror`) and map
//!   to stable `E####` codes via [`error::ErrorCode`]; ad-hoc failures use
//!   `anyhow::Result`.
//! - **Logging**: use `tracing` macros (`info!`, `warn!`, `error!`,
//!   `debug!`, `trace!`).

pub mod config;
pub mod error;
pub mod lock;
pub mod model;
pub mod receipt;
pub mod register;
pub mod store;
pub mod validate;
