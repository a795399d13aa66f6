//! hotelbook-server: hotel booking HTTP API
//!
//! Users, room types, rooms and amenities as plain resources, plus a
//! read-only hotel search and the reservation/cancellation workflow.
//! The `hotelbook` binary in `hotelbook-cli` hosts it.

pub mod config;
pub mod db;
pub mod dto;
pub mod error;
pub mod http;
pub mod models;

pub use config::{Environment, HostConfig};
pub use db::ConnectionFactory;
pub use error::{Error, Result};
pub use http::{build_router, run_server, AppState};
