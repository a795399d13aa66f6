//! HTTP layer
//!
//! Axum server with:
//! - Request tracing and timeouts
//! - HTTPS redirection and API key authorization
//! - Graceful shutdown
//! - JSON error responses
//! - OpenAPI document and Swagger UI (Development only)

pub mod error;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod server;

pub use error::ApiError;
pub use server::{build_router, run_server, AppState};
