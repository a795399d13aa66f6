//! Host-level error type
//!
//! Covers startup and shutdown: loading config, reaching the database,
//! binding the listener. Request-level failures are `http::ApiError`.

use thiserror::Error;

use crate::config::ConfigError;
use crate::db::DbError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Database(#[from] DbError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
