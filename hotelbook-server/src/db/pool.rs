//! Connection factory
//!
//! Wraps a sqlx `PgPool`. Every repository call asks the factory for its own
//! connection and hands it back by dropping it, so no connection outlives the
//! operation that acquired it.

use std::time::Duration;

use sqlx::pool::PoolConnection;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres};

use super::repos::DbError;
use crate::config::DatabaseConfig;

/// Produces database connections from the configured connection string.
///
/// Cloning is cheap; clones share the same underlying pool.
#[derive(Debug, Clone)]
pub struct ConnectionFactory {
    pool: PgPool,
}

impl ConnectionFactory {
    /// Build the factory and verify the database is reachable.
    ///
    /// # Errors
    ///
    /// Returns `DbError::Connection` if the connection string is invalid or
    /// the first connection cannot be established.
    pub async fn connect_eager(config: &DatabaseConfig) -> Result<Self, DbError> {
        let pool = pool_options(config)
            .connect(&config.connection_string)
            .await
            .map_err(DbError::Connection)?;
        tracing::info!(max_connections = config.max_connections, "Database pool ready");
        Ok(Self { pool })
    }

    /// Build the factory without opening a connection.
    ///
    /// The connection string is still parsed, so a malformed string fails here.
    pub fn connect_lazy(config: &DatabaseConfig) -> Result<Self, DbError> {
        let pool = pool_options(config)
            .connect_lazy(&config.connection_string)
            .map_err(DbError::Connection)?;
        Ok(Self { pool })
    }

    /// Hand out a connection for one operation.
    ///
    /// # Errors
    ///
    /// Returns `DbError::Connection` when the database is unreachable or the
    /// pool stays exhausted past the acquire timeout.
    pub async fn connect(&self) -> Result<PoolConnection<Postgres>, DbError> {
        self.pool.acquire().await.map_err(DbError::Connection)
    }

    /// Underlying pool, for schema migrations.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Close all connections; used on shutdown.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

fn pool_options(config: &DatabaseConfig) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(url: &str) -> DatabaseConfig {
        DatabaseConfig {
            connection_string: url.to_owned(),
            max_connections: 2,
            acquire_timeout_secs: 1,
        }
    }

    #[tokio::test]
    async fn malformed_connection_string_is_connection_error() {
        let err = ConnectionFactory::connect_lazy(&config("not a url")).unwrap_err();
        assert!(matches!(err, DbError::Connection(_)));
    }

    #[tokio::test]
    async fn unreachable_database_is_connection_error() {
        let factory =
            ConnectionFactory::connect_lazy(&config("postgres://hotelbook@127.0.0.1:1/hotelbook"))
                .unwrap();
        let err = factory.connect().await.unwrap_err();
        assert!(matches!(err, DbError::Connection(_)));
    }

    // Integration tests require a real database
    // Run with: DATABASE_URL=postgres://... cargo test -p hotelbook-server -- --ignored

    #[tokio::test]
    #[ignore = "requires database"]
    async fn connections_are_independent() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let factory = ConnectionFactory::connect_eager(&config(&url))
            .await
            .expect("factory creation failed");

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let factory = factory.clone();
                tokio::spawn(async move {
                    let mut conn = factory.connect().await.expect("acquire failed");
                    let (n,): (i32,) = sqlx::query_as("SELECT $1::int")
                        .bind(i)
                        .fetch_one(&mut *conn)
                        .await
                        .expect("query failed");
                    n
                })
            })
            .collect();

        for (i, handle) in handles.into_iter().enumerate() {
            assert_eq!(handle.await.expect("task panicked"), i as i32);
        }
    }
}
