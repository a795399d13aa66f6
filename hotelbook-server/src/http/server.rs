//! Axum server setup
//!
//! Request pipeline, outermost first:
//! - Tracing (one span per request)
//! - Timeout (408; dropping the handler cancels its query)
//! - HTTPS redirection
//! - API key authorization for writes
//! - Routes, plus Swagger UI in Development

use std::sync::Arc;

use axum::middleware::from_fn_with_state;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use super::{middleware, openapi, routes};
use crate::config::HostConfig;
use crate::db::ConnectionFactory;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db: ConnectionFactory,
    pub config: Arc<HostConfig>,
}

impl AppState {
    pub fn new(db: ConnectionFactory, config: HostConfig) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }
}

/// Build the application router with all routes and the request pipeline.
pub fn build_router(state: AppState) -> Router {
    let state = Arc::new(state);
    let timeout = state.config.server.request_timeout();

    let mut app = Router::new()
        .merge(routes::health::router())
        .merge(routes::users::router())
        .merge(routes::room_types::router())
        .merge(routes::rooms::router())
        .merge(routes::amenities::router())
        .merge(routes::room_amenities::router())
        .merge(routes::hotel_search::router())
        .merge(routes::reservations::router())
        .merge(routes::cancellations::router());

    if state.config.is_development() {
        tracing::info!("Swagger UI enabled at /swagger");
        app = app.merge(openapi::swagger_router());
    }

    app.layer(from_fn_with_state(state.clone(), middleware::require_api_key))
        .layer(from_fn_with_state(state.clone(), middleware::https_redirect))
        .layer(TimeoutLayer::new(timeout))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve until Ctrl+C or SIGTERM, then close the pool.
///
/// # Example
///
/// ```ignore
/// let db = ConnectionFactory::connect_eager(&config.database).await?;
/// run_server(db, config).await?;
/// ```
pub async fn run_server(db: ConnectionFactory, config: HostConfig) -> crate::Result<()> {
    let bind_addr = config.server.bind;
    tracing::info!(
        environment = %config.environment,
        auth = config.auth.enabled(),
        https_redirect = config.server.https_redirect,
        "Host configured"
    );

    let app = build_router(AppState::new(db.clone(), config));

    // Bind listener
    let listener = TcpListener::bind(bind_addr).await?;
    tracing::info!("Server listening on {}", bind_addr);

    // Run with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting shutdown");
        }
    }
}
