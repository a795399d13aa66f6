//! Request pipeline stages that run before routing
//!
//! Both are installed with `axum::middleware::from_fn_with_state` and read
//! their switches from the host config in `AppState`.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use super::error::ApiError;
use super::server::AppState;
use crate::config::ServerConfig;

/// Header set by the TLS-terminating proxy
pub const FORWARDED_PROTO: &str = "x-forwarded-proto";

/// Redirect plain-HTTP requests to HTTPS with `307`.
pub async fn https_redirect(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Response {
    if !state.config.server.https_redirect {
        return next.run(req).await;
    }

    if let Some(location) = redirect_location(&state.config.server, req.headers(), req.uri()) {
        tracing::debug!(%location, "redirecting to https");
        return (StatusCode::TEMPORARY_REDIRECT, [(header::LOCATION, location)]).into_response();
    }

    next.run(req).await
}

/// `None` when the request is already HTTPS or the host is unknown.
fn redirect_location(config: &ServerConfig, headers: &HeaderMap, uri: &Uri) -> Option<String> {
    let proto = headers.get(FORWARDED_PROTO)?.to_str().ok()?;
    if !proto.trim().eq_ignore_ascii_case("http") {
        return None;
    }

    let Some(host) = headers.get(header::HOST).and_then(|h| h.to_str().ok()) else {
        tracing::warn!("plain HTTP request without Host header; not redirecting");
        return None;
    };
    let host = host.rsplit_once(':').map_or(host, |(name, port)| {
        if port.chars().all(|c| c.is_ascii_digit()) {
            name
        } else {
            host
        }
    });

    let path = uri.path_and_query().map_or("/", |pq| pq.as_str());
    Some(match config.https_port {
        Some(port) if port != 443 => format!("https://{}:{}{}", host, port, path),
        _ => format!("https://{}{}", host, path),
    })
}

/// Require `Authorization: Bearer <key>` on writes when keys are configured.
pub async fn require_api_key(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Response {
    let auth = &state.config.auth;
    if !auth.enabled() || is_safe(req.method()) {
        return next.run(req).await;
    }

    let verdict = bearer_token(req.headers()).map(|key| auth.accepts(key));
    match verdict {
        Some(true) => next.run(req).await,
        Some(false) => {
            tracing::warn!(method = %req.method(), uri = %req.uri(), "rejected unknown API key");
            ApiError::Unauthorized.into_response()
        }
        None => ApiError::Unauthorized.into_response(),
    }
}

fn is_safe(method: &Method) -> bool {
    matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS)
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (k, v) in pairs {
            map.insert(*k, HeaderValue::from_static(v));
        }
        map
    }

    #[test]
    fn redirect_keeps_path_and_query() {
        let config = ServerConfig::default();
        let uri: Uri = "/api/rooms?Page=2".parse().unwrap();
        let location = redirect_location(
            &config,
            &headers(&[(FORWARDED_PROTO, "http"), ("host", "hotel.example:8080")]),
            &uri,
        );
        assert_eq!(location.as_deref(), Some("https://hotel.example/api/rooms?Page=2"));
    }

    #[test]
    fn redirect_uses_configured_port() {
        let config = ServerConfig {
            https_port: Some(8443),
            ..ServerConfig::default()
        };
        let uri: Uri = "/health".parse().unwrap();
        let location = redirect_location(
            &config,
            &headers(&[(FORWARDED_PROTO, "HTTP"), ("host", "hotel.example")]),
            &uri,
        );
        assert_eq!(location.as_deref(), Some("https://hotel.example:8443/health"));
    }

    #[test]
    fn https_and_unknown_requests_pass() {
        let config = ServerConfig::default();
        let uri: Uri = "/".parse().unwrap();
        assert!(redirect_location(&config, &headers(&[(FORWARDED_PROTO, "https")]), &uri).is_none());
        assert!(redirect_location(&config, &headers(&[]), &uri).is_none());
        assert!(redirect_location(&config, &headers(&[(FORWARDED_PROTO, "http")]), &uri).is_none());
    }

    #[test]
    fn bearer_token_parsing() {
        assert_eq!(bearer_token(&headers(&[("authorization", "Bearer k1")])), Some("k1"));
        assert_eq!(bearer_token(&headers(&[("authorization", "bearer  k1 ")])), Some("k1"));
        assert_eq!(bearer_token(&headers(&[("authorization", "Basic abc")])), None);
        assert_eq!(bearer_token(&headers(&[("authorization", "Bearer ")])), None);
        assert_eq!(bearer_token(&headers(&[])), None);
    }

    #[test]
    fn reads_are_safe() {
        assert!(is_safe(&Method::GET));
        assert!(!is_safe(&Method::POST));
        assert!(!is_safe(&Method::DELETE));
    }
}
