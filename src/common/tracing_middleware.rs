//! Structured logging and request tracing middleware
//!
//! Every request gets a request ID (taken from `X-Request-ID` when the caller
//! sends one), a span carrying method and key, and a completion log line with
//! status and timing.

use axum::{
    body::Body,
    http::{HeaderValue, Request, Response},
    middleware::Next,
};
use std::time::Instant;
use tracing::{info, warn, Instrument};
use uuid::Uuid;

/// Header name for request ID
pub const REQUEST_ID_HEADER: &str = "X-Request-ID";

/// Generate a new unique request ID
pub fn generate_request_id() -> String {
    Uuid::new_v4().to_string()
}

/// Middleware that adds request ID and structured logging to each request
pub async fn request_tracing_middleware(request: Request<Body>, next: Next) -> Response<Body> {
    let start = Instant::now();

    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .unwrap_or_else(generate_request_id);

    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let span = tracing::info_span!(
        "http_request",
        request_id = %request_id,
        method = %method,
        path = %path,
    );

    async move {
        info!("Request started");

        let mut response = next.run(request).await;

        let duration = start.elapsed();
        let status = response.status();

        if let Ok(value) = HeaderValue::from_str(&request_id) {
            response.headers_mut().insert(REQUEST_ID_HEADER, value);
        }

        if status.is_success() || status.is_redirection() {
            info!(
                status = %status.as_u16(),
                duration_ms = %duration.as_millis(),
                "Request completed"
            );
        } else if status.is_client_error() {
            warn!(
                status = %status.as_u16(),
                duration_ms = %duration.as_millis(),
                "Client error"
            );
        } else {
            warn!(
                status = %status.as_u16(),
                duration_ms = %duration.as_millis(),
                "Server error"
            );
        }

        response
    }
    .instrument(span)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_request_id() {
        let id1 = generate_request_id();
        let id2 = generate_request_id();

        assert!(Uuid::parse_str(&id1).is_ok());
        assert!(Uuid::parse_str(&id2).is_ok());
        assert_ne!(id1, id2);
    }
}
