//! HTTP API of the index
//!
//! Every path is a key, so there is no route table: a single fallback handler
//! dispatches on the method.
//!
//! | Method   | Success                     | Failure         |
//! |----------|-----------------------------|-----------------|
//! | GET/HEAD | 302 `Location: <volume url>`| 404, 500        |
//! | PUT      | 201                         | 411, 409, 500   |
//! | DELETE   | 204                         | 404, 500        |
//! | other    |                             | 405             |

use crate::common::tracing_middleware::request_tracing_middleware;
use crate::common::{key_from_path, Error};
use crate::coordinator::flow::Coordinator;
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, Method, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    Router,
};
use std::sync::Arc;

/// Shared coordinator state for HTTP handlers.
#[derive(Clone)]
pub struct CoordState {
    pub coordinator: Arc<Coordinator>,
}

/// Creates the HTTP router for the index API.
pub fn create_router(state: CoordState) -> Router {
    Router::new()
        .fallback(handle_key)
        .layer(middleware::from_fn(request_tracing_middleware))
        .with_state(state)
}

fn content_length(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(header::CONTENT_LENGTH)?
        .to_str()
        .ok()?
        .parse()
        .ok()
}

fn error_response(err: Error) -> Response {
    let status = err.to_http_status();
    if status.is_server_error() {
        tracing::error!(kind = %err.kind(), error = %err, "Request failed");
    } else {
        tracing::debug!(kind = %err.kind(), error = %err, "Request rejected");
    }
    status.into_response()
}

async fn handle_key(State(state): State<CoordState>, request: Request) -> Response {
    let key = key_from_path(request.uri().path());
    let coord = &state.coordinator;

    let result = match request.method().clone() {
        Method::GET | Method::HEAD => coord
            .locate(&key)
            .map(|location| (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()),
        Method::PUT => {
            let length = content_length(request.headers());
            let body = reqwest::Body::wrap_stream(request.into_body().into_data_stream());
            coord
                .create(&key, body, length)
                .await
                .map(|_| StatusCode::CREATED.into_response())
        }
        Method::DELETE => coord
            .remove(&key)
            .await
            .map(|_| StatusCode::NO_CONTENT.into_response()),
        other => Err(Error::MethodNotAllowed(other.to_string())),
    };

    result.unwrap_or_else(error_response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinator::index::{IndexStore, MemoryIndex};
    use crate::coordinator::placement::VolumeSet;
    use crate::coordinator::volume_client::VolumeClient;
    use axum::body::Body;
    use std::time::Duration;
    use tower::ServiceExt;

    fn router(index: Arc<MemoryIndex>) -> Router {
        let coordinator = Coordinator::new(
            index,
            VolumeSet::new(vec!["v1".into(), "v2".into()]).unwrap(),
            VolumeClient::new(Duration::from_secs(1)).unwrap(),
        );
        create_router(CoordState {
            coordinator: Arc::new(coordinator),
        })
    }

    fn request(method: Method, uri: &str) -> axum::http::Request<Body> {
        axum::http::Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_get_redirects_to_volume() {
        let index = Arc::new(MemoryIndex::new());
        index.put(b"/abc", "v2").unwrap();

        for method in [Method::GET, Method::HEAD] {
            let response = router(index.clone())
                .oneshot(request(method, "/abc"))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::FOUND);
            assert_eq!(
                response.headers()[header::LOCATION],
                "http://v2/48/2a/L2FiYw=="
            );
            assert!(response.headers().contains_key("X-Request-ID"));
        }
    }

    #[tokio::test]
    async fn test_get_missing_key_is_404() {
        let response = router(Arc::new(MemoryIndex::new()))
            .oneshot(request(Method::GET, "/missing"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_percent_encoded_path_is_decoded_to_key() {
        let index = Arc::new(MemoryIndex::new());
        index.put(&[b'/', 0xff, b' '], "v1").unwrap();

        let response = router(index)
            .oneshot(request(Method::GET, "/%ff%20"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FOUND);
    }

    #[tokio::test]
    async fn test_put_without_length_is_411() {
        let response = router(Arc::new(MemoryIndex::new()))
            .oneshot(request(Method::PUT, "/abc"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::LENGTH_REQUIRED);
    }

    #[tokio::test]
    async fn test_put_zero_length_is_411() {
        let index = Arc::new(MemoryIndex::new());
        index.put(b"/exists", "v1").unwrap();

        for key in ["/abc", "/exists", "/"] {
            let req = axum::http::Request::builder()
                .method(Method::PUT)
                .uri(key)
                .header(header::CONTENT_LENGTH, "0")
                .body(Body::empty())
                .unwrap();
            let response = router(index.clone()).oneshot(req).await.unwrap();
            assert_eq!(response.status(), StatusCode::LENGTH_REQUIRED, "{}", key);
        }
    }

    #[tokio::test]
    async fn test_put_existing_key_is_409() {
        let index = Arc::new(MemoryIndex::new());
        index.put(b"/abc", "v1").unwrap();

        let req = axum::http::Request::builder()
            .method(Method::PUT)
            .uri("/abc")
            .header(header::CONTENT_LENGTH, "5")
            .body(Body::from("hello"))
            .unwrap();
        let response = router(index).oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_delete_missing_key_is_404() {
        let response = router(Arc::new(MemoryIndex::new()))
            .oneshot(request(Method::DELETE, "/missing"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_other_methods_are_405() {
        let index = Arc::new(MemoryIndex::new());
        index.put(b"/abc", "v1").unwrap();

        for method in [Method::POST, Method::PATCH, Method::OPTIONS] {
            for key in ["/abc", "/missing"] {
                let response = router(index.clone())
                    .oneshot(request(method.clone(), key))
                    .await
                    .unwrap();
                assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
            }
        }
    }

    #[tokio::test]
    async fn test_request_id_is_echoed() {
        let req = axum::http::Request::builder()
            .method(Method::GET)
            .uri("/missing")
            .header("X-Request-ID", "req-123")
            .body(Body::empty())
            .unwrap();
        let response = router(Arc::new(MemoryIndex::new()))
            .oneshot(req)
            .await
            .unwrap();
        assert_eq!(response.headers()["X-Request-ID"], "req-123");
    }
}
