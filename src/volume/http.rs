//! HTTP API of the reference volume server
//!
//! Stores each value as a file under the data root at the request path,
//! creating parent directories on PUT. Uploads land in a temp file next to
//! the target and are renamed over it, so readers and concurrent writers
//! only ever see a complete value.

use crate::common::tracing_middleware::request_tracing_middleware;
use crate::common::{decode_path, display_key, Error, Result};
use axum::{
    body::{Body, Bytes},
    extract::{Request, State},
    http::{header, Method, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    Router,
};
use std::io::ErrorKind as IoErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use uuid::Uuid;

/// Shared volume state for HTTP handlers.
#[derive(Clone)]
pub struct VolumeState {
    pub root: Arc<PathBuf>,
}

pub fn create_router(state: VolumeState) -> Router {
    Router::new()
        .fallback(handle_blob)
        .layer(middleware::from_fn(request_tracing_middleware))
        .with_state(state)
}

/// Map a derived path `/aa/bb/<rest>` onto `root/aa/bb/<file>`.
///
/// `<rest>` is base64 and may itself contain `/`, so it is kept as a single
/// file name with `%` and `/` escaped. Distinct keys never share a file.
pub fn resolve(root: &Path, path: &str) -> Result<PathBuf> {
    let invalid = || Error::InvalidPath(path.to_string());
    let mut parts = path.strip_prefix('/').ok_or_else(invalid)?.splitn(3, '/');
    let (aa, bb, rest) = match (parts.next(), parts.next(), parts.next()) {
        (Some(aa), Some(bb), Some(rest)) => (aa, bb, rest),
        _ => return Err(invalid()),
    };
    let is_dir_name = |s: &str| !s.is_empty() && s != "." && s != "..";
    if !is_dir_name(aa) || !is_dir_name(bb) || !is_dir_name(rest) {
        return Err(invalid());
    }
    let file = rest.replace('%', "%25").replace('/', "%2F");
    Ok(root.join(aa).join(bb).join(file))
}

fn not_found_or_io(path: &str, e: std::io::Error) -> Error {
    if e.kind() == IoErrorKind::NotFound {
        Error::NotFound(path.to_string())
    } else {
        Error::Io(e)
    }
}

/// Temp file for an upload to `file`. Never a valid blob name: base64 has no `.`.
fn temp_path(file: &Path) -> PathBuf {
    file.with_file_name(format!(".{}.tmp", Uuid::new_v4()))
}

async fn write_blob(file: &Path, body: Bytes) -> Result<()> {
    if let Some(parent) = file.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    let temp = temp_path(file);
    let written = match tokio::fs::write(&temp, body).await {
        Ok(()) => tokio::fs::rename(&temp, file).await,
        Err(e) => Err(e),
    };
    if let Err(e) = written {
        let _ = tokio::fs::remove_file(&temp).await;
        return Err(e.into());
    }
    Ok(())
}

async fn handle_blob(State(state): State<VolumeState>, request: Request) -> Response {
    let path = request.uri().path().to_string();
    let file = match resolve(&state.root, &path) {
        Ok(file) => file,
        Err(e) => return e.to_http_status().into_response(),
    };

    let result: Result<Response> = match request.method().clone() {
        Method::PUT => {
            let body = axum::body::to_bytes(request.into_body(), usize::MAX)
                .await
                .map_err(|e| Error::Io(std::io::Error::other(e)));
            match body {
                Ok(body) => write_blob(&file, body)
                    .await
                    .map(|_| StatusCode::CREATED.into_response()),
                Err(e) => Err(e),
            }
        }
        Method::GET => tokio::fs::read(&file)
            .await
            .map(|data| (StatusCode::OK, data).into_response())
            .map_err(|e| not_found_or_io(&path, e)),
        Method::HEAD => tokio::fs::metadata(&file)
            .await
            .map(|meta| {
                (
                    StatusCode::OK,
                    [(header::CONTENT_LENGTH, meta.len().to_string())],
                    Body::empty(),
                )
                    .into_response()
            })
            .map_err(|e| not_found_or_io(&path, e)),
        Method::DELETE => tokio::fs::remove_file(&file)
            .await
            .map(|_| StatusCode::NO_CONTENT.into_response())
            .map_err(|e| not_found_or_io(&path, e)),
        other => Err(Error::MethodNotAllowed(other.to_string())),
    };

    match result {
        Ok(response) => response,
        Err(e) => {
            let status = e.to_http_status();
            if status.is_server_error() {
                let key = decode_path(&path).map(|k| display_key(&k));
                tracing::error!(key = ?key, error = %e, "Volume request failed");
            }
            status.into_response()
        }
    }
}
