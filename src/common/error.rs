//! Error types for mkv

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    // === Request Errors ===
    #[error("Key not found: {0}")]
    NotFound(String),

    #[error("Key already exists: {0}")]
    Conflict(String),

    #[error("Content-Length required")]
    LengthRequired,

    #[error("Method not allowed: {0}")]
    MethodNotAllowed(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    // === Index Errors ===
    #[error("Index error: {0}")]
    Index(String),

    #[error("RocksDB error: {0}")]
    RocksDb(#[from] rocksdb::Error),

    // === Volume Errors ===
    #[error("Volume transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Volume {volume} answered {status}")]
    Volume { volume: String, status: u16 },

    // === I/O Errors ===
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // === Config Errors ===
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Coarse classification of an [`Error`], kept for logs even though the wire
/// protocol collapses most of them into a 500.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Conflict,
    InvalidRequest,
    UpstreamFailure,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ErrorKind::NotFound => "not_found",
            ErrorKind::Conflict => "conflict",
            ErrorKind::InvalidRequest => "invalid_request",
            ErrorKind::UpstreamFailure => "upstream_failure",
        };
        f.write_str(s)
    }
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::NotFound(_) => ErrorKind::NotFound,
            Error::Conflict(_) => ErrorKind::Conflict,
            Error::LengthRequired
            | Error::MethodNotAllowed(_)
            | Error::InvalidPath(_)
            | Error::InvalidConfig(_) => ErrorKind::InvalidRequest,
            Error::Index(_)
            | Error::RocksDb(_)
            | Error::Transport(_)
            | Error::Volume { .. }
            | Error::Io(_) => ErrorKind::UpstreamFailure,
        }
    }

    /// Convert to HTTP status code
    pub fn to_http_status(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Conflict(_) => StatusCode::CONFLICT,
            Error::LengthRequired => StatusCode::LENGTH_REQUIRED,
            Error::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            Error::InvalidPath(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<config::ConfigError> for Error {
    fn from(e: config::ConfigError) -> Self {
        Error::InvalidConfig(e.to_string())
    }
}
