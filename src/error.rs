//! Error types for backend access.

use thiserror::Error;

/// Errors from the row, auth and configuration layers
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Not signed in or session expired")]
    Unauthorized,

    #[error("Not found")]
    NotFound,

    #[error("Backend error {status}: {message}")]
    Backend {
        status: u16,
        code: Option<String>,
        message: String,
    },

    #[error("Unexpected response: {0}")]
    Decode(String),

    #[error("Backend is not configured: {0}")]
    Config(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else {
            ApiError::Network(e.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Decode(e.to_string())
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Errors from the realtime channel
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RealtimeError {
    #[error("Could not open realtime socket: {0}")]
    Open(String),

    #[error("Subscription rejected: {0}")]
    Rejected(String),

    #[error("Malformed realtime message: {0}")]
    Protocol(String),

    #[error("Realtime socket error")]
    Socket,

    #[error("Realtime socket closed")]
    Closed,
}

impl From<serde_json::Error> for RealtimeError {
    fn from(e: serde_json::Error) -> Self {
        RealtimeError::Protocol(e.to_string())
    }
}
