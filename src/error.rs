//! Error types for the API client
//!
//! `TransportError` is what a single network exchange can fail with. It never
//! leaves the crate's public request surface: every failure is classified into
//! an `ApiError` first.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::models::ServerErrorBody;

// == User-Facing Messages ==
pub const TIMEOUT_MESSAGE: &str = "Request is taking too long, check your connection";
pub const NETWORK_MESSAGE: &str = "Connection error, check your internet connection";
pub const VALIDATION_MESSAGE: &str = "Validation error, check the submitted data";
pub const UNAUTHORIZED_MESSAGE: &str = "Not authorized, please log in";
pub const NOT_FOUND_MESSAGE: &str = "Resource not found";
pub const SERVER_ERROR_MESSAGE: &str = "Internal server error";

/// Status code used for failures where no HTTP response was received.
pub const NETWORK_STATUS: u16 = 0;
/// Status code used for requests that exceeded their timeout.
pub const TIMEOUT_STATUS: u16 = 408;

// == Transport Error ==
/// Failure of a single network exchange, before classification.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransportError {
    /// No response arrived before the request timeout
    #[error("request timed out")]
    Timeout,

    /// No response at all (DNS, refused connection, reset, TLS...)
    #[error("connection failed: {0}")]
    Connection(String),

    /// The server answered with a non-2xx status
    #[error("server responded with status {status}")]
    Status { status: u16, body: Value },
}

// == Error Kind ==
/// Fixed failure taxonomy, derived from the status code of an `ApiError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Timeout,
    Network,
    Validation,
    Unauthorized,
    NotFound,
    Server,
    Http,
}

impl ErrorKind {
    pub fn from_status(status: u16) -> Self {
        match status {
            NETWORK_STATUS => ErrorKind::Network,
            TIMEOUT_STATUS => ErrorKind::Timeout,
            400 => ErrorKind::Validation,
            401 => ErrorKind::Unauthorized,
            404 => ErrorKind::NotFound,
            500 => ErrorKind::Server,
            _ => ErrorKind::Http,
        }
    }
}

// == Api Error ==
/// The normalized failure returned to every caller of the client.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[error("{message} (status {status_code})")]
pub struct ApiError {
    /// HTTP status, 0 when no response was received
    pub status_code: u16,
    /// Human readable message
    pub message: String,
    /// Response body, when the server sent one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
}

impl ApiError {
    pub fn new(status_code: u16, message: impl Into<String>) -> Self {
        Self {
            status_code,
            message: message.into(),
            error: None,
        }
    }

    pub fn timeout() -> Self {
        Self::new(TIMEOUT_STATUS, TIMEOUT_MESSAGE)
    }

    pub fn network() -> Self {
        Self::new(NETWORK_STATUS, NETWORK_MESSAGE)
    }

    /// Builds the error for an HTTP response with a non-2xx status.
    ///
    /// A server-provided `message` wins over the per-status default, except
    /// for 401 which always carries the fixed login message.
    pub fn from_response(status: u16, body: Value) -> Self {
        let server_message = ServerErrorBody::message_from(&body);
        let message = match status {
            401 => UNAUTHORIZED_MESSAGE.to_string(),
            _ => server_message.unwrap_or_else(|| default_message(status)),
        };

        Self {
            status_code: status,
            message,
            error: Some(body),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        ErrorKind::from_status(self.status_code)
    }

    pub fn is_unauthorized(&self) -> bool {
        self.kind() == ErrorKind::Unauthorized
    }
}

impl From<TransportError> for ApiError {
    /// Classification in fixed priority: timeout, connectivity, HTTP status.
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Timeout => ApiError::timeout(),
            TransportError::Connection(_) => ApiError::network(),
            TransportError::Status { status, body } => ApiError::from_response(status, body),
        }
    }
}

/// Per-status fallback message when the server did not provide one.
pub fn default_message(status: u16) -> String {
    match status {
        400 => VALIDATION_MESSAGE.to_string(),
        401 => UNAUTHORIZED_MESSAGE.to_string(),
        404 => NOT_FOUND_MESSAGE.to_string(),
        500 => SERVER_ERROR_MESSAGE.to_string(),
        other => format!("Error {}", other),
    }
}

// == Result Type Alias ==
/// Convenience Result type for client operations.
pub type Result<T> = std::result::Result<T, ApiError>;
