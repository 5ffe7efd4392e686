//! Error types for the job tracker API client.
//!
//! # Design
//! Every non-2xx response lands in `Request` with the raw status code and
//! body, so a 404 is `Request { status: 404, .. }` rather than a dedicated
//! variant; `is_not_found` covers the common check. Failures before any
//! response are split into `Network` and `Timeout` so callers can word their
//! messages differently. Nothing in this crate retries.

use std::time::Duration;

use thiserror::Error;

/// Errors returned by `ResourceClient` operations and the typed endpoints.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Connection-level failure before any response was received.
    #[error("network error: {0}")]
    Network(String),

    /// The call did not complete within the configured timeout.
    #[error("request timed out after {}s", .0.as_secs_f64())]
    Timeout(Duration),

    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    Request { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The credential provider could not produce a bearer token.
    #[error("credential error: {0}")]
    Credential(String),

    /// Base URL and path could not be joined into a valid URL.
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    /// Configuration could not be loaded.
    #[error("configuration error: {0}")]
    Config(String),

    /// A required field was missing; no request was sent.
    #[error("validation failed: {0}")]
    Validation(String),
}

impl ApiError {
    /// HTTP status for `Request` errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Request { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, ApiError::Timeout(_))
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ApiError>;
