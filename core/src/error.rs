//! Error types for the Open Forms client.
//!
//! # Design
//! `NotFound` gets a dedicated variant because callers frequently distinguish
//! "the form does not exist" from "the server returned an unexpected status."
//! All other non-2xx responses land in `Http` with the raw status code and
//! body. Transport failures (connection refused, DNS, timeouts) are kept in a
//! separate `TransportError` so the health check can report them verbatim.

use std::time::Duration;

use thiserror::Error;

/// Failures raised while executing a request, before any status is known.
#[derive(Debug, Error)]
pub enum TransportError {
    /// No response arrived within the configured client timeout.
    #[error("request timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    /// The connection could not be established or was interrupted.
    #[error("connection failed: {0}")]
    Connection(String),
}

/// Errors returned by `OpenFormsClient` operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned 404; the requested form does not exist.
    #[error("resource not found")]
    NotFound,

    /// The server returned a non-2xx status other than 404.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The API root or a relative path did not form a valid URL.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    /// HTTP status carried by the error, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::NotFound => Some(404),
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Errors raised while loading or validating a `Configuration`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}
