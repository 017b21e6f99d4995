//! Client error types.

use thiserror::Error;
use volmatch_core::storage::StoreError;

/// Errors that can occur while building a [`crate::StoreConfig`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required setting: {0}")]
    Missing(&'static str),

    #[error("Invalid base URL '{value}': {reason}")]
    InvalidUrl { value: String, reason: String },

    #[error("Invalid value for {name}: '{value}'")]
    InvalidNumber { name: &'static str, value: String },
}

/// Wraps a transport-level failure into the store's one failure surface.
pub(crate) fn transport_error(error: reqwest::Error) -> StoreError {
    let kind = if error.is_timeout() {
        "timeout"
    } else if error.is_connect() {
        "connect"
    } else if error.is_decode() {
        "decode"
    } else {
        "request"
    };
    StoreError::transport(format!("{kind} error: {error}"))
}

/// A 2xx response whose body did not match the expected shape.
pub(crate) fn invalid_response(status: u16, error: serde_json::Error, body: &str) -> StoreError {
    StoreError::Fault {
        status: Some(status),
        body: format!("invalid response ({error}): {body}"),
    }
}
