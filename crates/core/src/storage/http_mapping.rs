//! Pure functions for mapping store errors to HTTP status codes.
//!
//! Hosting layers use these to answer callers; nothing here performs I/O.

use super::StoreError;

/// Maps a [`StoreError`] to an HTTP status code.
///
/// - `Forbidden` -> 503 (Service Unavailable: our credentials, not the caller's)
/// - `Fault` -> 502 (Bad Gateway)
/// - `NotFound` -> 404 (Not Found)
/// - `Unsupported` -> 405 (Method Not Allowed)
/// - `PartialBatch` -> 500 (Internal Server Error)
/// - `Codec` -> 500 (Internal Server Error)
///
/// # Examples
///
/// ```
/// use volmatch_core::storage::{StoreError, store_error_to_status_code};
///
/// let error = StoreError::NotFound {
///     entity_type: "Opportunity",
///     id: "opp_1".to_string(),
/// };
/// assert_eq!(store_error_to_status_code(&error), 404);
/// ```
pub fn store_error_to_status_code(error: &StoreError) -> u16 {
    match error {
        StoreError::Forbidden { .. } => 503,
        StoreError::Fault { .. } => 502,
        StoreError::NotFound { .. } => 404,
        StoreError::Unsupported { .. } => 405,
        StoreError::PartialBatch { .. } => 500,
        StoreError::Codec(_) => 500,
    }
}
