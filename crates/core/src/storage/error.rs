use thiserror::Error;

use crate::codec::CodecError;

/// Errors that can occur during store access.
///
/// Every gateway and repository call returns this one type, so a caller can
/// tell a credentials problem from any other failed store call by variant.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The store answered 403.
    #[error("Store access forbidden (check credentials and permissions): {body}")]
    Forbidden { body: String },

    /// Any other non-2xx response, or a transport or serialization failure.
    #[error("{}", fault_message(.status, .body))]
    Fault { status: Option<u16>, body: String },

    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    #[error("{operation} is not supported for {entity_type}")]
    Unsupported {
        entity_type: &'static str,
        operation: &'static str,
    },

    /// Some statements of a batch failed. The store keeps executing after a
    /// failure, so `applied` counts every successful statement and
    /// `failed_statements` lists the failed indexes in order. `message` is
    /// the first failure's message.
    #[error(
        "Batch on {container} partially applied ({applied} applied, failed statements {failed_statements:?}): {message}"
    )]
    PartialBatch {
        container: &'static str,
        applied: usize,
        failed_statements: Vec<usize>,
        message: String,
    },

    #[error(transparent)]
    Codec(#[from] CodecError),
}

fn fault_message(status: &Option<u16>, body: &str) -> String {
    match status {
        Some(status) => format!("Store fault (HTTP {status}): {body}"),
        None => format!("Store fault: {body}"),
    }
}

impl StoreError {
    /// A fault with no HTTP status, e.g. a transport failure.
    pub fn transport(message: impl Into<String>) -> Self {
        StoreError::Fault {
            status: None,
            body: message.into(),
        }
    }

    /// Classifies a non-2xx HTTP response.
    pub fn from_status(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        if status == 403 {
            StoreError::Forbidden { body }
        } else {
            StoreError::Fault {
                status: Some(status),
                body,
            }
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_separates_forbidden() {
        assert!(matches!(
            StoreError::from_status(403, "denied"),
            StoreError::Forbidden { .. }
        ));
        assert_eq!(
            StoreError::from_status(500, "boom"),
            StoreError::Fault {
                status: Some(500),
                body: "boom".to_string()
            }
        );
        assert!(matches!(
            StoreError::from_status(404, ""),
            StoreError::Fault {
                status: Some(404),
                ..
            }
        ));
    }

    #[test]
    fn test_fault_display() {
        assert_eq!(
            StoreError::from_status(502, "bad gateway").to_string(),
            "Store fault (HTTP 502): bad gateway"
        );
        assert_eq!(
            StoreError::transport("connection refused").to_string(),
            "Store fault: connection refused"
        );
    }

    #[test]
    fn test_not_found_display() {
        let error = StoreError::NotFound {
            entity_type: "Skill",
            id: "sk_1".to_string(),
        };
        assert_eq!(error.to_string(), "Skill not found: sk_1");
        assert!(error.is_not_found());
    }

    #[test]
    fn test_unsupported_display() {
        let error = StoreError::Unsupported {
            entity_type: "User",
            operation: "delete",
        };
        assert_eq!(error.to_string(), "delete is not supported for User");
    }
}
