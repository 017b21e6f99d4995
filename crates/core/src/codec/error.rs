use std::fmt;

use thiserror::Error;

/// Why a single column failed to decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldFault {
    /// The column is not present in the row at all.
    Missing,
    /// A required column held `null`.
    Null,
    /// The JSON value has the wrong shape for the column type.
    WrongType { expected: &'static str },
    /// A timestamp string that does not parse.
    BadTimestamp(String),
    /// An enumeration literal outside the known set.
    UnknownLiteral(String),
}

impl fmt::Display for FieldFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldFault::Missing => f.write_str("column missing from row"),
            FieldFault::Null => f.write_str("required value is null"),
            FieldFault::WrongType { expected } => write!(f, "expected {expected}"),
            FieldFault::BadTimestamp(raw) => write!(f, "unparseable timestamp {raw:?}"),
            FieldFault::UnknownLiteral(raw) => write!(f, "unknown literal {raw:?}"),
        }
    }
}

/// A per-field decode failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{column}: {fault}")]
pub struct FieldError {
    pub column: &'static str,
    pub fault: FieldFault,
}

/// Errors from the row codec.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("{entity_type}: column {column} is not declared in container {container}")]
    UnknownColumn {
        entity_type: &'static str,
        container: &'static str,
        column: &'static str,
    },

    #[error("{entity_type}: row has {actual} values, schema declares {expected}")]
    RowLength {
        entity_type: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("{entity_type}: {} field(s) failed to decode: {}", .errors.len(), join(.errors))]
    Decode {
        entity_type: &'static str,
        errors: Vec<FieldError>,
    },
}

fn join(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// What to do with a row whose fields partly failed to decode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DecodePolicy {
    /// Keep the record with the failed fields unset and log each failure.
    #[default]
    Lenient,
    /// Fail the whole read with [`CodecError::Decode`].
    Strict,
}

impl std::str::FromStr for DecodePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "lenient" => Ok(DecodePolicy::Lenient),
            "strict" => Ok(DecodePolicy::Strict),
            other => Err(format!(
                "invalid decode policy '{other}', expected 'lenient' or 'strict'"
            )),
        }
    }
}
