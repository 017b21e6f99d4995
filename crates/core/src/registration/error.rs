use thiserror::Error;

use crate::domain::RegistrationStatus;
use crate::storage::{store_error_to_status_code, StoreError};

/// Outcomes of a registration attempt or status change other than success.
///
/// The first three are business-rule violations a caller is expected to
/// handle one by one; `Store` carries an infrastructure failure unchanged.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    #[error("User {user_id} is already registered for opportunity {opportunity_id}")]
    AlreadyRegistered {
        user_id: String,
        opportunity_id: String,
    },

    #[error(
        "Opportunity {opportunity_id} is full ({registered_count} registered, {} slots)",
        display_slots(.slots_total)
    )]
    SlotsFull {
        opportunity_id: String,
        slots_total: Option<i64>,
        registered_count: i64,
    },

    #[error(
        "User {user_id} lacks mandatory skill {skill_name} ({skill_id}) for opportunity {opportunity_id}"
    )]
    MissingMandatorySkill {
        user_id: String,
        opportunity_id: String,
        skill_id: String,
        skill_name: String,
    },

    #[error("Registration {id} cannot move from {from} to {to}")]
    InvalidTransition {
        id: String,
        from: String,
        to: RegistrationStatus,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

fn display_slots(slots_total: &Option<i64>) -> String {
    slots_total.map_or_else(|| "no".to_string(), |n| n.to_string())
}

/// Maps a [`RegistrationError`] to an HTTP status code.
///
/// - `AlreadyRegistered` -> 409 (Conflict)
/// - `SlotsFull` -> 409 (Conflict)
/// - `MissingMandatorySkill` -> 422 (Unprocessable Entity)
/// - `InvalidTransition` -> 409 (Conflict)
/// - `Store` -> see [`store_error_to_status_code`]
pub fn registration_error_to_status_code(error: &RegistrationError) -> u16 {
    match error {
        RegistrationError::AlreadyRegistered { .. } => 409,
        RegistrationError::SlotsFull { .. } => 409,
        RegistrationError::MissingMandatorySkill { .. } => 422,
        RegistrationError::InvalidTransition { .. } => 409,
        RegistrationError::Store(store) => store_error_to_status_code(store),
    }
}
