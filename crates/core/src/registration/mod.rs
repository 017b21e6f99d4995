//! Registration eligibility: error taxonomy and the pure checks the
//! validation engine composes.

mod error;
mod rules;

pub use error::{registration_error_to_status_code, RegistrationError};
pub use rules::{ensure_capacity, ensure_not_registered, ensure_transition, first_missing_mandatory};
