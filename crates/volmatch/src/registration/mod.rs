//! Registration eligibility and lifecycle on top of the repositories.

mod service;
mod validator;

pub use service::RegistrationService;
pub use validator::{RegistrationValidator, UNKNOWN_SKILL_NAME};
