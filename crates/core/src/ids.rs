//! Identifier generation.
//!
//! Ids are `<prefix><uuid-v7 as 32 lowercase hex digits>`. UUIDv7 puts the
//! millisecond timestamp in the high bits and the process-wide generator is
//! monotonic, so ids of one entity type sort lexicographically by creation.

use uuid::Uuid;

/// Generates a fresh id for an entity type prefix such as `usr_`.
pub fn next_id(prefix: &str) -> String {
    format!("{prefix}{}", Uuid::now_v7().simple())
}

/// The derived id of an opportunity requirement.
pub fn requirement_id(opportunity_id: &str, skill_id: &str) -> String {
    format!("{opportunity_id}-{skill_id}")
}

/// Returns true if `id` is absent for the purpose of id assignment.
pub fn is_unassigned(id: &str) -> bool {
    id.trim().is_empty()
}
