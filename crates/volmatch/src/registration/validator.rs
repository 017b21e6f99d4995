//! The registration validation engine.

use std::collections::HashSet;

use volmatch_core::registration::{
    ensure_capacity, ensure_not_registered, first_missing_mandatory, RegistrationError,
};
use volmatch_core::storage::Repository;

use crate::storage::Repositories;

/// Name reported for a missing mandatory skill whose skill row is gone.
pub const UNKNOWN_SKILL_NAME: &str = "Unknown Skill";

/// Decides whether a user may register for an opportunity.
///
/// Stateless and lock-free: it only reads. Between a passing validation and
/// the caller's write another registration may land, so capacity is a
/// best-effort guarantee.
#[derive(Clone)]
pub struct RegistrationValidator {
    repos: Repositories,
}

impl RegistrationValidator {
    pub fn new(repos: Repositories) -> Self {
        Self { repos }
    }

    /// Runs uniqueness, capacity and mandatory-skill checks in that order and
    /// reports the first that fails.
    pub async fn validate(&self, user_id: &str, opportunity_id: &str) -> Result<(), RegistrationError> {
        tracing::debug!(user_id, opportunity_id, "Validating registration");

        self.check_not_registered(user_id, opportunity_id).await?;
        self.check_capacity(opportunity_id).await?;
        self.check_mandatory_skills(user_id, opportunity_id).await?;

        tracing::debug!(user_id, opportunity_id, "Registration validation passed");
        Ok(())
    }

    async fn check_not_registered(&self, user_id: &str, opportunity_id: &str) -> Result<(), RegistrationError> {
        let existing = self
            .repos
            .registrations
            .find_by_user_and_opportunity(user_id, opportunity_id)
            .await?;

        ensure_not_registered(existing.as_ref(), user_id, opportunity_id).inspect_err(|_| {
            tracing::debug!(user_id, opportunity_id, "Rejected: already registered");
        })
    }

    async fn check_capacity(&self, opportunity_id: &str) -> Result<(), RegistrationError> {
        let opportunity = self.repos.opportunities.get(opportunity_id).await?;
        let registered = self
            .repos
            .registrations
            .count_by_opportunity(opportunity_id)
            .await?;

        ensure_capacity(opportunity_id, opportunity.slots_total, registered).inspect_err(|_| {
            tracing::debug!(
                opportunity_id,
                registered,
                slots_total = ?opportunity.slots_total,
                "Rejected: opportunity is full"
            );
        })
    }

    async fn check_mandatory_skills(&self, user_id: &str, opportunity_id: &str) -> Result<(), RegistrationError> {
        let held = self.repos.volunteer_skills.find_by_user_id(user_id).await?;
        let requirements = self
            .repos
            .requirements
            .find_by_opportunity(opportunity_id)
            .await?;

        // Any held record counts, whatever its verification status.
        let held_ids: HashSet<&str> = held.iter().map(|skill| skill.skill_id.as_str()).collect();
        let Some(missing) = first_missing_mandatory(&requirements, &held_ids) else {
            return Ok(());
        };

        let skill_name = match self.repos.skills.get(&missing.skill_id).await {
            Ok(skill) => skill.name,
            Err(error) if error.is_not_found() => UNKNOWN_SKILL_NAME.to_string(),
            Err(error) => return Err(error.into()),
        };

        tracing::debug!(
            user_id,
            opportunity_id,
            skill_id = %missing.skill_id,
            skill_name = %skill_name,
            "Rejected: missing mandatory skill"
        );
        Err(RegistrationError::MissingMandatorySkill {
            user_id: user_id.to_string(),
            opportunity_id: opportunity_id.to_string(),
            skill_id: missing.skill_id.clone(),
            skill_name,
        })
    }
}
