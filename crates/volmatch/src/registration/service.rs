//! Registration use cases.

use chrono::Utc;

use volmatch_core::domain::{Registration, RegistrationStatus};
use volmatch_core::registration::{ensure_transition, RegistrationError};
use volmatch_core::storage::Repository;

use super::RegistrationValidator;
use crate::storage::Repositories;

/// Registers volunteers and moves registrations through their lifecycle.
#[derive(Clone)]
pub struct RegistrationService {
    repos: Repositories,
    validator: RegistrationValidator,
}

impl RegistrationService {
    pub fn new(repos: Repositories) -> Self {
        let validator = RegistrationValidator::new(repos.clone());
        Self { repos, validator }
    }

    /// Validates, then writes a PENDING registration stamped now.
    /// Returns the new registration id.
    pub async fn register(&self, user_id: &str, opportunity_id: &str) -> Result<String, RegistrationError> {
        self.validator.validate(user_id, opportunity_id).await?;

        let registration = Registration::pending(user_id, opportunity_id, Utc::now());
        let id = self.repos.registrations.create(&registration).await?;
        tracing::info!(id = %id, user_id, opportunity_id, "Registration created");
        Ok(id)
    }

    /// PENDING -> APPROVED.
    pub async fn approve(&self, id: &str) -> Result<Registration, RegistrationError> {
        self.transition(id, RegistrationStatus::Approved).await
    }

    /// PENDING -> CANCELLED.
    pub async fn reject(&self, id: &str) -> Result<Registration, RegistrationError> {
        self.transition(id, RegistrationStatus::Cancelled).await
    }

    /// Registrations across every opportunity of an organization.
    pub async fn find_by_organization(&self, org_id: &str) -> Result<Vec<Registration>, RegistrationError> {
        Ok(self.repos.registrations.find_by_organization(org_id).await?)
    }

    async fn transition(
        &self,
        id: &str,
        target: RegistrationStatus,
    ) -> Result<Registration, RegistrationError> {
        let registration = self.repos.registrations.get(id).await?;
        ensure_transition(&registration, target).inspect_err(|error| {
            tracing::warn!(id, error = %error, "Registration status change refused");
        })?;

        let updated = self.repos.registrations.set_status(&registration, target).await?;
        tracing::info!(id, status = %target, "Registration status changed");
        Ok(updated)
    }
}
