//! Registration queries and status writes.

use volmatch_core::domain::{Registration, RegistrationStatus};
use volmatch_core::schema::{OPPORTUNITIES, REGISTRATIONS};
use volmatch_core::sql::{col, qualified, Order, Select, TableRef};
use volmatch_core::storage::{Repository, Result};

use super::EntityRepository;

impl EntityRepository<Registration> {
    /// The registration of `user_id` for `opportunity_id`, in any status.
    pub async fn find_by_user_and_opportunity(
        &self,
        user_id: &str,
        opportunity_id: &str,
    ) -> Result<Option<Registration>> {
        self.find_one_by(
            col("userId")
                .eq(user_id)
                .and(col("opportunityId").eq(opportunity_id)),
        )
        .await
    }

    /// Number of registrations for an opportunity, in any status.
    pub async fn count_by_opportunity(&self, opportunity_id: &str) -> Result<i64> {
        self.count(col("opportunityId").eq(opportunity_id)).await
    }

    /// Registrations for every opportunity published by `org_id`.
    pub async fn find_by_organization(&self, org_id: &str) -> Result<Vec<Registration>> {
        self.select(
            Select::all_from(TableRef::aliased(REGISTRATIONS.name, "reg"))
                .schema_columns("reg", &REGISTRATIONS)
                .join(
                    TableRef::aliased(OPPORTUNITIES.name, "opp"),
                    qualified("reg", "opportunityId"),
                    qualified("opp", "id"),
                )
                .filter(qualified("opp", "orgId").eq(org_id))
                .order_by(qualified("reg", "id"), Order::Asc),
        )
        .await
    }

    /// Rewrites `registration` with `status` and returns the stored record.
    pub async fn set_status(
        &self,
        registration: &Registration,
        status: RegistrationStatus,
    ) -> Result<Registration> {
        let mut updated = registration.clone();
        updated.status = Some(status);
        self.update(&registration.id, &updated).await?;
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use volmatch_core::domain::Opportunity;

    use super::*;
    use crate::storage::testing::provisioned;

    #[tokio::test]
    async fn test_find_by_user_and_opportunity() {
        let (_, repos) = provisioned().await;
        let id = repos
            .registrations
            .create(&Registration::pending("usr_1", "opp_1", Utc::now()))
            .await
            .unwrap();
        repos
            .registrations
            .create(&Registration::pending("usr_1", "opp_2", Utc::now()))
            .await
            .unwrap();

        let found = repos
            .registrations
            .find_by_user_and_opportunity("usr_1", "opp_1")
            .await
            .unwrap();
        let missing = repos
            .registrations
            .find_by_user_and_opportunity("usr_2", "opp_1")
            .await
            .unwrap();

        assert_eq!(found.map(|r| r.id), Some(id));
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_create_then_get_reproduces_current_time() {
        let (_, repos) = provisioned().await;
        let mut registration = Registration::pending("usr_1", "opp_1", Utc::now());
        registration.id = repos.registrations.create(&registration).await.unwrap();

        let stored = repos.registrations.get(&registration.id).await.unwrap();

        assert_eq!(stored, registration);
    }

    #[tokio::test]
    async fn test_count_includes_every_status() {
        let (_, repos) = provisioned().await;
        let mut cancelled = Registration::pending("usr_1", "opp_1", Utc::now());
        cancelled.status = Some(RegistrationStatus::Cancelled);
        repos.registrations.create(&cancelled).await.unwrap();
        repos
            .registrations
            .create(&Registration::pending("usr_2", "opp_1", Utc::now()))
            .await
            .unwrap();

        assert_eq!(repos.registrations.count_by_opportunity("opp_1").await.unwrap(), 2);
        assert_eq!(repos.registrations.count_by_opportunity("opp_9").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_find_by_organization_joins_opportunities() {
        let (_, repos) = provisioned().await;
        let mine = repos
            .opportunities
            .create(&Opportunity::new("Pantry", "org_1", 5))
            .await
            .unwrap();
        let theirs = repos
            .opportunities
            .create(&Opportunity::new("Garden", "org_2", 5))
            .await
            .unwrap();
        let first = repos
            .registrations
            .create(&Registration::pending("usr_1", &mine, Utc::now()))
            .await
            .unwrap();
        repos
            .registrations
            .create(&Registration::pending("usr_1", &theirs, Utc::now()))
            .await
            .unwrap();
        let second = repos
            .registrations
            .create(&Registration::pending("usr_2", &mine, Utc::now()))
            .await
            .unwrap();

        let found = repos.registrations.find_by_organization("org_1").await.unwrap();

        let ids: Vec<String> = found.iter().map(|r| r.id.clone()).collect();
        assert_eq!(ids, vec![first, second]);
        assert!(found.iter().all(|r| r.opportunity_id == mine));
    }

    #[tokio::test]
    async fn test_set_status_rewrites_the_row() {
        let (_, repos) = provisioned().await;
        let id = repos
            .registrations
            .create(&Registration::pending("usr_1", "opp_1", Utc::now()))
            .await
            .unwrap();
        let registration = repos.registrations.get(&id).await.unwrap();

        let approved = repos
            .registrations
            .set_status(&registration, RegistrationStatus::Approved)
            .await
            .unwrap();

        let stored = repos.registrations.get(&id).await.unwrap();
        assert_eq!(approved.status, Some(RegistrationStatus::Approved));
        assert_eq!(stored.status, Some(RegistrationStatus::Approved));
        assert_eq!(stored.registration_time, registration.registration_time);
    }
}
