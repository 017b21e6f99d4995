//! Generic entity repository over a [`StoreGateway`].

use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use volmatch_core::codec::{decode_row, decode_view, encode_row, DecodePolicy, Entity, RowView};
use volmatch_core::schema::ID_COLUMN;
use volmatch_core::sql::{col, Expr, Projection, Select, Statement, TableRef};
use volmatch_core::storage::{Repository, Result, StoreError, StoreGateway, PAGE_SIZE};
use volmatch_core::wire::{QueryResult, Row, RowQuery, Sort};

/// The one repository implementation, parameterized by entity type.
///
/// Everything entity-specific (container, column order, id prefix, field
/// mapping) comes from the [`Entity`] impl. Per-entity lookups are inherent
/// methods on `EntityRepository<Concrete>` in the sibling modules.
pub struct EntityRepository<E> {
    gateway: Arc<dyn StoreGateway>,
    policy: DecodePolicy,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Clone for EntityRepository<E> {
    fn clone(&self) -> Self {
        Self {
            gateway: Arc::clone(&self.gateway),
            policy: self.policy,
            _entity: PhantomData,
        }
    }
}

impl<E: Entity> EntityRepository<E> {
    pub fn new(gateway: Arc<dyn StoreGateway>, policy: DecodePolicy) -> Self {
        Self {
            gateway,
            policy,
            _entity: PhantomData,
        }
    }

    pub(crate) fn container(&self) -> &'static str {
        E::schema().name
    }

    fn decode_rows(&self, rows: &[Row]) -> Result<Vec<E>> {
        rows.iter()
            .map(|row| -> Result<E> { Ok(decode_row::<E>(row)?.into_result(self.policy)?) })
            .collect()
    }

    /// Runs a row read and decodes every returned row.
    pub(crate) async fn find_rows(&self, query: RowQuery) -> Result<Vec<E>> {
        let response = self.gateway.acquire_rows(self.container(), &query).await?;
        self.decode_rows(&response.rows)
    }

    /// First page of records whose `column` equals `value`, sorted by id.
    pub(crate) async fn find_by(&self, column: &'static str, value: &str) -> Result<Vec<E>> {
        self.find_rows(
            RowQuery::limit(PAGE_SIZE)
                .with_condition(col(column).eq(value))
                .with_sort(Sort::ascending(ID_COLUMN)),
        )
        .await
    }

    /// At most one record matching `condition`.
    pub(crate) async fn find_one_by(&self, condition: Expr) -> Result<Option<E>> {
        let mut records = self
            .find_rows(RowQuery::limit(1).with_condition(condition))
            .await?;
        Ok(records.pop())
    }

    /// Writes several records in one upsert call. Returns their ids in order.
    pub async fn create_many(&self, records: &[E]) -> Result<Vec<String>> {
        if records.is_empty() {
            return Ok(Vec::new());
        }

        let mut ids = Vec::with_capacity(records.len());
        let mut rows = Vec::with_capacity(records.len());
        for record in records {
            let mut record = record.clone();
            ids.push(record.assign_id());
            rows.push(encode_row(&record)?);
        }

        self.gateway.register_rows(self.container(), &rows).await?;
        tracing::debug!(
            entity_type = E::ENTITY_TYPE,
            count = ids.len(),
            "Created records"
        );
        Ok(ids)
    }

    /// Runs one SELECT and decodes its rows as `E`.
    ///
    /// Result columns are matched by their projected output names, so a
    /// projection may carry extra columns (e.g. joined names) in any order.
    pub(crate) async fn select(&self, select: Select) -> Result<Vec<E>> {
        let names: Vec<&'static str> = match &select.projection {
            Projection::All => E::schema().column_names(),
            Projection::Columns(items) => items.iter().map(|item| item.output_name()).collect(),
            Projection::Count(_) => {
                return Err(StoreError::transport("a COUNT projection does not decode as records"))
            }
        };

        let result = self.query_one(select).await?;
        result
            .results
            .iter()
            .map(|row| -> Result<E> {
                let view = RowView::named(names.clone(), row);
                Ok(decode_view::<E>(view).into_result(self.policy)?)
            })
            .collect()
    }

    /// `SELECT COUNT(id)` over the container with `condition`.
    pub(crate) async fn count(&self, condition: Expr) -> Result<i64> {
        let select = Select::count(TableRef::new(self.container()), col(ID_COLUMN)).filter(condition);
        let result = self.query_one(select).await?;

        result
            .results
            .first()
            .and_then(|row| row.first())
            .and_then(Value::as_i64)
            .ok_or_else(|| StoreError::Fault {
                status: None,
                body: format!("COUNT on {} returned no number", self.container()),
            })
    }

    async fn query_one(&self, select: Select) -> Result<QueryResult> {
        let statement = Statement::from(select);
        self.gateway
            .run_query(std::slice::from_ref(&statement))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::Fault {
                status: None,
                body: format!("no result for {statement}"),
            })
    }

    /// Submits an ordered statement batch and checks every per-statement
    /// result. The store applies the batch without atomicity and keeps going
    /// after a failed statement, so any failure reports which statements
    /// landed and which did not.
    pub(crate) async fn run_batch(&self, statements: Vec<Statement>) -> Result<()> {
        let results = self.gateway.run_update(&statements).await?;

        let mut applied = 0;
        let mut failed_statements = Vec::new();
        let mut first_message = None;
        for (index, statement) in statements.iter().enumerate() {
            let message = match results.get(index) {
                Some(result) if result.is_success() => {
                    applied += 1;
                    continue;
                }
                Some(result) => result
                    .message
                    .clone()
                    .unwrap_or_else(|| format!("status {}", result.status)),
                None => "no result returned for statement".to_string(),
            };

            tracing::error!(
                entity_type = E::ENTITY_TYPE,
                container = self.container(),
                index,
                statement = %statement,
                message = %message,
                "Statement failed"
            );
            failed_statements.push(index);
            first_message.get_or_insert(message);
        }

        match first_message {
            None => Ok(()),
            Some(message) => {
                tracing::error!(
                    entity_type = E::ENTITY_TYPE,
                    container = self.container(),
                    applied,
                    failed = failed_statements.len(),
                    "Statement batch partially applied"
                );
                Err(StoreError::PartialBatch {
                    container: self.container(),
                    applied,
                    failed_statements,
                    message,
                })
            }
        }
    }
}

#[async_trait]
impl<E: Entity> Repository<E> for EntityRepository<E> {
    async fn create(&self, record: &E) -> Result<String> {
        let mut record = record.clone();
        let id = record.assign_id();
        let row = encode_row(&record)?;

        self.gateway.register_rows(self.container(), &[row]).await?;
        tracing::debug!(entity_type = E::ENTITY_TYPE, id = %id, "Created record");
        Ok(id)
    }

    async fn get(&self, id: &str) -> Result<E> {
        self.find_one_by(col(ID_COLUMN).eq(id))
            .await?
            .ok_or_else(|| StoreError::NotFound {
                entity_type: E::ENTITY_TYPE,
                id: id.to_string(),
            })
    }

    async fn find_all(&self) -> Result<Vec<E>> {
        self.find_rows(RowQuery::limit(PAGE_SIZE).with_sort(Sort::ascending(ID_COLUMN)))
            .await
    }

    async fn update(&self, id: &str, record: &E) -> Result<()> {
        let mut record = record.clone();
        record.set_id(id.to_string());
        let row = encode_row(&record)?;

        self.gateway.register_rows(self.container(), &[row]).await
    }

    async fn delete(&self, id: &str) -> Result<()> {
        tracing::warn!(
            entity_type = E::ENTITY_TYPE,
            id = %id,
            "Delete requested; the store API does not support row deletion"
        );
        Err(StoreError::Unsupported {
            entity_type: E::ENTITY_TYPE,
            operation: "delete",
        })
    }

    async fn id_exists(&self, id: &str) -> Result<bool> {
        match self.get(id).await {
            Ok(_) => Ok(true),
            Err(error) if error.is_not_found() => Ok(false),
            Err(error) => Err(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use serde_json::json;
    use volmatch_core::domain::{
        MemberRole, Opportunity, OpportunityRequirement, Organization, OrganizationMember,
        Registration, RegistrationStatus, Skill, User, UserRole, VerificationStatus,
        VolunteerSkill,
    };
    use volmatch_core::schema::{SKILLS, USERS};

    use super::*;
    use crate::storage::inmemory::InMemoryGateway;
    use crate::storage::testing::provisioned;

    const AWKWARD: &str = r#"O'Brien "the" \helper"#;

    async fn round_trip<E>(repo: &EntityRepository<E>, record: E) -> E
    where
        E: Entity + PartialEq + std::fmt::Debug,
    {
        let id = repo.create(&record).await.unwrap();
        let mut expected = record;
        expected.set_id(id.clone());

        let stored = repo.get(&id).await.unwrap();
        assert_eq!(stored, expected);
        stored
    }

    #[tokio::test]
    async fn test_every_entity_round_trips_through_create_and_get() {
        let (_, repos) = provisioned().await;
        let start = Utc.with_ymd_and_hms(2025, 3, 1, 9, 30, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2025, 3, 1, 17, 0, 0).unwrap();

        let user = round_trip(
            &repos.users,
            User::new("o'brien@example.org", AWKWARD, UserRole::Organizer),
        )
        .await;
        let org = round_trip(
            &repos.organizations,
            Organization::new(AWKWARD, &user.id).with_website_url("https://x.org/a?b='c'"),
        )
        .await;
        round_trip(
            &repos.organization_members,
            OrganizationMember::new(&user.id, &org.id, MemberRole::Admin),
        )
        .await;

        let mut opportunity = Opportunity::new(AWKWARD, &org.id, 12).with_schedule(start, end);
        opportunity.description = Some("Line one\nline \"two\"\\".to_string());
        opportunity.address = Some("1 Quote's Lane".to_string());
        let opportunity = round_trip(&repos.opportunities, opportunity).await;

        let skill = round_trip(&repos.skills, Skill::new(AWKWARD)).await;
        let requirement =
            round_trip(&repos.requirements, OpportunityRequirement::mandatory(&opportunity.id, &skill.id)).await;
        assert_eq!(requirement.id, format!("{}-{}", opportunity.id, skill.id));

        let mut held = VolunteerSkill::new(&user.id, &skill.id).with_expiry(end);
        held.verification_status = Some(VerificationStatus::Verified);
        round_trip(&repos.volunteer_skills, held).await;

        let mut registration = Registration::pending(&user.id, &opportunity.id, start);
        registration.status = Some(RegistrationStatus::Approved);
        round_trip(&repos.registrations, registration).await;
    }

    #[tokio::test]
    async fn test_create_generates_prefixed_ids() {
        let (_, repos) = provisioned().await;

        let id = repos
            .users
            .create(&User::new("a@example.org", "A", UserRole::Volunteer))
            .await
            .unwrap();
        let explicit = repos
            .skills
            .create(&Skill::new("Cooking").with_id("sk_explicit"))
            .await
            .unwrap();

        assert!(id.starts_with("usr_"));
        assert_eq!(explicit, "sk_explicit");
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let (_, repos) = provisioned().await;

        let result = repos.users.get("usr_missing").await;

        assert_eq!(
            result,
            Err(StoreError::NotFound {
                entity_type: "User",
                id: "usr_missing".to_string()
            })
        );
        assert!(!repos.users.id_exists("usr_missing").await.unwrap());
    }

    #[tokio::test]
    async fn test_find_all_is_sorted_and_capped() {
        let (_, repos) = provisioned().await;
        let skills: Vec<Skill> = (0..60)
            .rev()
            .map(|n| Skill::new(format!("Skill {n}")).with_id(format!("sk_{n:03}")))
            .collect();
        repos.skills.create_many(&skills).await.unwrap();

        let page = repos.skills.find_all().await.unwrap();

        assert_eq!(page.len(), PAGE_SIZE as usize);
        assert_eq!(page[0].id, "sk_000");
        assert_eq!(page[49].id, "sk_049");
    }

    #[tokio::test]
    async fn test_update_rewrites_the_full_row() {
        let (_, repos) = provisioned().await;
        let id = repos
            .users
            .create(&User::new("b@example.org", "Before", UserRole::Volunteer))
            .await
            .unwrap();

        let mut user = repos.users.get(&id).await.unwrap();
        user.full_name = "After".to_string();
        user.role = None;
        repos.users.update(&id, &user).await.unwrap();

        let stored = repos.users.get(&id).await.unwrap();
        assert_eq!(stored.full_name, "After");
        assert_eq!(stored.role, None);
        assert_eq!(stored.email, "b@example.org");
    }

    #[tokio::test]
    async fn test_delete_is_rejected_for_every_entity() {
        let (gateway, repos) = provisioned().await;
        let user_id = repos
            .users
            .create(&User::new("c@example.org", "C", UserRole::Volunteer))
            .await
            .unwrap();

        let outcomes = [
            ("User", repos.users.delete(&user_id).await),
            ("Organization", repos.organizations.delete("org_1").await),
            ("OrganizationMember", repos.organization_members.delete("om_1").await),
            ("Opportunity", repos.opportunities.delete("opp_1").await),
            ("OpportunityRequirement", repos.requirements.delete("opp_1-sk_1").await),
            ("Skill", repos.skills.delete("sk_1").await),
            ("VolunteerSkill", repos.volunteer_skills.delete("vsk_1").await),
            ("Registration", repos.registrations.delete("reg_1").await),
        ];

        for (entity_type, outcome) in outcomes {
            assert_eq!(
                outcome,
                Err(StoreError::Unsupported {
                    entity_type,
                    operation: "delete"
                })
            );
        }
        assert_eq!(gateway.row_count(USERS.name).await, 1);
        assert!(repos.users.id_exists(&user_id).await.unwrap());
    }

    #[tokio::test]
    async fn test_lenient_decode_keeps_the_row() {
        let (gateway, repos) = provisioned().await;
        gateway
            .register_rows(
                USERS.name,
                &[vec![json!("usr_1"), json!("d@example.org"), json!("D"), json!("SUPERUSER")]],
            )
            .await
            .unwrap();

        let user = repos.users.get("usr_1").await.unwrap();

        assert_eq!(user.email, "d@example.org");
        assert_eq!(user.role, None);
    }

    #[tokio::test]
    async fn test_strict_decode_fails_the_read() {
        let gateway = InMemoryGateway::new();
        gateway.create_container(&USERS.definition()).await.unwrap();
        gateway
            .register_rows(
                USERS.name,
                &[vec![json!("usr_1"), json!("d@example.org"), json!("D"), json!("SUPERUSER")]],
            )
            .await
            .unwrap();
        let repo: EntityRepository<User> =
            EntityRepository::new(Arc::new(gateway), DecodePolicy::Strict);

        let result = repo.get("usr_1").await;

        assert!(matches!(result, Err(StoreError::Codec(_))));
    }

    #[tokio::test]
    async fn test_count_and_select_by_names() {
        let (_, repos) = provisioned().await;
        repos
            .skills
            .create_many(&[
                Skill::new("Driving").with_id("sk_1"),
                Skill::new("Cooking").with_id("sk_2"),
            ])
            .await
            .unwrap();

        let count = repos.skills.count(col("name").eq("Driving")).await.unwrap();
        let selected = repos
            .skills
            .select(Select::all_from(TableRef::new(SKILLS.name)).filter(col("id").eq("sk_2")))
            .await
            .unwrap();

        assert_eq!(count, 1);
        assert_eq!(selected, vec![Skill::new("Cooking").with_id("sk_2")]);
    }
}
