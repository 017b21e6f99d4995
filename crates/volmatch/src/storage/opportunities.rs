//! Opportunities and their skill requirements.

use volmatch_core::codec::{encode_row, Entity};
use volmatch_core::domain::{Opportunity, OpportunityRequirement};
use volmatch_core::sql::{col, Delete, Insert, Statement};
use volmatch_core::storage::Result;

use super::EntityRepository;

impl EntityRepository<Opportunity> {
    /// Opportunities published by `org_id`.
    pub async fn find_by_organization(&self, org_id: &str) -> Result<Vec<Opportunity>> {
        self.find_by("orgId", org_id).await
    }
}

impl EntityRepository<OpportunityRequirement> {
    /// Requirements of one opportunity, in id order.
    pub async fn find_by_opportunity(&self, opportunity_id: &str) -> Result<Vec<OpportunityRequirement>> {
        self.find_by("opportunityId", opportunity_id).await
    }

    /// Replaces the full requirement set of an opportunity.
    ///
    /// Sends one DELETE scoped to the opportunity followed by one bulk
    /// INSERT as a single ordered batch. Every requirement is re-parented to
    /// `opportunity_id` and keeps or derives its id. The store does not run
    /// the batch atomically; a failure after the DELETE surfaces as
    /// [`volmatch_core::storage::StoreError::PartialBatch`].
    pub async fn replace_for_opportunity(
        &self,
        opportunity_id: &str,
        requirements: &[OpportunityRequirement],
    ) -> Result<()> {
        let mut rows = Vec::with_capacity(requirements.len());
        for requirement in requirements {
            let mut requirement = requirement.clone();
            requirement.opportunity_id = opportunity_id.to_string();
            requirement.assign_id();
            rows.push(encode_row(&requirement)?);
        }

        let schema = OpportunityRequirement::schema();
        let mut statements: Vec<Statement> = vec![Delete {
            table: schema.name,
            condition: col("opportunityId").eq(opportunity_id),
        }
        .into()];
        if !rows.is_empty() {
            statements.push(Insert::rows(schema, &rows).into());
        }

        self.run_batch(statements).await?;
        tracing::debug!(
            opportunity_id = %opportunity_id,
            count = rows.len(),
            "Replaced opportunity requirements"
        );
        Ok(())
    }
}
