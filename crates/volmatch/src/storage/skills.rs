//! Skills and the skills volunteers hold.

use volmatch_core::domain::{Skill, VolunteerSkill};
use volmatch_core::schema::{SKILLS, VOLUNTEER_SKILLS};
use volmatch_core::sql::{col, qualified, Order, Select, TableRef};
use volmatch_core::storage::Result;

use super::EntityRepository;

impl EntityRepository<Skill> {
    /// The skill with this exact name, if any.
    pub async fn find_by_name(&self, name: &str) -> Result<Option<Skill>> {
        self.find_one_by(col("name").eq(name)).await
    }

    pub async fn name_exists(&self, name: &str) -> Result<bool> {
        Ok(self.find_by_name(name).await?.is_some())
    }

    /// Skills whose id is in `ids`, sorted by id. Unknown ids are skipped.
    pub async fn find_by_ids(&self, ids: &[String]) -> Result<Vec<Skill>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.select(
            Select::all_from(TableRef::new(SKILLS.name))
                .filter(col("id").in_list(ids))
                .order_by(col("id"), Order::Asc),
        )
        .await
    }
}

impl EntityRepository<VolunteerSkill> {
    /// Skills held by `user_id`, each carrying the joined skill name.
    ///
    /// A held skill whose skill row is gone is still returned, with no name.
    pub async fn find_by_user_id(&self, user_id: &str) -> Result<Vec<VolunteerSkill>> {
        self.select(
            Select::all_from(TableRef::aliased(VOLUNTEER_SKILLS.name, "vs"))
                .schema_columns("vs", &VOLUNTEER_SKILLS)
                .with_column(qualified("sk", "name"), "skillName")
                .left_join(
                    TableRef::aliased(SKILLS.name, "sk"),
                    qualified("vs", "skillId"),
                    qualified("sk", "id"),
                )
                .filter(qualified("vs", "userId").eq(user_id))
                .order_by(qualified("vs", "id"), Order::Asc),
        )
        .await
    }
}
