//! Lookups for users, organizations and memberships.

use volmatch_core::domain::{Organization, OrganizationMember, User};
use volmatch_core::sql::col;
use volmatch_core::storage::Result;

use super::EntityRepository;

impl EntityRepository<User> {
    /// The user with this exact email, if any.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        self.find_one_by(col("email").eq(email)).await
    }

    pub async fn email_exists(&self, email: &str) -> Result<bool> {
        Ok(self.find_by_email(email).await?.is_some())
    }
}

impl EntityRepository<Organization> {
    pub async fn find_by_name(&self, name: &str) -> Result<Option<Organization>> {
        self.find_one_by(col("name").eq(name)).await
    }

    /// Organizations administered by `user_id`.
    pub async fn find_by_admin_user_id(&self, user_id: &str) -> Result<Vec<Organization>> {
        self.find_by("adminUserId", user_id).await
    }
}

impl EntityRepository<OrganizationMember> {
    /// Memberships of `user_id` across organizations.
    pub async fn find_by_user_id(&self, user_id: &str) -> Result<Vec<OrganizationMember>> {
        self.find_by("userId", user_id).await
    }
}
