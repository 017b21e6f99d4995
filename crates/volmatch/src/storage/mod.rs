//! Store access: the generic entity repository, per-entity lookups,
//! provisioning and the in-memory backend.

mod accounts;
pub mod inmemory;
mod opportunities;
mod provision;
mod registrations;
mod repository;
mod skills;

use std::sync::Arc;

use volmatch_core::codec::DecodePolicy;
use volmatch_core::domain::{
    Opportunity, OpportunityRequirement, Organization, OrganizationMember, Registration, Skill,
    User, VolunteerSkill,
};
use volmatch_core::storage::StoreGateway;

pub use provision::{provision_containers, ProvisionFailure, ProvisionMode, ProvisionReport};
pub use repository::EntityRepository;

/// One repository per entity, all sharing a gateway and decode policy.
#[derive(Clone)]
pub struct Repositories {
    pub users: EntityRepository<User>,
    pub organizations: EntityRepository<Organization>,
    pub organization_members: EntityRepository<OrganizationMember>,
    pub opportunities: EntityRepository<Opportunity>,
    pub requirements: EntityRepository<OpportunityRequirement>,
    pub skills: EntityRepository<Skill>,
    pub volunteer_skills: EntityRepository<VolunteerSkill>,
    pub registrations: EntityRepository<Registration>,
}

impl Repositories {
    pub fn new(gateway: Arc<dyn StoreGateway>, policy: DecodePolicy) -> Self {
        Self {
            users: EntityRepository::new(Arc::clone(&gateway), policy),
            organizations: EntityRepository::new(Arc::clone(&gateway), policy),
            organization_members: EntityRepository::new(Arc::clone(&gateway), policy),
            opportunities: EntityRepository::new(Arc::clone(&gateway), policy),
            requirements: EntityRepository::new(Arc::clone(&gateway), policy),
            skills: EntityRepository::new(Arc::clone(&gateway), policy),
            volunteer_skills: EntityRepository::new(Arc::clone(&gateway), policy),
            registrations: EntityRepository::new(gateway, policy),
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::storage::inmemory::InMemoryGateway;

    /// An in-memory store with every container created, plus lenient
    /// repositories over it.
    pub(crate) async fn provisioned() -> (InMemoryGateway, Repositories) {
        let gateway = InMemoryGateway::new();
        let report = provision_containers(&gateway, ProvisionMode::Rest).await;
        assert!(report.is_complete());

        let repos = Repositories::new(Arc::new(gateway.clone()), DecodePolicy::Lenient);
        (gateway, repos)
    }
}
