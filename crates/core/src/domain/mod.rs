mod enums;
mod types;

pub use enums::{EnumLiteral, MemberRole, RegistrationStatus, UserRole, VerificationStatus};
pub use types::{
    Opportunity, OpportunityRequirement, Organization, OrganizationMember, Registration, Skill,
    User, VolunteerSkill, store_precision,
};
