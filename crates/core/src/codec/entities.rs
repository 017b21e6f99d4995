//! Per-entity column mappings.

use super::{Entity, FieldMap, FieldReader};
use crate::domain::{
    Opportunity, OpportunityRequirement, Organization, OrganizationMember, Registration, Skill,
    User, VolunteerSkill,
};
use crate::ids;
use crate::schema::{
    ContainerSchema, OPPORTUNITIES, OPPORTUNITY_REQUIREMENTS, ORGANIZATIONS, ORGANIZATION_MEMBERS,
    REGISTRATIONS, SKILLS, USERS, VOLUNTEER_SKILLS,
};

macro_rules! id_accessors {
    () => {
        fn id(&self) -> &str {
            &self.id
        }

        fn set_id(&mut self, id: String) {
            self.id = id;
        }
    };
}

impl Entity for User {
    const ENTITY_TYPE: &'static str = "User";
    const ID_PREFIX: &'static str = "usr_";

    fn schema() -> &'static ContainerSchema {
        &USERS
    }

    id_accessors!();

    fn encode(&self) -> FieldMap {
        FieldMap::new()
            .string("id", &self.id)
            .string("email", &self.email)
            .string("fullName", &self.full_name)
            .enumeration("role", self.role)
    }

    fn decode(fields: &mut FieldReader<'_>) -> Self {
        Self {
            id: fields.string("id"),
            email: fields.string("email"),
            full_name: fields.string("fullName"),
            role: fields.enumeration("role"),
        }
    }
}

impl Entity for Organization {
    const ENTITY_TYPE: &'static str = "Organization";
    const ID_PREFIX: &'static str = "org_";

    fn schema() -> &'static ContainerSchema {
        &ORGANIZATIONS
    }

    id_accessors!();

    fn encode(&self) -> FieldMap {
        FieldMap::new()
            .string("id", &self.id)
            .string("name", &self.name)
            .opt_string("websiteUrl", self.website_url.as_deref())
            .string("adminUserId", &self.admin_user_id)
    }

    fn decode(fields: &mut FieldReader<'_>) -> Self {
        Self {
            id: fields.string("id"),
            name: fields.string("name"),
            website_url: fields.opt_string("websiteUrl"),
            admin_user_id: fields.string("adminUserId"),
        }
    }
}

impl Entity for OrganizationMember {
    const ENTITY_TYPE: &'static str = "OrganizationMember";
    const ID_PREFIX: &'static str = "om_";

    fn schema() -> &'static ContainerSchema {
        &ORGANIZATION_MEMBERS
    }

    id_accessors!();

    fn encode(&self) -> FieldMap {
        FieldMap::new()
            .string("id", &self.id)
            .string("userId", &self.user_id)
            .string("orgId", &self.org_id)
            .enumeration("memberRole", self.member_role)
    }

    fn decode(fields: &mut FieldReader<'_>) -> Self {
        Self {
            id: fields.string("id"),
            user_id: fields.string("userId"),
            org_id: fields.string("orgId"),
            member_role: fields.enumeration("memberRole"),
        }
    }
}

impl Entity for Opportunity {
    const ENTITY_TYPE: &'static str = "Opportunity";
    const ID_PREFIX: &'static str = "opp_";

    fn schema() -> &'static ContainerSchema {
        &OPPORTUNITIES
    }

    id_accessors!();

    fn encode(&self) -> FieldMap {
        FieldMap::new()
            .string("id", &self.id)
            .string("title", &self.title)
            .opt_string("description", self.description.as_deref())
            .opt_string("address", self.address.as_deref())
            .timestamp("startTime", self.start_time.as_ref())
            .timestamp("endTime", self.end_time.as_ref())
            .long("slotsTotal", self.slots_total)
            .string("orgId", &self.org_id)
    }

    fn decode(fields: &mut FieldReader<'_>) -> Self {
        Self {
            id: fields.string("id"),
            title: fields.string("title"),
            description: fields.opt_string("description"),
            address: fields.opt_string("address"),
            start_time: fields.timestamp("startTime"),
            end_time: fields.timestamp("endTime"),
            slots_total: fields.long("slotsTotal"),
            org_id: fields.string("orgId"),
        }
    }
}

impl Entity for OpportunityRequirement {
    const ENTITY_TYPE: &'static str = "OpportunityRequirement";
    const ID_PREFIX: &'static str = "oreq_";

    fn schema() -> &'static ContainerSchema {
        &OPPORTUNITY_REQUIREMENTS
    }

    id_accessors!();

    fn derived_id(&self) -> Option<String> {
        Some(ids::requirement_id(&self.opportunity_id, &self.skill_id))
    }

    fn encode(&self) -> FieldMap {
        FieldMap::new()
            .string("id", &self.id)
            .string("opportunityId", &self.opportunity_id)
            .string("skillId", &self.skill_id)
            .bool("isMandatory", self.is_mandatory)
    }

    fn decode(fields: &mut FieldReader<'_>) -> Self {
        Self {
            id: fields.string("id"),
            opportunity_id: fields.string("opportunityId"),
            skill_id: fields.string("skillId"),
            is_mandatory: fields.bool("isMandatory"),
        }
    }
}

impl Entity for Skill {
    const ENTITY_TYPE: &'static str = "Skill";
    const ID_PREFIX: &'static str = "sk_";

    fn schema() -> &'static ContainerSchema {
        &SKILLS
    }

    id_accessors!();

    fn encode(&self) -> FieldMap {
        FieldMap::new()
            .string("id", &self.id)
            .string("name", &self.name)
    }

    fn decode(fields: &mut FieldReader<'_>) -> Self {
        Self {
            id: fields.string("id"),
            name: fields.string("name"),
        }
    }
}

impl Entity for VolunteerSkill {
    const ENTITY_TYPE: &'static str = "VolunteerSkill";
    const ID_PREFIX: &'static str = "vsk_";

    fn schema() -> &'static ContainerSchema {
        &VOLUNTEER_SKILLS
    }

    id_accessors!();

    fn encode(&self) -> FieldMap {
        // skillName is a join projection, never stored.
        FieldMap::new()
            .string("id", &self.id)
            .string("userId", &self.user_id)
            .string("skillId", &self.skill_id)
            .timestamp("expiryDate", self.expiry_date.as_ref())
            .enumeration("verificationStatus", self.verification_status)
    }

    fn decode(fields: &mut FieldReader<'_>) -> Self {
        Self {
            id: fields.string("id"),
            user_id: fields.string("userId"),
            skill_id: fields.string("skillId"),
            expiry_date: fields.timestamp("expiryDate"),
            verification_status: fields.enumeration("verificationStatus"),
            skill_name: fields.projected_string("skillName"),
        }
    }
}

impl Entity for Registration {
    const ENTITY_TYPE: &'static str = "Registration";
    const ID_PREFIX: &'static str = "reg_";

    fn schema() -> &'static ContainerSchema {
        &REGISTRATIONS
    }

    id_accessors!();

    fn encode(&self) -> FieldMap {
        FieldMap::new()
            .string("id", &self.id)
            .string("userId", &self.user_id)
            .string("opportunityId", &self.opportunity_id)
            .enumeration("status", self.status)
            .timestamp("registrationTime", self.registration_time.as_ref())
    }

    fn decode(fields: &mut FieldReader<'_>) -> Self {
        Self {
            id: fields.string("id"),
            user_id: fields.string("userId"),
            opportunity_id: fields.string("opportunityId"),
            status: fields.enumeration("status"),
            registration_time: fields.timestamp("registrationTime"),
        }
    }
}
