use super::{Column, ColumnType, ContainerSchema};

use ColumnType::{Bool, Long, String, Timestamp};

pub static USERS: ContainerSchema = ContainerSchema {
    name: "VoMaUsers",
    columns: &[
        Column::indexed("id", String),
        Column::indexed("email", String),
        Column::new("fullName", String),
        Column::new("role", String),
    ],
};

pub static ORGANIZATIONS: ContainerSchema = ContainerSchema {
    name: "VoMaOrganizations",
    columns: &[
        Column::indexed("id", String),
        Column::indexed("name", String),
        Column::new("websiteUrl", String),
        Column::indexed("adminUserId", String),
    ],
};

pub static ORGANIZATION_MEMBERS: ContainerSchema = ContainerSchema {
    name: "VoMaOrganizationMembers",
    columns: &[
        Column::indexed("id", String),
        Column::indexed("userId", String),
        Column::indexed("orgId", String),
        Column::new("memberRole", String),
    ],
};

pub static OPPORTUNITIES: ContainerSchema = ContainerSchema {
    name: "VoMaOpportunities",
    columns: &[
        Column::indexed("id", String),
        Column::indexed("title", String),
        Column::new("description", String),
        Column::new("address", String),
        Column::new("startTime", Timestamp),
        Column::new("endTime", Timestamp),
        Column::new("slotsTotal", Long),
        Column::indexed("orgId", String),
    ],
};

pub static OPPORTUNITY_REQUIREMENTS: ContainerSchema = ContainerSchema {
    name: "VoMaOpportunityRequirements",
    columns: &[
        Column::new("id", String),
        Column::indexed("opportunityId", String),
        Column::indexed("skillId", String),
        Column::new("isMandatory", Bool),
    ],
};

pub static SKILLS: ContainerSchema = ContainerSchema {
    name: "VoMaSkills",
    columns: &[Column::indexed("id", String), Column::indexed("name", String)],
};

pub static VOLUNTEER_SKILLS: ContainerSchema = ContainerSchema {
    name: "VoMaVolunteerSkills",
    columns: &[
        Column::indexed("id", String),
        Column::indexed("userId", String),
        Column::indexed("skillId", String),
        Column::new("expiryDate", Timestamp),
        Column::new("verificationStatus", String),
    ],
};

pub static REGISTRATIONS: ContainerSchema = ContainerSchema {
    name: "VoMaRegistrations",
    columns: &[
        Column::indexed("id", String),
        Column::indexed("userId", String),
        Column::indexed("opportunityId", String),
        Column::new("status", String),
        Column::new("registrationTime", Timestamp),
    ],
};

/// Every container, in provisioning order.
pub static ALL: [&ContainerSchema; 8] = [
    &USERS,
    &SKILLS,
    &ORGANIZATIONS,
    &ORGANIZATION_MEMBERS,
    &OPPORTUNITIES,
    &OPPORTUNITY_REQUIREMENTS,
    &REGISTRATIONS,
    &VOLUNTEER_SKILLS,
];
