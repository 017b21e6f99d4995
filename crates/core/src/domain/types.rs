use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use super::enums::{MemberRole, RegistrationStatus, UserRole, VerificationStatus};

// An empty `id` means "not assigned yet"; the repository fills it on create.

/// Truncates a timestamp to the millisecond precision the store keeps.
pub fn store_precision(ts: DateTime<Utc>) -> DateTime<Utc> {
    ts.trunc_subsecs(3)
}

/// A person using the system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    /// Unique across users.
    pub email: String,
    pub full_name: String,
    pub role: Option<UserRole>,
}

impl User {
    /// Creates a user without an id.
    pub fn new(email: impl Into<String>, full_name: impl Into<String>, role: UserRole) -> Self {
        Self {
            id: String::new(),
            email: email.into(),
            full_name: full_name.into(),
            role: Some(role),
        }
    }

    /// Sets a specific id for this user.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }
}

/// An organization that publishes opportunities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub id: String,
    pub name: String,
    pub website_url: Option<String>,
    /// The `User` administering this organization.
    pub admin_user_id: String,
}

impl Organization {
    /// Creates an organization without an id.
    pub fn new(name: impl Into<String>, admin_user_id: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
            website_url: None,
            admin_user_id: admin_user_id.into(),
        }
    }

    /// Sets the website URL.
    pub fn with_website_url(mut self, url: impl Into<String>) -> Self {
        self.website_url = Some(url.into());
        self
    }

    /// Sets a specific id for this organization.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }
}

/// Membership of a user in an organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationMember {
    pub id: String,
    pub user_id: String,
    pub org_id: String,
    pub member_role: Option<MemberRole>,
}

impl OrganizationMember {
    pub fn new(user_id: impl Into<String>, org_id: impl Into<String>, role: MemberRole) -> Self {
        Self {
            id: String::new(),
            user_id: user_id.into(),
            org_id: org_id.into(),
            member_role: Some(role),
        }
    }
}

/// A volunteering opportunity with a fixed number of slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Opportunity {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub address: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub slots_total: Option<i64>,
    pub org_id: String,
}

impl Opportunity {
    /// Creates an opportunity without an id, schedule or description.
    pub fn new(title: impl Into<String>, org_id: impl Into<String>, slots_total: i64) -> Self {
        Self {
            id: String::new(),
            title: title.into(),
            description: None,
            address: None,
            start_time: None,
            end_time: None,
            slots_total: Some(slots_total),
            org_id: org_id.into(),
        }
    }

    /// Sets a specific id for this opportunity.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Sets the start and end time.
    pub fn with_schedule(mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.start_time = Some(store_precision(start));
        self.end_time = Some(store_precision(end));
        self
    }
}

/// A skill an opportunity asks for, either mandatory or optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpportunityRequirement {
    /// Defaults to `<opportunityId>-<skillId>`.
    pub id: String,
    pub opportunity_id: String,
    pub skill_id: String,
    pub is_mandatory: Option<bool>,
}

impl OpportunityRequirement {
    pub fn mandatory(opportunity_id: impl Into<String>, skill_id: impl Into<String>) -> Self {
        Self::new(opportunity_id, skill_id, true)
    }

    pub fn optional(opportunity_id: impl Into<String>, skill_id: impl Into<String>) -> Self {
        Self::new(opportunity_id, skill_id, false)
    }

    fn new(opportunity_id: impl Into<String>, skill_id: impl Into<String>, mandatory: bool) -> Self {
        Self {
            id: String::new(),
            opportunity_id: opportunity_id.into(),
            skill_id: skill_id.into(),
            is_mandatory: Some(mandatory),
        }
    }

    /// A requirement counts as mandatory only when explicitly flagged so.
    pub fn is_mandatory(&self) -> bool {
        self.is_mandatory == Some(true)
    }
}

/// A named skill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    pub id: String,
    /// Unique across skills.
    pub name: String,
}

impl Skill {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }
}

/// A skill held by a volunteer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolunteerSkill {
    pub id: String,
    pub user_id: String,
    pub skill_id: String,
    pub expiry_date: Option<DateTime<Utc>>,
    pub verification_status: Option<VerificationStatus>,
    /// Not a stored column; filled in when read through the skills join.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub skill_name: Option<String>,
}

impl VolunteerSkill {
    pub fn new(user_id: impl Into<String>, skill_id: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            user_id: user_id.into(),
            skill_id: skill_id.into(),
            expiry_date: None,
            verification_status: Some(VerificationStatus::Pending),
            skill_name: None,
        }
    }

    pub fn with_expiry(mut self, expiry: DateTime<Utc>) -> Self {
        self.expiry_date = Some(store_precision(expiry));
        self
    }
}

/// A volunteer's registration for an opportunity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub id: String,
    pub user_id: String,
    pub opportunity_id: String,
    pub status: Option<RegistrationStatus>,
    pub registration_time: Option<DateTime<Utc>>,
}

impl Registration {
    /// A fresh PENDING registration stamped with `at`, truncated to
    /// milliseconds.
    pub fn pending(
        user_id: impl Into<String>,
        opportunity_id: impl Into<String>,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: String::new(),
            user_id: user_id.into(),
            opportunity_id: opportunity_id.into(),
            status: Some(RegistrationStatus::Pending),
            registration_time: Some(store_precision(at)),
        }
    }
}
