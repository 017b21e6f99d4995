use std::fmt;

use serde::{Deserialize, Serialize};

/// An enumeration stored in the store as its exact upper-case literal.
pub trait EnumLiteral: Sized + Copy + 'static {
    /// Every variant, in declaration order.
    const VARIANTS: &'static [Self];

    /// The literal written to the store.
    fn as_str(&self) -> &'static str;

    /// Case-sensitive exact match against the known literals.
    fn from_literal(literal: &str) -> Option<Self> {
        Self::VARIANTS
            .iter()
            .copied()
            .find(|variant| variant.as_str() == literal)
    }
}

/// Role of a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Volunteer,
    Admin,
    Organizer,
}

impl EnumLiteral for UserRole {
    const VARIANTS: &'static [Self] = &[Self::Volunteer, Self::Admin, Self::Organizer];

    fn as_str(&self) -> &'static str {
        match self {
            Self::Volunteer => "VOLUNTEER",
            Self::Admin => "ADMIN",
            Self::Organizer => "ORGANIZER",
        }
    }
}

/// Role of a user inside an organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MemberRole {
    Admin,
    Member,
}

impl EnumLiteral for MemberRole {
    const VARIANTS: &'static [Self] = &[Self::Admin, Self::Member];

    fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::Member => "MEMBER",
        }
    }
}

/// Verification state of a skill a volunteer claims to hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerificationStatus {
    Pending,
    Verified,
    Rejected,
}

impl EnumLiteral for VerificationStatus {
    const VARIANTS: &'static [Self] = &[Self::Pending, Self::Verified, Self::Rejected];

    fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Verified => "VERIFIED",
            Self::Rejected => "REJECTED",
        }
    }
}

/// Lifecycle state of a registration.
///
/// The only legal transitions are `Pending -> Approved` and
/// `Pending -> Cancelled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RegistrationStatus {
    Pending,
    Approved,
    Cancelled,
}

impl RegistrationStatus {
    /// Returns true if a registration in this state may move to `target`.
    pub fn can_transition_to(self, target: RegistrationStatus) -> bool {
        matches!(
            (self, target),
            (Self::Pending, Self::Approved) | (Self::Pending, Self::Cancelled)
        )
    }
}

impl EnumLiteral for RegistrationStatus {
    const VARIANTS: &'static [Self] = &[Self::Pending, Self::Approved, Self::Cancelled];

    fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Approved => "APPROVED",
            Self::Cancelled => "CANCELLED",
        }
    }
}

macro_rules! display_as_literal {
    ($($ty:ty),+) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.as_str())
                }
            }
        )+
    };
}

display_as_literal!(UserRole, MemberRole, VerificationStatus, RegistrationStatus);
