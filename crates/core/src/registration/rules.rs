//! Pure eligibility checks, each answering one question about data the
//! caller has already read.

use std::collections::HashSet;

use crate::domain::{OpportunityRequirement, Registration, RegistrationStatus};

use super::RegistrationError;

/// Fails if any registration already exists for the pair.
pub fn ensure_not_registered(
    existing: Option<&Registration>,
    user_id: &str,
    opportunity_id: &str,
) -> Result<(), RegistrationError> {
    match existing {
        Some(_) => Err(RegistrationError::AlreadyRegistered {
            user_id: user_id.to_string(),
            opportunity_id: opportunity_id.to_string(),
        }),
        None => Ok(()),
    }
}

/// Fails unless `registered_count` is strictly below the slot total.
///
/// An opportunity without a slot total has no capacity.
pub fn ensure_capacity(
    opportunity_id: &str,
    slots_total: Option<i64>,
    registered_count: i64,
) -> Result<(), RegistrationError> {
    match slots_total {
        Some(total) if registered_count < total => Ok(()),
        _ => Err(RegistrationError::SlotsFull {
            opportunity_id: opportunity_id.to_string(),
            slots_total,
            registered_count,
        }),
    }
}

/// The first mandatory requirement, in list order, whose skill the user
/// does not hold. Optional requirements are never considered.
pub fn first_missing_mandatory<'a>(
    requirements: &'a [OpportunityRequirement],
    held_skill_ids: &HashSet<&str>,
) -> Option<&'a OpportunityRequirement> {
    requirements
        .iter()
        .filter(|requirement| requirement.is_mandatory())
        .find(|requirement| !held_skill_ids.contains(requirement.skill_id.as_str()))
}

/// Checks a status change against the registration lifecycle.
pub fn ensure_transition(
    registration: &Registration,
    target: RegistrationStatus,
) -> Result<(), RegistrationError> {
    match registration.status {
        Some(current) if current.can_transition_to(target) => Ok(()),
        current => Err(RegistrationError::InvalidTransition {
            id: registration.id.clone(),
            from: current.map_or_else(|| "UNSET".to_string(), |s| s.to_string()),
            to: target,
        }),
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    #[test]
    fn test_existing_registration_is_rejected() {
        let existing = Registration::pending("usr_1", "opp_1", Utc::now());

        assert_eq!(ensure_not_registered(None, "usr_1", "opp_1"), Ok(()));
        assert_eq!(
            ensure_not_registered(Some(&existing), "usr_1", "opp_1"),
            Err(RegistrationError::AlreadyRegistered {
                user_id: "usr_1".to_string(),
                opportunity_id: "opp_1".to_string(),
            })
        );
    }

    #[test]
    fn test_capacity_boundary() {
        assert_eq!(ensure_capacity("opp_1", Some(2), 1), Ok(()));
        assert_eq!(
            ensure_capacity("opp_1", Some(2), 2),
            Err(RegistrationError::SlotsFull {
                opportunity_id: "opp_1".to_string(),
                slots_total: Some(2),
                registered_count: 2,
            })
        );
        assert!(ensure_capacity("opp_1", Some(0), 0).is_err());
    }

    #[test]
    fn test_missing_slot_total_means_no_capacity() {
        assert!(matches!(
            ensure_capacity("opp_1", None, 0),
            Err(RegistrationError::SlotsFull {
                slots_total: None,
                ..
            })
        ));
    }

    #[test]
    fn test_first_missing_mandatory_skips_optional() {
        let requirements = vec![
            OpportunityRequirement::optional("opp_1", "sk_opt"),
            OpportunityRequirement::mandatory("opp_1", "sk_a"),
            OpportunityRequirement::mandatory("opp_1", "sk_b"),
        ];

        let held: HashSet<&str> = ["sk_a"].into_iter().collect();
        let missing = first_missing_mandatory(&requirements, &held).unwrap();
        assert_eq!(missing.skill_id, "sk_b");

        let held: HashSet<&str> = ["sk_a", "sk_b"].into_iter().collect();
        assert!(first_missing_mandatory(&requirements, &held).is_none());
    }

    #[test]
    fn test_first_missing_mandatory_respects_list_order() {
        let requirements = vec![
            OpportunityRequirement::mandatory("opp_1", "sk_z"),
            OpportunityRequirement::mandatory("opp_1", "sk_a"),
        ];
        let held = HashSet::new();

        let missing = first_missing_mandatory(&requirements, &held).unwrap();
        assert_eq!(missing.skill_id, "sk_z");
    }

    #[test]
    fn test_only_pending_registrations_transition() {
        let mut registration = Registration::pending("usr_1", "opp_1", Utc::now());
        registration.id = "reg_1".to_string();
        assert!(ensure_transition(&registration, RegistrationStatus::Approved).is_ok());

        registration.status = Some(RegistrationStatus::Approved);
        assert_eq!(
            ensure_transition(&registration, RegistrationStatus::Cancelled),
            Err(RegistrationError::InvalidTransition {
                id: "reg_1".to_string(),
                from: "APPROVED".to_string(),
                to: RegistrationStatus::Cancelled,
            })
        );

        registration.status = None;
        assert!(matches!(
            ensure_transition(&registration, RegistrationStatus::Approved),
            Err(RegistrationError::InvalidTransition { ref from, .. }) if from == "UNSET"
        ));
    }
}
