use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::activity::{classify_activity, Activity};
use crate::models::Contact;
use crate::vocab::{
    Faculty, Hub, ALUMNI_PROPERTY, ALUMNI_TAG, CURRENT_UOS_PROPERTY, CURRENT_UOS_TAG,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedContact {
    pub email: String,
    /// Declaration order, no duplicates.
    pub faculties: Vec<Faculty>,
    pub hubs: Vec<Hub>,
    pub is_current: bool,
    pub is_alumni: bool,
    pub activity: Activity,
}

impl ClassifiedContact {
    pub fn is_active(&self) -> bool {
        self.activity.is_active()
    }

    pub fn in_faculty(&self, faculty: Faculty) -> bool {
        self.faculties.contains(&faculty)
    }

    pub fn in_hub(&self, hub: Hub) -> bool {
        self.hubs.contains(&hub)
    }
}

/// Smart-group tags decide every dimension. A contact with no tags at all
/// is read from its custom properties instead.
pub fn classify(contact: &Contact, now: DateTime<Utc>) -> ClassifiedContact {
    let activity = classify_activity(contact.last_activity.as_deref(), now);

    if contact.membership_tags.is_empty() {
        return ClassifiedContact {
            email: contact.email.clone(),
            faculties: Faculty::ALL
                .into_iter()
                .filter(|faculty| is_truthy(contact.custom_property(faculty.label())))
                .collect(),
            hubs: Hub::ALL
                .into_iter()
                .filter(|hub| is_truthy(contact.custom_property(hub.label())))
                .collect(),
            is_current: is_yes(contact.custom_property(CURRENT_UOS_PROPERTY)),
            is_alumni: is_truthy(contact.custom_property(ALUMNI_PROPERTY)),
            activity,
        };
    }

    ClassifiedContact {
        email: contact.email.clone(),
        faculties: Faculty::ALL
            .into_iter()
            .filter(|faculty| contact.has_tag(faculty.tag()))
            .collect(),
        hubs: Hub::ALL
            .into_iter()
            .filter(|hub| contact.has_tag(hub.tag()))
            .collect(),
        is_current: contact.has_tag(CURRENT_UOS_TAG),
        is_alumni: contact.has_tag(ALUMNI_TAG),
        activity,
    }
}

/// Classifies a fetched batch, dropping contacts without an email and
/// repeats of an email already seen.
pub fn classify_batch(contacts: &[Contact], now: DateTime<Utc>) -> Vec<ClassifiedContact> {
    let mut seen = HashSet::new();
    let mut classified = Vec::with_capacity(contacts.len());
    let mut skipped = 0usize;

    for contact in contacts {
        if !contact.has_email() || !seen.insert(contact.email.as_str()) {
            skipped += 1;
            continue;
        }
        classified.push(classify(contact, now));
    }

    if skipped > 0 {
        log::debug!("skipped {skipped} contacts without a unique email");
    }
    classified
}

fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(flag)) => *flag,
        Some(Value::String(text)) => text.trim().eq_ignore_ascii_case("true"),
        _ => false,
    }
}

fn is_yes(value: Option<&Value>) -> bool {
    match value {
        Some(Value::String(text)) => text.trim().eq_ignore_ascii_case("yes"),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, 1, 12, 0, 0).unwrap()
    }

    fn contact(value: Value) -> Contact {
        Contact::from_value(value)
    }

    #[test]
    fn reads_every_dimension_from_tags() {
        let classified = classify(
            &contact(json!({
                "email": "a@example.com",
                "smart_groups": [
                    "professional-services",
                    "fah-faculty-of-arts-humanities",
                    "future-cities",
                    "health-wellbeing",
                    "work-study-at-the-uos",
                    "alumni-of-the-uos",
                    "some-unrelated-group"
                ],
                "last_seen": "2026-05-20T00:00:00Z"
            })),
            now(),
        );

        assert_eq!(
            classified.faculties,
            vec![Faculty::ArtsHumanities, Faculty::ProfessionalServices]
        );
        assert_eq!(classified.hubs, vec![Hub::HealthWellbeing, Hub::FutureCities]);
        assert!(classified.is_current);
        assert!(classified.is_alumni);
        assert!(classified.is_active());
    }

    #[test]
    fn tags_win_over_custom_properties() {
        let classified = classify(
            &contact(json!({
                "email": "a@example.com",
                "smart_groups": ["future-cities"],
                "custom": {
                    "Do you currently work or study at the UoS?": "Yes",
                    "Alumni": true,
                    "Health & Wellbeing": "true"
                }
            })),
            now(),
        );
        assert_eq!(classified.hubs, vec![Hub::FutureCities]);
        assert!(!classified.is_current);
        assert!(!classified.is_alumni);
        assert_eq!(classified.activity, Activity::Unknown);
    }

    #[test]
    fn untagged_contacts_fall_back_to_custom_properties() {
        let classified = classify(
            &contact(json!({
                "email": "a@example.com",
                "custom": {
                    "Do you currently work or study at the UoS?": "YES",
                    "Alumni": "True",
                    "FM (Faculty of Medicine)": true,
                    "Health & Wellbeing": "true",
                    "Future Cities": "false"
                }
            })),
            now(),
        );
        assert_eq!(classified.faculties, vec![Faculty::Medicine]);
        assert_eq!(classified.hubs, vec![Hub::HealthWellbeing]);
        assert!(classified.is_current);
        assert!(classified.is_alumni);
    }

    #[test]
    fn untagged_contact_without_properties_has_no_memberships() {
        let classified = classify(&contact(json!({"email": "a@example.com"})), now());
        assert!(classified.faculties.is_empty());
        assert!(classified.hubs.is_empty());
        assert!(!classified.is_current);
        assert!(!classified.is_alumni);
        assert!(!classified.is_active());
    }

    #[test]
    fn batch_drops_missing_and_repeated_emails() {
        let contacts = vec![
            contact(json!({"email": "A@Example.com", "smart_groups": ["future-cities"]})),
            contact(json!({"email": ""})),
            contact(json!({"id": "no-email"})),
            contact(json!({"email": "a@example.com", "smart_groups": ["health-wellbeing"]})),
            contact(json!({"email": "b@example.com"})),
        ];

        let classified = classify_batch(&contacts, now());
        let emails: Vec<&str> = classified.iter().map(|c| c.email.as_str()).collect();
        assert_eq!(emails, vec!["a@example.com", "b@example.com"]);
        assert_eq!(classified[0].hubs, vec![Hub::FutureCities]);
    }
}
