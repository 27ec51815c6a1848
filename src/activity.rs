use chrono::{DateTime, Duration, Utc};

use crate::client::{EcosendClient, Transport};

/// Length of the trailing activity window.
pub const ACTIVITY_WINDOW_DAYS: i64 = 90;

/// Feed event names (matched case-insensitively as substrings) that count
/// as an email open.
const OPEN_EVENT_NAMES: [&str; 5] = [
    "email_open",
    "email opened",
    "broadcast opened",
    "opened_email",
    "open",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activity {
    Active,
    Inactive,
    /// No timestamp, or one that could not be read as an instant.
    Unknown,
}

impl Activity {
    pub fn is_active(self) -> bool {
        self == Activity::Active
    }
}

pub fn cutoff(now: DateTime<Utc>) -> DateTime<Utc> {
    now - Duration::days(ACTIVITY_WINDOW_DAYS)
}

/// The boundary instant itself counts as active.
pub fn classify_activity(last_activity: Option<&str>, now: DateTime<Utc>) -> Activity {
    let Some(raw) = last_activity else {
        return Activity::Unknown;
    };
    match parse_instant(raw) {
        Some(seen) if seen >= cutoff(now) => Activity::Active,
        Some(_) => Activity::Inactive,
        None => Activity::Unknown,
    }
}

/// Fallbacks for ISO 8601 forms RFC 3339 rejects: offsets without a colon
/// or without minutes, and times without seconds.
const ISO_OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f%#z", "%Y-%m-%dT%H:%M%#z"];

/// Timestamps must carry an offset; a bare trailing `Z` is UTC.
pub fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    let mut normalized = match raw.strip_suffix('Z').or_else(|| raw.strip_suffix('z')) {
        Some(stem) => format!("{stem}+00:00"),
        None => raw.to_string(),
    };
    // Date and time may be separated by a space or a lowercase `t`.
    if matches!(normalized.as_bytes().get(10), Some(b' ' | b't')) {
        normalized.replace_range(10..11, "T");
    }

    DateTime::parse_from_rfc3339(&normalized)
        .ok()
        .or_else(|| {
            ISO_OFFSET_FORMATS
                .iter()
                .find_map(|format| DateTime::parse_from_str(&normalized, format).ok())
        })
        .map(|instant| instant.with_timezone(&Utc))
}

pub fn is_open_event(name: &str) -> bool {
    let name = name.to_lowercase();
    OPEN_EVENT_NAMES.iter().any(|needle| name.contains(needle))
}

/// Scans a contact's `event` feed since `since` for an email open. A feed
/// that cannot be fetched counts as no activity.
pub fn feed_shows_open_activity<T: Transport>(
    client: &EcosendClient<T>,
    contact_id: &str,
    since: DateTime<Utc>,
) -> bool {
    let from = since.to_rfc3339();
    match client.fetch_contact_feed(contact_id, Some(&from), None, "event") {
        Ok(events) => events.iter().any(|event| is_open_event(&event.name)),
        Err(err) => {
            log::warn!("feed for contact {contact_id} unavailable, treating as inactive: {err}");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::tests::ScriptedTransport;
    use crate::error::ReportError;
    use chrono::TimeZone;
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, 1, 12, 0, 0).unwrap()
    }

    fn stamp(instant: DateTime<Utc>) -> String {
        instant.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    }

    #[test]
    fn window_boundary_is_inclusive() {
        let exactly = stamp(now() - Duration::days(90));
        let one_second_over = stamp(now() - Duration::days(90) - Duration::seconds(1));

        assert_eq!(classify_activity(Some(&exactly), now()), Activity::Active);
        assert_eq!(
            classify_activity(Some(&one_second_over), now()),
            Activity::Inactive
        );
    }

    #[test]
    fn offsets_are_respected() {
        // 13:00+02:00 is 11:00Z, one hour before the boundary.
        let before = "2026-03-03T13:00:00+02:00";
        assert_eq!(classify_activity(Some(before), now()), Activity::Inactive);

        let after = "2026-03-03T13:00:00-02:00";
        assert_eq!(classify_activity(Some(after), now()), Activity::Active);
    }

    #[test]
    fn fractional_seconds_and_lowercase_z_parse() {
        assert!(parse_instant("2026-05-30T08:15:30.123Z").is_some());
        assert!(parse_instant("2026-05-30T08:15:30z").is_some());
    }

    #[test]
    fn compact_and_hour_only_offsets_parse() {
        let expected = Utc.with_ymd_and_hms(2026, 5, 30, 8, 15, 30).unwrap();
        assert_eq!(parse_instant("2026-05-30T08:15:30+0000"), Some(expected));
        assert_eq!(parse_instant("2026-05-30T08:15:30+00"), Some(expected));
        assert_eq!(parse_instant("2026-05-30T10:45:30+0230"), Some(expected));
        assert_eq!(parse_instant("2026-05-30T06:15:30-02"), Some(expected));
    }

    #[test]
    fn times_without_seconds_parse() {
        let expected = Utc.with_ymd_and_hms(2026, 5, 30, 8, 15, 0).unwrap();
        assert_eq!(parse_instant("2026-05-30T08:15Z"), Some(expected));
        assert_eq!(parse_instant("2026-05-30T09:15+01:00"), Some(expected));
        assert_eq!(parse_instant("2026-05-30T09:15+0100"), Some(expected));
    }

    #[test]
    fn space_separated_timestamps_parse() {
        let expected = Utc.with_ymd_and_hms(2026, 5, 30, 8, 15, 30).unwrap();
        assert_eq!(parse_instant("2026-05-30 08:15:30+00:00"), Some(expected));
        assert_eq!(parse_instant("2026-05-30 08:15:30Z"), Some(expected));
    }

    #[test]
    fn compact_offset_counts_toward_the_window() {
        let recent = "2026-05-30T08:15:30+0000";
        assert_eq!(classify_activity(Some(recent), now()), Activity::Active);
    }

    #[test]
    fn unreadable_timestamps_are_unknown() {
        assert_eq!(classify_activity(None, now()), Activity::Unknown);
        assert_eq!(classify_activity(Some(""), now()), Activity::Unknown);
        assert_eq!(classify_activity(Some("yesterday"), now()), Activity::Unknown);
        assert_eq!(classify_activity(Some("1748779200"), now()), Activity::Unknown);
        // No offset: not comparable with the window.
        assert_eq!(
            classify_activity(Some("2026-05-30T08:15:30"), now()),
            Activity::Unknown
        );
        assert!(!Activity::Unknown.is_active());
        assert!(!Activity::Inactive.is_active());
    }

    #[test]
    fn open_event_names_match_loosely() {
        assert!(is_open_event("Email Opened"));
        assert!(is_open_event("BROADCAST OPENED"));
        assert!(is_open_event("email_open"));
        assert!(!is_open_event("Page View"));
        assert!(!is_open_event(""));
    }

    #[test]
    fn feed_with_open_event_is_active() {
        let transport = ScriptedTransport::new(vec![Ok(json!({
            "list": [{"name": "Page View"}, {"name": "Broadcast Opened"}]
        }))]);
        let client = EcosendClient::new(transport);
        assert!(feed_shows_open_activity(&client, "abc", cutoff(now())));
    }

    #[test]
    fn feed_errors_count_as_no_activity() {
        let transport = ScriptedTransport::new(vec![Err(ReportError::Status {
            endpoint: "people/abc/feed".to_string(),
            status: reqwest::StatusCode::NOT_FOUND,
        })]);
        let client = EcosendClient::new(transport);
        assert!(!feed_shows_open_activity(&client, "abc", cutoff(now())));
    }
}
