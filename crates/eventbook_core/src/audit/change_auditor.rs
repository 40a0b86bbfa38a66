//! Diff of an event snapshot against a proposed patch.
//!
//! Participants are compared as the joined name string in each side's own
//! order, so a pure reorder of the same profiles counts as a change.

use crate::model::event::{EventPatch, EventSnapshot, LogEntry};
use chrono::{DateTime, Utc};

pub const TIMEZONE_CHANGED_PREFIX: &str = "Timezone changed to: ";
pub const START_UPDATED_MESSAGE: &str = "Start date/time updated";
pub const END_UPDATED_MESSAGE: &str = "End date/time updated";
pub const PROFILES_CHANGED_PREFIX: &str = "Profiles changed to: ";
pub const PROFILE_NAME_SEPARATOR: &str = ", ";

/// Computes the audit entries describing how `proposed` changes `previous`.
///
/// Every entry is stamped with `at`. Fields absent from `proposed` are
/// unchanged and produce nothing.
pub fn diff(previous: &EventSnapshot, proposed: &EventPatch, at: DateTime<Utc>) -> Vec<LogEntry> {
    let mut messages = Vec::new();

    if let Some(timezone) = proposed.timezone {
        if timezone != previous.timezone {
            messages.push(format!("{TIMEZONE_CHANGED_PREFIX}{timezone}"));
        }
    }

    // DateTime equality compares the absolute instant.
    if proposed.start.is_some_and(|start| start != previous.start) {
        messages.push(START_UPDATED_MESSAGE.to_string());
    }
    if proposed.end.is_some_and(|end| end != previous.end) {
        messages.push(END_UPDATED_MESSAGE.to_string());
    }

    if let Some(names) = proposed.profile_names.as_deref() {
        let joined_new = names.join(PROFILE_NAME_SEPARATOR);
        if joined_new != previous.profile_names.join(PROFILE_NAME_SEPARATOR) {
            messages.push(format!("{PROFILES_CHANGED_PREFIX}{joined_new}"));
        }
    }

    messages
        .into_iter()
        .map(|message| LogEntry::new(message, at))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::diff;
    use crate::model::event::{EventPatch, EventSnapshot};
    use crate::timezone::ZoneId;
    use chrono::{TimeZone, Utc};

    fn snapshot() -> EventSnapshot {
        EventSnapshot {
            timezone: ZoneId::parse("Asia/Kolkata").unwrap(),
            start: Utc.with_ymd_and_hms(2024, 3, 10, 3, 30, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2024, 3, 10, 4, 30, 0).unwrap(),
            profile_names: vec!["Alice".to_string(), "Bob".to_string()],
        }
    }

    #[test]
    fn same_instant_in_another_offset_is_not_a_change() {
        let previous = snapshot();
        let same_start = previous
            .start
            .with_timezone(&chrono::FixedOffset::east_opt(5 * 3600).unwrap())
            .with_timezone(&Utc);
        let patch = EventPatch {
            start: Some(same_start),
            ..EventPatch::default()
        };
        assert!(diff(&previous, &patch, Utc::now()).is_empty());
    }

    #[test]
    fn entries_are_stamped_with_the_given_instant() {
        let previous = snapshot();
        let at = Utc.with_ymd_and_hms(2024, 4, 1, 12, 0, 0).unwrap();
        let patch = EventPatch {
            end: Some(at),
            ..EventPatch::default()
        };
        let entries = diff(&previous, &patch, at);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].timestamp, at);
    }
}
