use chrono::{Duration, TimeZone, Utc};
use eventbook_core::audit::diff;
use eventbook_core::{EventPatch, EventSnapshot, ZoneId};
use proptest::prelude::*;

fn snapshot() -> EventSnapshot {
    EventSnapshot {
        timezone: ZoneId::parse("Asia/Kolkata").unwrap(),
        start: Utc.with_ymd_and_hms(2024, 3, 10, 3, 30, 0).unwrap(),
        end: Utc.with_ymd_and_hms(2024, 3, 10, 4, 30, 0).unwrap(),
        profile_names: vec!["Alice".to_string(), "Bob".to_string()],
    }
}

fn messages(previous: &EventSnapshot, patch: &EventPatch) -> Vec<String> {
    diff(previous, patch, Utc::now())
        .into_iter()
        .map(|entry| entry.message)
        .collect()
}

#[test]
fn empty_patch_yields_nothing() {
    assert!(messages(&snapshot(), &EventPatch::default()).is_empty());
}

#[test]
fn patch_equal_to_previous_yields_nothing() {
    let previous = snapshot();
    let patch = EventPatch {
        timezone: Some(previous.timezone),
        start: Some(previous.start),
        end: Some(previous.end),
        profile_names: Some(previous.profile_names.clone()),
    };
    assert!(messages(&previous, &patch).is_empty());
}

#[test]
fn each_field_uses_its_template() {
    let previous = snapshot();

    let zone_patch = EventPatch {
        timezone: Some(ZoneId::parse("America/New_York").unwrap()),
        ..EventPatch::default()
    };
    assert_eq!(
        messages(&previous, &zone_patch),
        vec!["Timezone changed to: America/New_York"]
    );

    let start_patch = EventPatch {
        start: Some(previous.start + Duration::minutes(15)),
        ..EventPatch::default()
    };
    assert_eq!(messages(&previous, &start_patch), vec!["Start date/time updated"]);

    let end_patch = EventPatch {
        end: Some(previous.end - Duration::minutes(1)),
        ..EventPatch::default()
    };
    assert_eq!(messages(&previous, &end_patch), vec!["End date/time updated"]);

    let profiles_patch = EventPatch {
        profile_names: Some(vec!["Carol".to_string()]),
        ..EventPatch::default()
    };
    assert_eq!(
        messages(&previous, &profiles_patch),
        vec!["Profiles changed to: Carol"]
    );
}

#[test]
fn reorder_of_same_profiles_counts_as_change() {
    let patch = EventPatch {
        profile_names: Some(vec!["Bob".to_string(), "Alice".to_string()]),
        ..EventPatch::default()
    };
    assert_eq!(
        messages(&snapshot(), &patch),
        vec!["Profiles changed to: Bob, Alice"]
    );
}

#[test]
fn all_fields_changed_keep_fixed_order() {
    let previous = snapshot();
    let patch = EventPatch {
        profile_names: Some(vec!["Dan".to_string()]),
        end: Some(previous.end + Duration::hours(1)),
        start: Some(previous.start + Duration::hours(1)),
        timezone: Some(ZoneId::parse("UTC").unwrap()),
    };
    assert_eq!(
        messages(&previous, &patch),
        vec![
            "Timezone changed to: UTC",
            "Start date/time updated",
            "End date/time updated",
            "Profiles changed to: Dan",
        ]
    );
}

#[test]
fn diff_is_idempotent_and_leaves_previous_alone() {
    let previous = snapshot();
    let before = previous.clone();
    let at = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
    let patch = EventPatch {
        timezone: Some(ZoneId::parse("Europe/Paris").unwrap()),
        profile_names: Some(vec!["Alice".to_string()]),
        ..EventPatch::default()
    };

    let first = diff(&previous, &patch, at);
    let second = diff(&previous, &patch, at);
    assert_eq!(first, second);
    assert_eq!(previous, before);
}

proptest! {
    #[test]
    fn single_changed_field_yields_exactly_one_entry(
        field in 0_usize..4,
        shift_minutes in 1_i64..10_000,
        name in "[A-Z][a-z]{1,8}",
    ) {
        let previous = snapshot();
        let patch = match field {
            0 => EventPatch {
                timezone: Some(ZoneId::parse("Europe/Oslo").unwrap()),
                ..EventPatch::default()
            },
            1 => EventPatch {
                start: Some(previous.start + Duration::minutes(shift_minutes)),
                ..EventPatch::default()
            },
            2 => EventPatch {
                end: Some(previous.end - Duration::minutes(shift_minutes)),
                ..EventPatch::default()
            },
            _ => EventPatch {
                profile_names: Some(vec![name.clone(), "Zoe".to_string()]),
                ..EventPatch::default()
            },
        };

        let entries = messages(&previous, &patch);
        prop_assert_eq!(entries.len(), 1);
        let expected_prefix = ["Timezone changed to: ", "Start date/time", "End date/time", "Profiles changed to: "][field];
        prop_assert!(entries[0].starts_with(expected_prefix));
    }
}
