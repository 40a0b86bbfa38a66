use chrono::{Duration, TimeZone, Utc};
use eventbook_core::db::open_db_in_memory;
use eventbook_core::{
    Event, EventRepository, LogEntry, Profile, ProfileRepository, RepoError,
    SqliteEventRepository, SqliteProfileRepository, ZoneId, CREATED_LOG_MESSAGE,
};
use rusqlite::Connection;
use uuid::Uuid;

fn insert_profile(conn: &Connection, name: &str) -> Profile {
    let profile = Profile::new(name);
    SqliteProfileRepository::new(conn)
        .insert_profile(&profile)
        .unwrap();
    profile
}

fn sample_event(profiles: &[&Profile], created_offset_ms: i64) -> Event {
    let created = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap()
        + Duration::milliseconds(created_offset_ms);
    Event::new(
        profiles.iter().map(|profile| profile.id).collect(),
        ZoneId::parse("Asia/Kolkata").unwrap(),
        Utc.with_ymd_and_hms(2024, 3, 10, 3, 30, 0).unwrap(),
        Utc.with_ymd_and_hms(2024, 3, 10, 4, 30, 0).unwrap(),
        created,
    )
}

#[test]
fn insert_and_get_roundtrip_keeps_participant_order_and_seed_log() {
    let conn = open_db_in_memory().unwrap();
    let bob = insert_profile(&conn, "Bob");
    let alice = insert_profile(&conn, "Alice");
    let repo = SqliteEventRepository::new(&conn);

    let event = sample_event(&[&bob, &alice], 0);
    repo.insert_event(&event).unwrap();

    let loaded = repo.get_event(event.id).unwrap().unwrap();
    assert_eq!(loaded, event);
    assert_eq!(loaded.profile_ids, vec![bob.id, alice.id]);
    assert_eq!(loaded.logs.len(), 1);
    assert_eq!(loaded.logs[0].message, CREATED_LOG_MESSAGE);
    assert_eq!(loaded.version, 1);
}

#[test]
fn get_unknown_event_returns_none() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEventRepository::new(&conn);
    assert!(repo.get_event(Uuid::new_v4()).unwrap().is_none());
}

#[test]
fn replace_appends_new_logs_and_bumps_version() {
    let conn = open_db_in_memory().unwrap();
    let alice = insert_profile(&conn, "Alice");
    let bob = insert_profile(&conn, "Bob");
    let repo = SqliteEventRepository::new(&conn);
    let event = sample_event(&[&alice], 0);
    repo.insert_event(&event).unwrap();

    let mut next = repo.get_event(event.id).unwrap().unwrap();
    next.profile_ids = vec![bob.id, alice.id];
    next.logs
        .push(LogEntry::new("Profiles changed to: Bob, Alice", next.updated_at));
    let version = repo.replace_event(&next).unwrap();
    assert_eq!(version, 2);

    let loaded = repo.get_event(event.id).unwrap().unwrap();
    assert_eq!(loaded.version, 2);
    assert_eq!(loaded.profile_ids, vec![bob.id, alice.id]);
    let messages: Vec<&str> = loaded.logs.iter().map(|log| log.message.as_str()).collect();
    assert_eq!(
        messages,
        vec![CREATED_LOG_MESSAGE, "Profiles changed to: Bob, Alice"]
    );
}

#[test]
fn replace_with_stale_version_conflicts_and_changes_nothing() {
    let conn = open_db_in_memory().unwrap();
    let alice = insert_profile(&conn, "Alice");
    let repo = SqliteEventRepository::new(&conn);
    let event = sample_event(&[&alice], 0);
    repo.insert_event(&event).unwrap();

    let first_reader = repo.get_event(event.id).unwrap().unwrap();
    let mut second_reader = first_reader.clone();

    let mut winner = first_reader;
    winner.timezone = ZoneId::parse("Europe/Paris").unwrap();
    repo.replace_event(&winner).unwrap();

    second_reader.timezone = ZoneId::parse("America/New_York").unwrap();
    second_reader
        .logs
        .push(LogEntry::new("Timezone changed to: America/New_York", Utc::now()));
    let err = repo.replace_event(&second_reader).unwrap_err();
    assert!(matches!(
        err,
        RepoError::VersionConflict { event_id, expected_version: 1 } if event_id == event.id
    ));

    let stored = repo.get_event(event.id).unwrap().unwrap();
    assert_eq!(stored.timezone.name(), "Europe/Paris");
    assert_eq!(stored.logs.len(), 1);
    assert_eq!(stored.version, 2);
}

#[test]
fn replace_refuses_to_drop_stored_logs() {
    let conn = open_db_in_memory().unwrap();
    let alice = insert_profile(&conn, "Alice");
    let repo = SqliteEventRepository::new(&conn);
    let event = sample_event(&[&alice], 0);
    repo.insert_event(&event).unwrap();

    let mut truncated = repo.get_event(event.id).unwrap().unwrap();
    truncated.logs.clear();
    let err = repo.replace_event(&truncated).unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));

    let stored = repo.get_event(event.id).unwrap().unwrap();
    assert_eq!(stored.version, 1);
    assert_eq!(stored.logs.len(), 1);
}

#[test]
fn replace_and_delete_unknown_event_report_not_found() {
    let conn = open_db_in_memory().unwrap();
    let alice = insert_profile(&conn, "Alice");
    let repo = SqliteEventRepository::new(&conn);
    let ghost = sample_event(&[&alice], 0);

    assert!(matches!(
        repo.replace_event(&ghost).unwrap_err(),
        RepoError::EventNotFound(id) if id == ghost.id
    ));
    assert!(matches!(
        repo.delete_event(ghost.id).unwrap_err(),
        RepoError::EventNotFound(id) if id == ghost.id
    ));
}

#[test]
fn delete_removes_event_with_its_links_and_logs() {
    let conn = open_db_in_memory().unwrap();
    let alice = insert_profile(&conn, "Alice");
    let repo = SqliteEventRepository::new(&conn);
    let event = sample_event(&[&alice], 0);
    repo.insert_event(&event).unwrap();

    repo.delete_event(event.id).unwrap();

    assert!(repo.get_event(event.id).unwrap().is_none());
    let leftovers: i64 = conn
        .query_row(
            "SELECT (SELECT COUNT(*) FROM event_logs) + (SELECT COUNT(*) FROM event_profiles);",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(leftovers, 0);
}

#[test]
fn list_for_profile_filters_membership_and_orders_newest_first() {
    let conn = open_db_in_memory().unwrap();
    let alice = insert_profile(&conn, "Alice");
    let bob = insert_profile(&conn, "Bob");
    let repo = SqliteEventRepository::new(&conn);

    let oldest = sample_event(&[&alice], 0);
    let bobs_only = sample_event(&[&bob], 1_000);
    let newest = sample_event(&[&bob, &alice], 2_000);
    let same_instant = sample_event(&[&alice], 2_000);
    for event in [&oldest, &bobs_only, &newest, &same_instant] {
        repo.insert_event(event).unwrap();
    }

    let listed: Vec<Uuid> = repo
        .list_events_for_profile(alice.id)
        .unwrap()
        .into_iter()
        .map(|event| event.id)
        .collect();
    assert_eq!(listed, vec![same_instant.id, newest.id, oldest.id]);

    assert!(repo
        .list_events_for_profile(Uuid::new_v4())
        .unwrap()
        .is_empty());
}
