//! Event repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist whole events (row, ordered participants, audit log) as one unit.
//! - Guard concurrent updates with a compare-and-swap on `version`.
//!
//! # Invariants
//! - Participant order is kept through `event_profiles.position`.
//! - Audit entries are only appended; stored entries are never rewritten.
//! - Listing order is `created_at DESC`, newest insert first on ties.

use crate::model::event::{Event, EventId, LogEntry};
use crate::model::profile::ProfileId;
use crate::repo::{from_epoch_ms, parse_uuid, to_epoch_ms, RepoError, RepoResult};
use crate::timezone::ZoneId;
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};

const EVENT_SELECT_SQL: &str = "SELECT
    id,
    timezone,
    start_at,
    end_at,
    created_at,
    updated_at,
    version
FROM events";

/// Storage contract behind the event service.
pub trait EventRepository {
    fn insert_event(&self, event: &Event) -> RepoResult<EventId>;
    fn get_event(&self, id: EventId) -> RepoResult<Option<Event>>;
    /// Replaces the stored entity if its version still equals `event.version`.
    ///
    /// Returns the new version. Log entries beyond the stored tail are appended.
    fn replace_event(&self, event: &Event) -> RepoResult<i64>;
    fn delete_event(&self, id: EventId) -> RepoResult<()>;
    fn list_events_for_profile(&self, profile_id: ProfileId) -> RepoResult<Vec<Event>>;
}

/// SQLite-backed event repository.
pub struct SqliteEventRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEventRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl EventRepository for SqliteEventRepository<'_> {
    fn insert_event(&self, event: &Event) -> RepoResult<EventId> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        tx.execute(
            "INSERT INTO events (
                id,
                timezone,
                start_at,
                end_at,
                created_at,
                updated_at,
                version
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                event.id.to_string(),
                event.timezone.name(),
                to_epoch_ms(event.start),
                to_epoch_ms(event.end),
                to_epoch_ms(event.created_at),
                to_epoch_ms(event.updated_at),
                event.version,
            ],
        )?;
        write_participants(&tx, event)?;
        append_logs(&tx, event.id, &event.logs, 0)?;
        tx.commit()?;

        Ok(event.id)
    }

    fn get_event(&self, id: EventId) -> RepoResult<Option<Event>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{EVENT_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        match rows.next()? {
            Some(row) => Ok(Some(load_event(self.conn, row)?)),
            None => Ok(None),
        }
    }

    fn replace_event(&self, event: &Event) -> RepoResult<i64> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let changed = tx.execute(
            "UPDATE events
             SET
                timezone = ?2,
                start_at = ?3,
                end_at = ?4,
                updated_at = ?5,
                version = version + 1
             WHERE id = ?1
               AND version = ?6;",
            params![
                event.id.to_string(),
                event.timezone.name(),
                to_epoch_ms(event.start),
                to_epoch_ms(event.end),
                to_epoch_ms(event.updated_at),
                event.version,
            ],
        )?;

        if changed == 0 {
            let exists = tx
                .query_row(
                    "SELECT 1 FROM events WHERE id = ?1;",
                    [event.id.to_string()],
                    |_| Ok(()),
                )
                .optional()?
                .is_some();
            return Err(if exists {
                RepoError::VersionConflict {
                    event_id: event.id,
                    expected_version: event.version,
                }
            } else {
                RepoError::EventNotFound(event.id)
            });
        }

        let stored_logs: i64 = tx.query_row(
            "SELECT COUNT(*) FROM event_logs WHERE event_id = ?1;",
            [event.id.to_string()],
            |row| row.get(0),
        )?;
        let stored_logs = usize::try_from(stored_logs)
            .map_err(|_| RepoError::InvalidData(format!("negative log count {stored_logs}")))?;
        if event.logs.len() < stored_logs {
            return Err(RepoError::InvalidData(format!(
                "event {} would drop audit entries ({} stored, {} given)",
                event.id,
                stored_logs,
                event.logs.len()
            )));
        }

        tx.execute(
            "DELETE FROM event_profiles WHERE event_id = ?1;",
            [event.id.to_string()],
        )?;
        write_participants(&tx, event)?;
        append_logs(&tx, event.id, &event.logs[stored_logs..], stored_logs)?;
        tx.commit()?;

        Ok(event.version + 1)
    }

    fn delete_event(&self, id: EventId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM events WHERE id = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::EventNotFound(id));
        }
        Ok(())
    }

    fn list_events_for_profile(&self, profile_id: ProfileId) -> RepoResult<Vec<Event>> {
        let mut stmt = self.conn.prepare(&format!(
            "{EVENT_SELECT_SQL}
             WHERE id IN (
                SELECT event_id FROM event_profiles WHERE profile_id = ?1
             )
             ORDER BY created_at DESC, rowid DESC;"
        ))?;
        let mut rows = stmt.query([profile_id.to_string()])?;

        let mut events = Vec::new();
        while let Some(row) = rows.next()? {
            events.push(load_event(self.conn, row)?);
        }
        Ok(events)
    }
}

fn write_participants(tx: &Transaction<'_>, event: &Event) -> RepoResult<()> {
    let mut stmt = tx.prepare_cached(
        "INSERT INTO event_profiles (event_id, position, profile_id) VALUES (?1, ?2, ?3);",
    )?;
    for (position, profile_id) in (0_i64..).zip(event.profile_ids.iter()) {
        stmt.execute(params![
            event.id.to_string(),
            position,
            profile_id.to_string()
        ])?;
    }
    Ok(())
}

fn append_logs(
    tx: &Transaction<'_>,
    event_id: EventId,
    entries: &[LogEntry],
    first_seq: usize,
) -> RepoResult<()> {
    let mut stmt = tx.prepare_cached(
        "INSERT INTO event_logs (event_id, seq, message, logged_at) VALUES (?1, ?2, ?3, ?4);",
    )?;
    for (seq, entry) in (first_seq..).zip(entries) {
        let seq = i64::try_from(seq)
            .map_err(|_| RepoError::InvalidData(format!("log sequence {seq} overflows")))?;
        stmt.execute(params![
            event_id.to_string(),
            seq,
            entry.message.as_str(),
            to_epoch_ms(entry.timestamp),
        ])?;
    }
    Ok(())
}

fn load_event(conn: &Connection, row: &Row<'_>) -> RepoResult<Event> {
    let id_text: String = row.get("id")?;
    let id = parse_uuid(&id_text, "events.id")?;

    let zone_text: String = row.get("timezone")?;
    let timezone = ZoneId::parse(&zone_text).map_err(|_| {
        RepoError::InvalidData(format!("unknown zone `{zone_text}` in events.timezone"))
    })?;

    let version: i64 = row.get("version")?;
    if version < 1 {
        return Err(RepoError::InvalidData(format!(
            "invalid version `{version}` in events.version"
        )));
    }

    Ok(Event {
        id,
        profile_ids: load_participants(conn, &id_text)?,
        timezone,
        start: from_epoch_ms(row.get("start_at")?, "events.start_at")?,
        end: from_epoch_ms(row.get("end_at")?, "events.end_at")?,
        logs: load_logs(conn, &id_text)?,
        created_at: from_epoch_ms(row.get("created_at")?, "events.created_at")?,
        updated_at: from_epoch_ms(row.get("updated_at")?, "events.updated_at")?,
        version,
    })
}

fn load_participants(conn: &Connection, event_id: &str) -> RepoResult<Vec<ProfileId>> {
    let mut stmt = conn.prepare_cached(
        "SELECT profile_id FROM event_profiles WHERE event_id = ?1 ORDER BY position ASC;",
    )?;
    let mut rows = stmt.query([event_id])?;

    let mut ids = Vec::new();
    while let Some(row) = rows.next()? {
        let id_text: String = row.get(0)?;
        ids.push(parse_uuid(&id_text, "event_profiles.profile_id")?);
    }
    Ok(ids)
}

fn load_logs(conn: &Connection, event_id: &str) -> RepoResult<Vec<LogEntry>> {
    let mut stmt = conn.prepare_cached(
        "SELECT message, logged_at FROM event_logs WHERE event_id = ?1 ORDER BY seq ASC;",
    )?;
    let mut rows = stmt.query([event_id])?;

    let mut logs = Vec::new();
    while let Some(row) = rows.next()? {
        logs.push(LogEntry {
            message: row.get(0)?,
            timestamp: from_epoch_ms(row.get(1)?, "event_logs.logged_at")?,
        });
    }
    Ok(logs)
}
