//! Event domain model and audit log entries.
//!
//! # Responsibility
//! - Define the persisted event shape and the value snapshots compared by
//!   the change auditor.
//!
//! # Invariants
//! - `logs` only ever grows; existing entries are never rewritten.
//! - `version` starts at 1 and increases by one on every persisted update.
//! - `profile_ids` keeps participant order as given by the caller.

use crate::model::profile::{Profile, ProfileId};
use crate::timezone::ZoneId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of an event.
pub type EventId = Uuid;

/// Message of the seed entry written when an event is created.
pub const CREATED_LOG_MESSAGE: &str = "Event created";

/// One immutable audit record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl LogEntry {
    pub fn new(message: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            message: message.into(),
            timestamp,
        }
    }
}

/// Persisted event record with profile references only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub profile_ids: Vec<ProfileId>,
    pub timezone: ZoneId,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub logs: Vec<LogEntry>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Optimistic concurrency token checked by `replace_event`.
    pub version: i64,
}

impl Event {
    /// Builds a new, not yet persisted event with the creation seed log.
    pub fn new(
        profile_ids: Vec<ProfileId>,
        timezone: ZoneId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            profile_ids,
            timezone,
            start,
            end,
            logs: vec![LogEntry::new(CREATED_LOG_MESSAGE, now)],
            created_at: now,
            updated_at: now,
            version: 1,
        }
    }
}

/// Event returned to callers, with participants expanded to full profiles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    pub id: EventId,
    pub profiles: Vec<Profile>,
    pub timezone: ZoneId,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub logs: Vec<LogEntry>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub version: i64,
}

impl EventRecord {
    /// Expands `event` with `profiles`, which must follow `event.profile_ids` order.
    pub fn from_parts(event: Event, profiles: Vec<Profile>) -> Self {
        Self {
            id: event.id,
            profiles,
            timezone: event.timezone,
            start: event.start,
            end: event.end,
            logs: event.logs,
            created_at: event.created_at,
            updated_at: event.updated_at,
            version: event.version,
        }
    }

    /// Participant names in stored order.
    pub fn profile_names(&self) -> Vec<&str> {
        self.profiles.iter().map(|profile| profile.name.as_str()).collect()
    }

    /// Value snapshot used as the "previous" side of a diff.
    pub fn snapshot(&self) -> EventSnapshot {
        EventSnapshot {
            timezone: self.timezone,
            start: self.start,
            end: self.end,
            profile_names: self
                .profiles
                .iter()
                .map(|profile| profile.name.clone())
                .collect(),
        }
    }
}

/// Complete comparable state of an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventSnapshot {
    pub timezone: ZoneId,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Participant names in the order of the event's id list.
    pub profile_names: Vec<String>,
}

/// Normalized proposed state; `None` means "unchanged", never "cleared".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventPatch {
    pub timezone: Option<ZoneId>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub profile_names: Option<Vec<String>>,
}
