//! Repository contracts and SQLite implementations.
//!
//! # Responsibility
//! - Define storage contracts for profiles and events.
//! - Keep SQL and row decoding inside the persistence boundary.
//!
//! # Invariants
//! - Read paths reject invalid persisted state instead of masking it.
//! - Repository APIs return semantic errors (`*NotFound`, `DuplicateName`,
//!   `VersionConflict`) alongside transport errors.

pub mod event_repo;
pub mod profile_repo;

use crate::db::DbError;
use crate::model::event::EventId;
use crate::model::profile::ProfileId;
use chrono::{DateTime, Utc};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub type RepoResult<T> = Result<T, RepoError>;

/// Persistence and query failures shared by all repositories.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    ProfileNotFound(ProfileId),
    EventNotFound(EventId),
    /// A profile with this exact name already exists.
    DuplicateName(String),
    /// Stored version moved past the one the write was based on.
    VersionConflict {
        event_id: EventId,
        expected_version: i64,
    },
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::ProfileNotFound(id) => write!(f, "profile not found: {id}"),
            Self::EventNotFound(id) => write!(f, "event not found: {id}"),
            Self::DuplicateName(name) => write!(f, "profile name already exists: `{name}`"),
            Self::VersionConflict {
                event_id,
                expected_version,
            } => write!(
                f,
                "event {event_id} changed since version {expected_version}"
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

pub(crate) fn parse_uuid(value: &str, column: &str) -> RepoResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid `{value}` in {column}")))
}

pub(crate) fn to_epoch_ms(instant: DateTime<Utc>) -> i64 {
    instant.timestamp_millis()
}

pub(crate) fn from_epoch_ms(value: i64, column: &str) -> RepoResult<DateTime<Utc>> {
    DateTime::from_timestamp_millis(value).ok_or_else(|| {
        RepoError::InvalidData(format!("timestamp `{value}` out of range in {column}"))
    })
}

/// Current time truncated to the millisecond precision kept in storage.
pub fn storage_now() -> DateTime<Utc> {
    let now = Utc::now();
    DateTime::from_timestamp_millis(now.timestamp_millis()).unwrap_or(now)
}
