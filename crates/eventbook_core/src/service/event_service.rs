//! Event use-case service.
//!
//! # Responsibility
//! - Create, update, delete and list events on top of the profile directory,
//!   the zone codec, the change auditor and the event repository.
//!
//! # Invariants
//! - Every event has at least one participant.
//! - `start <= end` on create and on the merged state of an update.
//! - Update appends exactly the auditor's entries and writes through a
//!   version compare-and-swap; a stale snapshot fails with `Conflict`.
//! - Delete is not audited.

use crate::audit;
use crate::model::event::{Event, EventId, EventPatch, EventRecord};
use crate::model::profile::{Profile, ProfileId};
use crate::repo::event_repo::EventRepository;
use crate::repo::profile_repo::ProfileRepository;
use crate::repo::{storage_now, RepoError};
use crate::service::profile_directory::{trim_profile_name, ProfileDirectory, ProfileError};
use crate::timezone::{to_instant_in, TimeError, ZoneId};
use chrono::{DateTime, Utc};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// Wall-clock input as entered by a user: `YYYY-MM-DD` and `HH:MM`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WallClock {
    pub date: String,
    pub time: String,
}

impl WallClock {
    pub fn new(date: impl Into<String>, time: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            time: time.into(),
        }
    }
}

/// Input for [`EventService::create`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateEventRequest {
    pub profile_names: Vec<String>,
    pub timezone: String,
    pub start: WallClock,
    pub end: WallClock,
}

/// Input for [`EventService::update`]; `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateEventRequest {
    pub profile_names: Option<Vec<String>>,
    pub timezone: Option<String>,
    /// Interpreted in the proposed zone when one is given, else the stored zone.
    pub start: Option<WallClock>,
    pub end: Option<WallClock>,
}

/// Errors from event use-cases.
#[derive(Debug)]
pub enum EventServiceError {
    EventNotFound(EventId),
    InvalidZone(String),
    InvalidTime(String),
    /// Start lies after end.
    InvalidRange {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    /// No participant names left after trimming.
    EmptyProfiles,
    /// Another writer updated the event first.
    Conflict {
        event_id: EventId,
        expected_version: i64,
    },
    Profile(ProfileError),
    Repo(RepoError),
}

impl EventServiceError {
    /// Stable machine-readable kind for outer shells.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::EventNotFound(_) => "not_found",
            Self::InvalidZone(_) => "invalid_zone",
            Self::InvalidTime(_) => "invalid_time",
            Self::InvalidRange { .. } => "invalid_range",
            Self::EmptyProfiles => "empty_profiles",
            Self::Conflict { .. } => "conflict",
            Self::Profile(err) => err.error_code(),
            Self::Repo(_) => "storage",
        }
    }
}

impl Display for EventServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EventNotFound(id) => write!(f, "event not found: {id}"),
            Self::InvalidZone(value) => write!(f, "unknown time zone: `{value}`"),
            Self::InvalidTime(details) => write!(f, "invalid date/time: {details}"),
            Self::InvalidRange { start, end } => {
                write!(f, "event start {start} is after end {end}")
            }
            Self::EmptyProfiles => write!(f, "an event needs at least one profile"),
            Self::Conflict {
                event_id,
                expected_version,
            } => write!(
                f,
                "event {event_id} was modified concurrently (based on version {expected_version})"
            ),
            Self::Profile(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for EventServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Profile(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TimeError> for EventServiceError {
    fn from(value: TimeError) -> Self {
        match value {
            TimeError::InvalidZone(zone) => Self::InvalidZone(zone),
            TimeError::InvalidTime(details) => Self::InvalidTime(details),
        }
    }
}

impl From<ProfileError> for EventServiceError {
    fn from(value: ProfileError) -> Self {
        match value {
            ProfileError::Repo(err) => Self::Repo(err),
            other => Self::Profile(other),
        }
    }
}

impl From<RepoError> for EventServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::EventNotFound(id) => Self::EventNotFound(id),
            RepoError::VersionConflict {
                event_id,
                expected_version,
            } => Self::Conflict {
                event_id,
                expected_version,
            },
            other => Self::Repo(other),
        }
    }
}

pub type EventServiceResult<T> = Result<T, EventServiceError>;

/// Event service facade over injected repositories.
pub struct EventService<P: ProfileRepository, E: EventRepository> {
    directory: ProfileDirectory<P>,
    events: E,
}

impl<P: ProfileRepository, E: EventRepository> EventService<P, E> {
    pub fn new(profiles: P, events: E) -> Self {
        Self {
            directory: ProfileDirectory::new(profiles),
            events,
        }
    }

    /// Profile directory sharing this service's storage.
    pub fn directory(&self) -> &ProfileDirectory<P> {
        &self.directory
    }

    /// Creates an event with a single `Event created` log entry.
    ///
    /// Input is validated before any profile is touched. Profiles created by
    /// `resolve` are kept if the event insert itself then fails; they are
    /// ordinary directory rows and the next booking reuses them.
    pub fn create(&self, request: &CreateEventRequest) -> EventServiceResult<EventRecord> {
        let started_at = Instant::now();
        let names = normalize_names(&request.profile_names)?;
        let zone = ZoneId::parse(&request.timezone)?;
        let start = to_instant_in(&request.start.date, &request.start.time, zone)?;
        let end = to_instant_in(&request.end.date, &request.end.time, zone)?;
        ensure_range(start, end)?;

        let profiles = self.directory.resolve(&names)?;
        let event = Event::new(
            profiles.iter().map(|profile| profile.id).collect(),
            zone,
            start,
            end,
            storage_now(),
        );
        let event_id = self.events.insert_event(&event)?;

        info!(
            "event=event_create module=service status=ok event_id={} profiles={} duration_ms={}",
            event_id,
            profiles.len(),
            started_at.elapsed().as_millis()
        );
        Ok(EventRecord::from_parts(event, profiles))
    }

    /// Loads one event with expanded profiles.
    pub fn get(&self, id: EventId) -> EventServiceResult<EventRecord> {
        let event = self
            .events
            .get_event(id)?
            .ok_or(EventServiceError::EventNotFound(id))?;
        self.expand(event)
    }

    /// Applies the fields present in `request` and appends their audit entries.
    pub fn update(
        &self,
        id: EventId,
        request: &UpdateEventRequest,
    ) -> EventServiceResult<EventRecord> {
        let started_at = Instant::now();
        let current = self
            .events
            .get_event(id)?
            .ok_or(EventServiceError::EventNotFound(id))?;
        let previous = self.expand(current.clone())?;

        let proposed_zone = request
            .timezone
            .as_deref()
            .map(ZoneId::parse)
            .transpose()?;
        let effective_zone = proposed_zone.unwrap_or(current.timezone);
        let proposed_start = request
            .start
            .as_ref()
            .map(|value| to_instant_in(&value.date, &value.time, effective_zone))
            .transpose()?;
        let proposed_end = request
            .end
            .as_ref()
            .map(|value| to_instant_in(&value.date, &value.time, effective_zone))
            .transpose()?;
        ensure_range(
            proposed_start.unwrap_or(current.start),
            proposed_end.unwrap_or(current.end),
        )?;

        let proposed_profiles = match request.profile_names.as_deref() {
            Some(names) => Some(self.directory.resolve(&normalize_names(names)?)?),
            None => None,
        };

        let patch = EventPatch {
            timezone: proposed_zone,
            start: proposed_start,
            end: proposed_end,
            profile_names: proposed_profiles
                .as_ref()
                .map(|profiles| profiles.iter().map(|profile| profile.name.clone()).collect()),
        };
        let now = storage_now();
        let entries = audit::diff(&previous.snapshot(), &patch, now);
        let appended = entries.len();

        let mut next = current;
        next.timezone = effective_zone;
        next.start = patch.start.unwrap_or(next.start);
        next.end = patch.end.unwrap_or(next.end);
        if let Some(profiles) = &proposed_profiles {
            next.profile_ids = profiles.iter().map(|profile| profile.id).collect();
        }
        next.logs.extend(entries);
        next.updated_at = now;

        let new_version = match self.events.replace_event(&next) {
            Ok(version) => version,
            Err(err) => {
                warn!(
                    "event=event_update module=service status=error event_id={} error={}",
                    id, err
                );
                return Err(err.into());
            }
        };
        next.version = new_version;

        info!(
            "event=event_update module=service status=ok event_id={} appended_logs={} version={} duration_ms={}",
            id,
            appended,
            new_version,
            started_at.elapsed().as_millis()
        );
        match proposed_profiles {
            Some(profiles) => Ok(EventRecord::from_parts(next, profiles)),
            None => Ok(EventRecord::from_parts(next, previous.profiles)),
        }
    }

    /// Removes an event permanently. No audit entry survives it.
    pub fn delete(&self, id: EventId) -> EventServiceResult<()> {
        self.events.delete_event(id)?;
        info!("event=event_delete module=service status=ok event_id={id}");
        Ok(())
    }

    /// Events that include `profile_id`, newest first, with expanded profiles.
    pub fn list_for_profile(&self, profile_id: ProfileId) -> EventServiceResult<Vec<EventRecord>> {
        self.events
            .list_events_for_profile(profile_id)?
            .into_iter()
            .map(|event| self.expand(event))
            .collect()
    }

    fn expand(&self, event: Event) -> EventServiceResult<EventRecord> {
        let profiles: Vec<Profile> = self.directory.profiles_by_ids(&event.profile_ids)?;
        Ok(EventRecord::from_parts(event, profiles))
    }
}

fn ensure_range(start: DateTime<Utc>, end: DateTime<Utc>) -> EventServiceResult<()> {
    if start > end {
        return Err(EventServiceError::InvalidRange { start, end });
    }
    Ok(())
}

// Same trimming as the shell applies before `ProfileDirectory::create`.
fn normalize_names(names: &[String]) -> EventServiceResult<Vec<String>> {
    let normalized: Vec<String> = names
        .iter()
        .filter_map(|name| trim_profile_name(name).ok())
        .collect();
    if normalized.is_empty() {
        return Err(EventServiceError::EmptyProfiles);
    }
    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::normalize_names;

    #[test]
    fn normalize_names_trims_and_drops_blank_entries() {
        let names = vec![" Alice ".to_string(), "   ".to_string(), "Bob".to_string()];
        assert_eq!(normalize_names(&names).unwrap(), vec!["Alice", "Bob"]);
    }

    #[test]
    fn normalize_names_rejects_all_blank_input() {
        let err = normalize_names(&[" ".to_string()]).unwrap_err();
        assert_eq!(err.error_code(), "empty_profiles");
    }
}
