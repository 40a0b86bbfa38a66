//! Core domain logic for the event book.
//! This crate is the single source of truth for scheduling and audit invariants.

pub mod audit;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod timezone;

pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::event::{
    Event, EventId, EventPatch, EventRecord, EventSnapshot, LogEntry, CREATED_LOG_MESSAGE,
};
pub use model::profile::{Profile, ProfileId};
pub use repo::event_repo::{EventRepository, SqliteEventRepository};
pub use repo::profile_repo::{ProfileRepository, SqliteProfileRepository};
pub use repo::{RepoError, RepoResult};
pub use service::event_service::{
    CreateEventRequest, EventService, EventServiceError, EventServiceResult, UpdateEventRequest,
    WallClock,
};
pub use service::profile_directory::{trim_profile_name, ProfileDirectory, ProfileError};
pub use timezone::{TimeError, ZoneId};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
