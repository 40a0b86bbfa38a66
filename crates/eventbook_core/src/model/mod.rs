//! Domain records for profiles and events.
//!
//! # Responsibility
//! - Define the value types shared by repositories, the auditor and services.
//!
//! # Invariants
//! - Profiles and events are identified by stable UUIDs that are never reused.
//! - Instants are stored zone-independent (UTC); zones only drive display and
//!   interpretation of wall-clock input.

pub mod event;
pub mod profile;
