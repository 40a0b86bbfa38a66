//! Zone-aware conversion between wall-clock input and stored instants.
//!
//! # Responsibility
//! - Validate IANA zone ids once, at the boundary, into [`ZoneId`].
//! - Convert `(date, time, zone)` to UTC instants and back for display.
//!
//! # Invariants
//! - Conversions are pure and never suspend or touch storage.
//! - Gap times take the offset in force before the transition; overlap
//!   times take the first occurrence.

mod catalog;
mod codec;

pub use catalog::{zone_catalog, ZoneGroup, DEFAULT_ZONE};
pub use codec::{
    format_log_timestamp, parse_local, resolve_local, to_instant, to_instant_in, to_local, to_local_parts,
    LocalDateTime, TimeError, TimeResult, ZoneId,
};
