//! Use-case services.
//!
//! # Responsibility
//! - Orchestrate repositories, the zone codec and the change auditor into the
//!   create/update/delete/list use cases.
//! - Map every failure to a stable error code for outer shells.

pub mod event_service;
pub mod profile_directory;
