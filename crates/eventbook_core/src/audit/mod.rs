//! Field-level change auditing for events.
//!
//! # Responsibility
//! - Turn "previous snapshot vs proposed patch" into ordered audit entries.
//!
//! # Invariants
//! - Pure: no I/O, no mutation of inputs, same inputs give the same output.
//! - Entries follow the fixed field order timezone, start, end, profiles.

mod change_auditor;

pub use change_auditor::{
    diff, END_UPDATED_MESSAGE, PROFILES_CHANGED_PREFIX, PROFILE_NAME_SEPARATOR,
    START_UPDATED_MESSAGE, TIMEZONE_CHANGED_PREFIX,
};
