//! Profile domain model.
//!
//! # Invariants
//! - `name` is the natural key: unique, case-sensitive, never mutated.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of a profile.
pub type ProfileId = Uuid;

/// A named participant that can be attached to events.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Profile {
    pub id: ProfileId,
    pub name: String,
}

impl Profile {
    /// Creates a profile with a freshly generated id.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
        }
    }
}
