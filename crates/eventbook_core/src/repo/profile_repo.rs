//! Profile repository contract and SQLite implementation.
//!
//! # Invariants
//! - `profiles.name` is unique; a violating insert maps to `DuplicateName`.
//! - `find_by_names` is a set-membership query and promises no order.

use crate::model::profile::{Profile, ProfileId};
use crate::repo::{parse_uuid, storage_now, to_epoch_ms, RepoError, RepoResult};
use rusqlite::{ffi, params, params_from_iter, Connection, ErrorCode, Row};

/// Storage contract behind the profile directory.
pub trait ProfileRepository {
    fn insert_profile(&self, profile: &Profile) -> RepoResult<()>;
    /// Returns existing profiles whose name is in `names`, in no particular order.
    fn find_by_names(&self, names: &[String]) -> RepoResult<Vec<Profile>>;
    /// Returns profiles in the order of `ids`; fails on the first unknown id.
    fn get_profiles(&self, ids: &[ProfileId]) -> RepoResult<Vec<Profile>>;
    /// Returns every profile sorted by name.
    fn list_profiles(&self) -> RepoResult<Vec<Profile>>;
}

/// SQLite-backed profile repository.
pub struct SqliteProfileRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteProfileRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ProfileRepository for SqliteProfileRepository<'_> {
    fn insert_profile(&self, profile: &Profile) -> RepoResult<()> {
        self.conn
            .execute(
                "INSERT INTO profiles (id, name, created_at) VALUES (?1, ?2, ?3);",
                params![
                    profile.id.to_string(),
                    profile.name.as_str(),
                    to_epoch_ms(storage_now()),
                ],
            )
            .map_err(|err| {
                if is_unique_violation(&err) {
                    RepoError::DuplicateName(profile.name.clone())
                } else {
                    err.into()
                }
            })?;
        Ok(())
    }

    fn find_by_names(&self, names: &[String]) -> RepoResult<Vec<Profile>> {
        if names.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; names.len()].join(", ");
        let mut stmt = self.conn.prepare(&format!(
            "SELECT id, name FROM profiles WHERE name IN ({placeholders});"
        ))?;
        let mut rows = stmt.query(params_from_iter(names.iter()))?;

        let mut profiles = Vec::new();
        while let Some(row) = rows.next()? {
            profiles.push(parse_profile_row(row)?);
        }
        Ok(profiles)
    }

    fn get_profiles(&self, ids: &[ProfileId]) -> RepoResult<Vec<Profile>> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT id, name FROM profiles WHERE id = ?1;")?;

        let mut profiles = Vec::with_capacity(ids.len());
        for id in ids {
            let mut rows = stmt.query([id.to_string()])?;
            match rows.next()? {
                Some(row) => profiles.push(parse_profile_row(row)?),
                None => return Err(RepoError::ProfileNotFound(*id)),
            }
        }
        Ok(profiles)
    }

    fn list_profiles(&self) -> RepoResult<Vec<Profile>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name FROM profiles ORDER BY name ASC, id ASC;")?;
        let mut rows = stmt.query([])?;

        let mut profiles = Vec::new();
        while let Some(row) = rows.next()? {
            profiles.push(parse_profile_row(row)?);
        }
        Ok(profiles)
    }
}

fn parse_profile_row(row: &Row<'_>) -> RepoResult<Profile> {
    let id_text: String = row.get("id")?;
    Ok(Profile {
        id: parse_uuid(&id_text, "profiles.id")?,
        name: row.get("name")?,
    })
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(inner, _)
            if inner.code == ErrorCode::ConstraintViolation
                && inner.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}
