//! Profile directory: name to identifier resolution.
//!
//! # Invariants
//! - Names are matched exactly (no trimming, no case folding).
//! - `resolve` returns profiles in input order, creating unknown names.
//! - A failed `create` leaves the directory unchanged.
//! - Shell input goes through [`trim_profile_name`] before it reaches the
//!   directory, so `create` and event booking agree on stored names.

use crate::model::profile::{Profile, ProfileId};
use crate::repo::profile_repo::ProfileRepository;
use crate::repo::{RepoError, RepoResult};
use log::{debug, info};
use std::collections::{HashMap, HashSet};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from profile directory operations.
#[derive(Debug)]
pub enum ProfileError {
    /// Name is empty.
    InvalidName(String),
    /// Another profile already owns this name.
    DuplicateName(String),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl ProfileError {
    /// Stable machine-readable kind for outer shells.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidName(_) => "invalid_name",
            Self::DuplicateName(_) => "duplicate_name",
            Self::Repo(_) => "storage",
        }
    }
}

impl Display for ProfileError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidName(value) => write!(f, "invalid profile name: `{value}`"),
            Self::DuplicateName(value) => write!(f, "profile name already exists: `{value}`"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ProfileError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ProfileError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::DuplicateName(name) => Self::DuplicateName(name),
            other => Self::Repo(other),
        }
    }
}

/// Owner of the name -> id mapping.
pub struct ProfileDirectory<R: ProfileRepository> {
    repo: R,
}

impl<R: ProfileRepository> ProfileDirectory<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates one profile. Fails with `DuplicateName` when the name is taken.
    pub fn create(&self, name: impl Into<String>) -> Result<Profile, ProfileError> {
        let name = name.into();
        ensure_valid_name(&name)?;

        let profile = Profile::new(name);
        self.repo.insert_profile(&profile)?;
        info!(
            "event=profile_create module=service status=ok profile_id={}",
            profile.id
        );
        Ok(profile)
    }

    /// Lists all profiles sorted by name.
    pub fn list(&self) -> Result<Vec<Profile>, ProfileError> {
        self.repo.list_profiles().map_err(Into::into)
    }

    /// Resolves `names` to profiles in input order.
    ///
    /// Repeated names collapse to their first occurrence. Names with no
    /// profile yet are created.
    pub fn resolve(&self, names: &[String]) -> Result<Vec<Profile>, ProfileError> {
        let mut seen = HashSet::new();
        let unique: Vec<String> = names
            .iter()
            .filter(|name| seen.insert(*name))
            .cloned()
            .collect();
        for name in &unique {
            ensure_valid_name(name)?;
        }

        // The lookup is a set query; order is restored below from `unique`.
        let mut by_name: HashMap<String, Profile> = self
            .repo
            .find_by_names(&unique)?
            .into_iter()
            .map(|profile| (profile.name.clone(), profile))
            .collect();

        let mut resolved = Vec::with_capacity(unique.len());
        let mut created = 0_usize;
        for name in unique {
            let profile = match by_name.remove(&name) {
                Some(profile) => profile,
                None => {
                    created += 1;
                    self.create_or_fetch(name)?
                }
            };
            resolved.push(profile);
        }

        debug!(
            "event=profile_resolve module=service status=ok requested={} resolved={} created={}",
            names.len(),
            resolved.len(),
            created
        );
        Ok(resolved)
    }

    /// Resolves `names` and returns only their ids, in input order.
    pub fn resolve_ids(&self, names: &[String]) -> Result<Vec<ProfileId>, ProfileError> {
        Ok(self
            .resolve(names)?
            .into_iter()
            .map(|profile| profile.id)
            .collect())
    }

    /// Expands ids to full profiles, keeping the order of `ids`.
    pub fn profiles_by_ids(&self, ids: &[ProfileId]) -> RepoResult<Vec<Profile>> {
        self.repo.get_profiles(ids)
    }

    // A concurrent writer may insert the same name between lookup and insert.
    fn create_or_fetch(&self, name: String) -> Result<Profile, ProfileError> {
        let profile = Profile::new(name);
        match self.repo.insert_profile(&profile) {
            Ok(()) => Ok(profile),
            Err(RepoError::DuplicateName(name)) => self
                .repo
                .find_by_names(std::slice::from_ref(&name))?
                .into_iter()
                .next()
                .ok_or(ProfileError::DuplicateName(name)),
            Err(err) => Err(err.into()),
        }
    }
}

/// Normalizes a name typed into a shell: surrounding whitespace is dropped.
///
/// # Errors
/// - `InvalidName` when nothing but whitespace was given.
pub fn trim_profile_name(name: &str) -> Result<String, ProfileError> {
    let trimmed = name.trim();
    ensure_valid_name(trimmed)?;
    Ok(trimmed.to_string())
}

fn ensure_valid_name(name: &str) -> Result<(), ProfileError> {
    if name.is_empty() {
        return Err(ProfileError::InvalidName(name.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::trim_profile_name;

    #[test]
    fn trim_profile_name_strips_surrounding_whitespace() {
        assert_eq!(trim_profile_name("  Alice \t").unwrap(), "Alice");
        assert_eq!(trim_profile_name("Ann Lee").unwrap(), "Ann Lee");
    }

    #[test]
    fn trim_profile_name_rejects_blank_input() {
        let err = trim_profile_name(" \n ").unwrap_err();
        assert_eq!(err.error_code(), "invalid_name");
    }
}
