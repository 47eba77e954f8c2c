//! Profile store
//!
//! Profiles are JSON files under `<data_dir>/profiles/<id>.json`. They are
//! read on every request; nothing is cached.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::models::{Profile, ProfileInfo};

/// Profile served when the requested one does not exist
pub const DEFAULT_PROFILE_ID: &str = "james_thompson";

/// Read-only access to the profile data directory
#[derive(Debug, Clone)]
pub struct ProfileStore {
    data_dir: PathBuf,
}

impl ProfileStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn profiles_dir(&self) -> PathBuf {
        self.data_dir.join("profiles")
    }

    fn profile_path(&self, id: &str) -> PathBuf {
        self.profiles_dir().join(format!("{}.json", id))
    }

    /// Load a profile, falling back to the default profile when it is missing
    pub fn load(&self, profile_id: &str) -> Result<Profile> {
        validate_id(profile_id)?;

        let path = self.profile_path(profile_id);
        if path.is_file() {
            return read_profile(&path);
        }

        let fallback = self.profile_path(DEFAULT_PROFILE_ID);
        if fallback.is_file() {
            debug!(
                requested = profile_id,
                "Profile not found, using {}", DEFAULT_PROFILE_ID
            );
            return read_profile(&fallback);
        }

        Err(Error::NotFound(format!("profile '{}'", profile_id)))
    }

    /// List every readable profile, sorted by id
    pub fn list(&self) -> Result<Vec<ProfileInfo>> {
        let dir = self.profiles_dir();
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut profiles = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let path = match entry {
                Ok(entry) => entry.path(),
                Err(e) => {
                    warn!(error = %e, "Skipping unreadable profile entry");
                    continue;
                }
            };
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(id) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };

            match read_profile(&path) {
                Ok(profile) => profiles.push(ProfileInfo {
                    id: id.to_string(),
                    name: profile.name.unwrap_or_else(|| display_name(id)),
                }),
                Err(e) => warn!(path = %path.display(), error = %e, "Skipping invalid profile"),
            }
        }

        profiles.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(profiles)
    }
}

fn validate_id(id: &str) -> Result<()> {
    if id.is_empty() || id.contains('/') || id.contains('\\') || id.contains("..") {
        return Err(Error::InvalidData(format!("Invalid profile id: {}", id)));
    }
    Ok(())
}

fn read_profile(path: &Path) -> Result<Profile> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// `james_thompson` -> `James Thompson`
pub fn display_name(id: &str) -> String {
    id.split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
