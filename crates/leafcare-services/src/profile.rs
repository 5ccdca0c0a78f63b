use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{StoreError, StoreResult};
use crate::json_file;
use crate::timestamp;

/// The single local user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub profession: String,
    /// Preferred city; used for weather before the configured default
    #[serde(default)]
    pub location: String,
    #[serde(default = "Utc::now", deserialize_with = "timestamp::required")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now", deserialize_with = "timestamp::required")]
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    pub fn is_signed_in(&self) -> bool {
        !self.name.trim().is_empty() || !self.email.trim().is_empty()
    }
}

/// Submitted profile fields
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileInput {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub profession: String,
    pub location: String,
}

/// Validate required profile fields.
pub fn validate_profile(input: &ProfileInput) -> StoreResult<()> {
    if input.name.trim().is_empty() || input.email.trim().is_empty() {
        return Err(StoreError::validation("Please fill in at least your name and email"));
    }
    if !input.email.contains('@') {
        return Err(StoreError::validation("Please enter a valid email address"));
    }
    Ok(())
}

/// Profile stored as a single JSON object.
#[derive(Debug, Clone)]
pub struct JsonProfileStore {
    path: PathBuf,
}

impl JsonProfileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the profile. A missing file or `{}` means no profile.
    pub fn load(&self) -> StoreResult<Option<UserProfile>> {
        let raw: Option<serde_json::Value> = json_file::read(&self.path)?;
        match raw {
            None => Ok(None),
            Some(serde_json::Value::Object(map)) if map.is_empty() => Ok(None),
            Some(value) => serde_json::from_value(value)
                .map(Some)
                .map_err(|e| StoreError::corrupt(&self.path, e.to_string())),
        }
    }

    /// Save the profile, keeping the original creation time.
    pub fn save(&self, input: ProfileInput, now: DateTime<Utc>) -> StoreResult<UserProfile> {
        validate_profile(&input)?;

        let created_at = self.load()?.map_or(now, |existing| existing.created_at);
        let profile = UserProfile {
            name: input.name.trim().to_string(),
            email: input.email.trim().to_string(),
            phone: input.phone.trim().to_string(),
            profession: input.profession.trim().to_string(),
            location: input.location.trim().to_string(),
            created_at,
            updated_at: now,
        };

        json_file::write(&self.path, &profile)?;
        tracing::info!("Saved profile for {}", profile.name);
        Ok(profile)
    }

    pub fn is_signed_in(&self) -> StoreResult<bool> {
        Ok(self.load()?.is_some_and(|p| p.is_signed_in()))
    }
}
