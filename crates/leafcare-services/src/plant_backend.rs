//! Plant storage backend trait and input validation.

use chrono::{DateTime, Utc};

use crate::error::{StoreError, StoreResult};
use crate::plant::{NewPlant, Plant, PlantUpdate};

/// Longest allowed watering interval in days.
pub const MAX_INTERVAL_DAYS: u32 = 365;

/// Longest allowed plant name.
pub const MAX_NAME_LENGTH: usize = 100;

/// Trait for plant storage backends.
///
/// Every mutating method validates its input first and leaves the store
/// untouched when validation fails.
pub trait PlantBackend: Send + Sync {
    /// List all plants in insertion order.
    fn list(&self) -> StoreResult<Vec<Plant>>;

    /// Get a plant by ID.
    ///
    /// Returns `None` if the plant doesn't exist.
    fn get(&self, id: u64) -> StoreResult<Option<Plant>>;

    /// Add a plant and assign it the next free ID.
    ///
    /// # Errors
    /// Returns `StoreError::Validation` for an empty name, an interval outside
    /// 1..=365, a last-watered time in the future, or a full garden.
    fn add(&self, plant: NewPlant) -> StoreResult<Plant>;

    /// Apply a partial update.
    ///
    /// # Errors
    /// Returns `StoreError::NotFound` if the plant doesn't exist.
    fn update(&self, id: u64, update: PlantUpdate) -> StoreResult<Plant>;

    /// Delete a plant. Its ID is never reused.
    ///
    /// # Errors
    /// Returns `StoreError::NotFound` if the plant doesn't exist.
    fn delete(&self, id: u64) -> StoreResult<()>;

    /// Record a watering at `at`.
    fn mark_watered(&self, id: u64, at: DateTime<Utc>) -> StoreResult<Plant> {
        self.update(
            id,
            PlantUpdate {
                last_watered: Some(at),
                ..PlantUpdate::default()
            },
        )
    }
}

/// Validate a plant name.
pub fn validate_name(name: &str) -> StoreResult<()> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(StoreError::validation("Please enter a plant name"));
    }
    if trimmed.chars().count() > MAX_NAME_LENGTH {
        return Err(StoreError::validation(format!(
            "Plant name exceeds maximum length of {} characters",
            MAX_NAME_LENGTH
        )));
    }
    Ok(())
}

/// Validate a watering interval.
pub fn validate_interval(days: u32) -> StoreResult<()> {
    if days == 0 {
        return Err(StoreError::validation("Watering interval must be at least 1 day"));
    }
    if days > MAX_INTERVAL_DAYS {
        return Err(StoreError::validation(format!(
            "Watering interval cannot exceed {} days",
            MAX_INTERVAL_DAYS
        )));
    }
    Ok(())
}

/// Reject last-watered times after `now`.
pub fn validate_last_watered(at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> StoreResult<()> {
    match at {
        Some(at) if at > now => Err(StoreError::validation("Last watered time cannot be in the future")),
        _ => Ok(()),
    }
}

/// Validate every field of a new plant.
pub fn validate_new_plant(plant: &NewPlant, now: DateTime<Utc>) -> StoreResult<()> {
    validate_name(&plant.name)?;
    validate_interval(plant.watering_interval_days)?;
    validate_last_watered(plant.last_watered, now)
}

/// Validate the fields an update would change.
pub fn validate_update(update: &PlantUpdate, now: DateTime<Utc>) -> StoreResult<()> {
    if let Some(name) = &update.name {
        validate_name(name)?;
    }
    if let Some(days) = update.watering_interval_days {
        validate_interval(days)?;
    }
    validate_last_watered(update.last_watered, now)
}
