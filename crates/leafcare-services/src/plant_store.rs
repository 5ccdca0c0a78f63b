//! JSON flat-file plant storage.
//!
//! The file holds `{ "next_id": n, "plants": [...] }`. Files written by older
//! versions hold a bare array of plants and are upgraded on the next write.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{StoreError, StoreResult};
use crate::json_file;
use crate::plant::{NewPlant, Plant, PlantUpdate};
use crate::plant_backend::{validate_new_plant, validate_update, PlantBackend};

/// Default cap on stored plants.
pub const DEFAULT_MAX_PLANTS: usize = 50;

#[derive(Debug, Serialize, Deserialize)]
struct PlantDocument {
    next_id: u64,
    plants: Vec<Plant>,
}

impl Default for PlantDocument {
    fn default() -> Self {
        Self {
            next_id: 1,
            plants: Vec::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StoredPlants {
    Document(PlantDocument),
    Legacy(Vec<Plant>),
}

impl StoredPlants {
    fn into_document(self) -> PlantDocument {
        let mut doc = match self {
            StoredPlants::Document(doc) => doc,
            StoredPlants::Legacy(plants) => PlantDocument { next_id: 1, plants },
        };
        // Never hand out an ID at or below one already in use
        let floor = doc.plants.iter().map(|p| p.id).max().map_or(1, |max| max + 1);
        doc.next_id = doc.next_id.max(floor);
        doc
    }
}

/// Plant store backed by a single JSON file.
#[derive(Debug, Clone)]
pub struct JsonPlantStore {
    path: PathBuf,
    max_plants: usize,
}

impl JsonPlantStore {
    /// Create a store at the given path. The file is created on first write.
    pub fn new(path: impl Into<PathBuf>, max_plants: usize) -> Self {
        Self {
            path: path.into(),
            max_plants,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> StoreResult<PlantDocument> {
        Ok(json_file::read::<StoredPlants>(&self.path)?
            .map(StoredPlants::into_document)
            .unwrap_or_default())
    }

    fn save(&self, doc: &PlantDocument) -> StoreResult<()> {
        json_file::write(&self.path, doc)
    }
}

impl PlantBackend for JsonPlantStore {
    fn list(&self) -> StoreResult<Vec<Plant>> {
        Ok(self.load()?.plants)
    }

    fn get(&self, id: u64) -> StoreResult<Option<Plant>> {
        Ok(self.load()?.plants.into_iter().find(|p| p.id == id))
    }

    fn add(&self, new: NewPlant) -> StoreResult<Plant> {
        let now = Utc::now();
        validate_new_plant(&new, now)?;

        let mut doc = self.load()?;
        if doc.plants.len() >= self.max_plants {
            return Err(StoreError::validation(format!(
                "You can keep at most {} plants. Remove one before adding another.",
                self.max_plants
            )));
        }

        let plant = Plant {
            id: doc.next_id,
            name: new.name.trim().to_string(),
            scientific_name: new.scientific_name.filter(|s| !s.trim().is_empty()),
            description: new.description,
            care_level: new.care_level,
            location: new.location,
            placement: new.placement,
            sun_preference: new.sun_preference,
            watering_interval_days: new.watering_interval_days,
            last_watered: new.last_watered,
            image_path: new.image_path.filter(|s| !s.trim().is_empty()),
            added_at: now,
            notes: new.notes,
        };

        doc.next_id += 1;
        doc.plants.push(plant.clone());
        self.save(&doc)?;

        tracing::info!("Added plant {} ({})", plant.id, plant.name);
        Ok(plant)
    }

    fn update(&self, id: u64, update: PlantUpdate) -> StoreResult<Plant> {
        validate_update(&update, Utc::now())?;

        let mut doc = self.load()?;
        let plant = doc
            .plants
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(StoreError::NotFound(id))?;
        update.apply(plant);
        let updated = plant.clone();

        self.save(&doc)?;
        tracing::debug!("Updated plant {}", id);
        Ok(updated)
    }

    fn delete(&self, id: u64) -> StoreResult<()> {
        let mut doc = self.load()?;
        let before = doc.plants.len();
        doc.plants.retain(|p| p.id != id);
        if doc.plants.len() == before {
            return Err(StoreError::NotFound(id));
        }

        self.save(&doc)?;
        tracing::info!("Removed plant {}", id);
        Ok(())
    }
}
