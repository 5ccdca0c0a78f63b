//! Local record stores and lookup services for LeafCare
//!
//! Plants, chat history and the user profile live in JSON files under the
//! data directory. Nursery and species lookups call public APIs and fall
//! back to built-in data.

pub mod chat_log;
pub mod error;
pub mod json_file;
pub mod nursery;
pub mod plant;
pub mod plant_backend;
pub mod plant_store;
pub mod profile;
pub mod serde_helpers;
pub mod species;
pub mod timestamp;

pub use chat_log::{ChatMessage, JsonChatLog, DEFAULT_RECENT_LIMIT, DEFAULT_RETENTION};
pub use error::{StoreError, StoreResult};
pub use nursery::{mock_nurseries, Nursery, NurseryService};
pub use plant::{NewPlant, Placement, Plant, PlantUpdate, SunPreference};
pub use plant_backend::{validate_new_plant, PlantBackend, MAX_INTERVAL_DAYS};
pub use plant_store::{JsonPlantStore, DEFAULT_MAX_PLANTS};
pub use profile::{JsonProfileStore, ProfileInput, UserProfile};
pub use species::{mock_species, SpeciesService, SpeciesSummary};
