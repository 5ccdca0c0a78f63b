//! AI gateways for LeafCare
//!
//! A botanist chat over an OpenAI-compatible completions API and image
//! identification/health captioning over the Hugging Face inference API.
//! Free-text answers are turned into tagged results by [`classify`] and
//! [`health`]; nothing here panics or fails hard on provider trouble.

pub mod chat;
pub mod classify;
pub mod error;
pub mod health;
pub mod vision;

pub use chat::{botanist_prompt, default_alert, ChatGateway, EMPTY_REPLY, NOT_CONFIGURED_REPLY};
pub use classify::{Confidence, Identification, IdentificationTable, PlantIdentification};
pub use error::AiError;
pub use health::{classify_health, Finding, HealthAssessment, HealthStatus};
pub use vision::VisionGateway;
