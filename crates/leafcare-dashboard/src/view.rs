//! View models produced by the handlers.
//!
//! Every view is plain data: the terminal renderer formats it as text and
//! `--json` serializes it unchanged.

use chrono::{DateTime, Utc};
use leafcare_ai::{HealthAssessment, Identification};
use leafcare_care::{
    AlertKind, CareTips, PlantAlert, PlantCategory, SunExposure, TemperatureStatus, WateringStatus,
};
use leafcare_core::Source;
use leafcare_services::{ChatMessage, Nursery, Plant, SpeciesSummary, UserProfile};
use leafcare_weather::{Location, RainAlert, StormAlert, WeatherReport};
use serde::Serialize;

/// Everything shown for one plant on the dashboard
#[derive(Debug, Clone, Serialize)]
pub struct PlantCard {
    pub plant: Plant,
    pub category: PlantCategory,
    pub watering: WateringStatus,
    pub sun: SunExposure,
    pub temperature: TemperatureStatus,
    pub alert: Option<PlantAlert>,
}

/// One alert text per kind, shared by every outdoor plant it covers
#[derive(Debug, Clone, Serialize)]
pub struct GardenAlert {
    pub kind: AlertKind,
    pub plant_ids: Vec<u64>,
    pub plants: Vec<String>,
    pub text: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GardenSummary {
    pub total: usize,
    pub needs_water: usize,
    pub outdoor: usize,
    pub alerts: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub generated_at: DateTime<Utc>,
    pub city: String,
    pub country: String,
    pub weather: WeatherReport,
    pub temperature: TemperatureStatus,
    pub rain: RainAlert,
    pub storm: StormAlert,
    /// Outdoor heat warning is active
    pub heat: bool,
    pub alerts: Vec<GardenAlert>,
    pub plants: Vec<PlantCard>,
    pub summary: GardenSummary,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlantListView {
    pub plants: Vec<Plant>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlantDetail {
    pub card: PlantCard,
    pub tips: CareTips,
}

#[derive(Debug, Clone, Serialize)]
pub struct RemovedPlant {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatReply {
    pub message: ChatMessage,
    /// Name of the plant the question was about
    pub plant: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatHistoryView {
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Clone, Serialize)]
pub struct IdentificationView {
    pub identification: Identification,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthView {
    pub assessment: HealthAssessment,
    /// Why the photo could not be assessed, when the vision service failed
    pub notice: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfileView {
    pub profile: Option<UserProfile>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LocationView {
    pub location: Location,
    pub source: Source,
}

#[derive(Debug, Clone, Serialize)]
pub struct NurseryView {
    pub city: String,
    pub radius_km: f64,
    pub source: Source,
    pub nurseries: Vec<Nursery>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SpeciesView {
    pub query: String,
    pub source: Source,
    pub results: Vec<SpeciesSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TipsView {
    pub name: String,
    pub tips: CareTips,
}
