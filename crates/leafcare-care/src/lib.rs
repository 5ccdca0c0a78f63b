//! Care heuristics for LeafCare
//!
//! Pure functions that turn a plant record and the weather into watering
//! and sun-exposure advice. Nothing here performs I/O; the current time is
//! always passed in.

pub mod alerts;
pub mod category;
pub mod sun;
pub mod tips;
pub mod watering;

pub use alerts::{plant_weather_alert, temperature_status, AlertKind, PlantAlert, TemperatureStatus};
pub use category::{CategoryTable, PlantCategory};
pub use sun::{
    estimate_sun_exposure, ExposureCategory, ExposureClass, SunExposure, SunInput, SunIntensity, SunRisk,
};
pub use tips::{care_tips, CareTips};
pub use watering::{adjusted_interval, assess_watering, Urgency, WateringInput, WateringReason, WateringStatus};
