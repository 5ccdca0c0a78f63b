//! Per-plant weather alerts and the temperature badge.

use leafcare_services::Placement;
use leafcare_weather::{RainAlert, StormAlert};
use serde::Serialize;

/// Temperature (°C) above which outdoor plants get a heat alert.
pub const HEAT_ALERT_THRESHOLD: f64 = 35.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Storm,
    Rain,
    Heat,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlantAlert {
    pub kind: AlertKind,
    pub message: String,
}

impl PlantAlert {
    fn new(kind: AlertKind) -> Self {
        let message = match kind {
            AlertKind::Storm => "Storm Alert: Move indoors!",
            AlertKind::Rain => "Rain Alert: Consider shelter",
            AlertKind::Heat => "Heat Alert: Provide extra water",
        };
        Self {
            kind,
            message: message.to_string(),
        }
    }
}

/// The single most pressing alert for a plant, if any.
///
/// Indoor plants never get one. Storms outrank rain, rain outranks heat.
pub fn plant_weather_alert(
    placement: Placement,
    rain: &RainAlert,
    storm: &StormAlert,
    temperature: f64,
) -> Option<PlantAlert> {
    if !placement.is_outdoor() {
        return None;
    }

    if storm.has_storm() {
        Some(PlantAlert::new(AlertKind::Storm))
    } else if rain.has_rain() {
        Some(PlantAlert::new(AlertKind::Rain))
    } else if temperature > HEAT_ALERT_THRESHOLD {
        Some(PlantAlert::new(AlertKind::Heat))
    } else {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TemperatureStatus {
    TooHot,
    Warm,
    TooCold,
    Comfortable,
}

impl TemperatureStatus {
    pub fn label(self) -> &'static str {
        match self {
            TemperatureStatus::TooHot => "Too Hot",
            TemperatureStatus::Warm => "Warm",
            TemperatureStatus::TooCold => "Too Cold",
            TemperatureStatus::Comfortable => "Comfortable",
        }
    }
}

impl std::fmt::Display for TemperatureStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

pub fn temperature_status(temperature: f64) -> TemperatureStatus {
    if temperature > 35.0 {
        TemperatureStatus::TooHot
    } else if temperature > 30.0 {
        TemperatureStatus::Warm
    } else if temperature < 15.0 {
        TemperatureStatus::TooCold
    } else {
        TemperatureStatus::Comfortable
    }
}
