//! Rain and storm alerts derived from a forecast window.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::types::ForecastEntry;

/// Default look-ahead for alerts
pub const DEFAULT_ALERT_HOURS: i64 = 24;

/// Precipitation (mm per 3h) above which rain counts as heavy
pub const HEAVY_RAIN_MM: f64 = 5.0;

const STORM_KEYWORDS: [&str; 4] = ["thunderstorm", "storm", "hail", "extreme"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RainIntensity {
    Light,
    Heavy,
}

impl std::fmt::Display for RainIntensity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RainIntensity::Light => write!(f, "Light"),
            RainIntensity::Heavy => write!(f, "Heavy"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RainEvent {
    pub time: DateTime<Utc>,
    /// Hours from now, rounded to one decimal
    pub hours_from_now: f64,
    pub intensity: RainIntensity,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StormEvent {
    pub time: DateTime<Utc>,
    pub hours_from_now: f64,
    pub condition: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RainAlert {
    pub events: Vec<RainEvent>,
}

impl RainAlert {
    pub fn has_rain(&self) -> bool {
        !self.events.is_empty()
    }

    pub fn next(&self) -> Option<&RainEvent> {
        self.events.first()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StormAlert {
    pub events: Vec<StormEvent>,
}

impl StormAlert {
    pub fn has_storm(&self) -> bool {
        !self.events.is_empty()
    }

    pub fn next(&self) -> Option<&StormEvent> {
        self.events.first()
    }
}

/// Hours from `now` to `entry`, if it falls inside `[now, now + hours_ahead]`.
fn within_window(entry: &ForecastEntry, now: DateTime<Utc>, hours_ahead: i64) -> Option<f64> {
    let hours = (entry.time - now).num_seconds() as f64 / 3600.0;
    (0.0..=hours_ahead as f64)
        .contains(&hours)
        .then(|| (hours * 10.0).round() / 10.0)
}

/// Forecast steps with rain in the next `hours_ahead` hours.
pub fn rain_alert(forecast: &[ForecastEntry], now: DateTime<Utc>, hours_ahead: i64) -> RainAlert {
    let events = forecast
        .iter()
        .filter_map(|entry| {
            let hours = within_window(entry, now, hours_ahead)?;
            let rainy = entry.precipitation > 0.0 || entry.description.to_lowercase().contains("rain");
            rainy.then(|| RainEvent {
                time: entry.time,
                hours_from_now: hours,
                intensity: if entry.precipitation > HEAVY_RAIN_MM {
                    RainIntensity::Heavy
                } else {
                    RainIntensity::Light
                },
                description: entry.description.clone(),
            })
        })
        .collect();

    RainAlert { events }
}

/// Forecast steps with severe weather in the next `hours_ahead` hours.
pub fn storm_alert(forecast: &[ForecastEntry], now: DateTime<Utc>, hours_ahead: i64) -> StormAlert {
    let events = forecast
        .iter()
        .filter_map(|entry| {
            let hours = within_window(entry, now, hours_ahead)?;
            let condition = entry.condition.to_lowercase();
            let description = entry.description.to_lowercase();
            let severe = STORM_KEYWORDS
                .iter()
                .any(|k| condition.contains(k) || description.contains(k));
            severe.then(|| StormEvent {
                time: entry.time,
                hours_from_now: hours,
                condition: entry.condition.clone(),
                description: entry.description.clone(),
            })
        })
        .collect();

    StormAlert { events }
}
