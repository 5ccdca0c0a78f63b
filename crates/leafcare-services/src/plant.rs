//! Plant record types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::serde_helpers;
use crate::timestamp;

/// Where the plant physically sits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Placement {
    OpenRoof,
    Balcony,
    #[default]
    IndoorWindow,
    /// Stored value that isn't one of the known placements
    Unknown,
}

impl Placement {
    pub const ALL: [Placement; 3] = [Placement::OpenRoof, Placement::Balcony, Placement::IndoorWindow];

    pub fn label(&self) -> &'static str {
        match self {
            Placement::OpenRoof => "Open Roof",
            Placement::Balcony => "Balcony",
            Placement::IndoorWindow => "Indoor Window",
            Placement::Unknown => "Unknown",
        }
    }

    /// Open Roof and Balcony are exposed to the weather.
    pub fn is_outdoor(&self) -> bool {
        matches!(self, Placement::OpenRoof | Placement::Balcony)
    }
}

impl std::fmt::Display for Placement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

fn normalize(value: &str) -> String {
    value
        .trim()
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric())
        .collect()
}

impl FromStr for Placement {
    type Err = String;

    /// Accepts "Open Roof", "open-roof", "open_roof" and the like.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "openroof" | "roof" => Ok(Placement::OpenRoof),
            "balcony" => Ok(Placement::Balcony),
            "indoorwindow" | "indoor" | "window" => Ok(Placement::IndoorWindow),
            _ => Err(format!(
                "Unknown placement '{}' (expected Open Roof, Balcony or Indoor Window)",
                s
            )),
        }
    }
}

impl From<String> for Placement {
    fn from(value: String) -> Self {
        value.parse().unwrap_or(Placement::Unknown)
    }
}

impl From<Placement> for String {
    fn from(value: Placement) -> Self {
        value.label().to_string()
    }
}

/// Light the plant prefers, as chosen by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SunPreference {
    #[default]
    #[serde(rename = "Morning Sun")]
    MorningSun,
    #[serde(rename = "Afternoon Shade")]
    AfternoonShade,
    #[serde(rename = "Full Sun")]
    FullSun,
}

impl SunPreference {
    pub fn label(&self) -> &'static str {
        match self {
            SunPreference::MorningSun => "Morning Sun",
            SunPreference::AfternoonShade => "Afternoon Shade",
            SunPreference::FullSun => "Full Sun",
        }
    }
}

impl std::fmt::Display for SunPreference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SunPreference {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "morningsun" | "morning" => Ok(SunPreference::MorningSun),
            "afternoonshade" | "shade" => Ok(SunPreference::AfternoonShade),
            "fullsun" | "full" => Ok(SunPreference::FullSun),
            _ => Err(format!(
                "Unknown sun preference '{}' (expected Morning Sun, Afternoon Shade or Full Sun)",
                s
            )),
        }
    }
}

fn default_care_level() -> String {
    "Moderate".to_string()
}

fn default_interval() -> u32 {
    3
}

/// A plant in the user's garden
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plant {
    pub id: u64,
    pub name: String,
    #[serde(default, deserialize_with = "serde_helpers::non_empty_string")]
    pub scientific_name: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_care_level")]
    pub care_level: String,
    /// City the plant is kept in
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub placement: Placement,
    #[serde(default)]
    pub sun_preference: SunPreference,
    #[serde(default = "default_interval")]
    pub watering_interval_days: u32,
    #[serde(default, deserialize_with = "timestamp::optional")]
    pub last_watered: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "serde_helpers::non_empty_string")]
    pub image_path: Option<String>,
    #[serde(alias = "added_date", default = "Utc::now", deserialize_with = "timestamp::required")]
    pub added_at: DateTime<Utc>,
    #[serde(default)]
    pub notes: String,
}

/// Fields supplied when adding a plant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPlant {
    pub name: String,
    pub scientific_name: Option<String>,
    pub description: String,
    pub care_level: String,
    pub location: String,
    pub placement: Placement,
    pub sun_preference: SunPreference,
    pub watering_interval_days: u32,
    pub last_watered: Option<DateTime<Utc>>,
    pub image_path: Option<String>,
    pub notes: String,
}

impl NewPlant {
    pub fn new(name: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            scientific_name: None,
            description: String::new(),
            care_level: default_care_level(),
            location: location.into(),
            placement: Placement::default(),
            sun_preference: SunPreference::default(),
            watering_interval_days: default_interval(),
            last_watered: None,
            image_path: None,
            notes: String::new(),
        }
    }
}

/// Partial update; only `Some` fields are applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlantUpdate {
    pub name: Option<String>,
    pub scientific_name: Option<String>,
    pub description: Option<String>,
    pub care_level: Option<String>,
    pub location: Option<String>,
    pub placement: Option<Placement>,
    pub sun_preference: Option<SunPreference>,
    pub watering_interval_days: Option<u32>,
    pub last_watered: Option<DateTime<Utc>>,
    pub image_path: Option<String>,
    pub notes: Option<String>,
}

impl PlantUpdate {
    /// Apply the update to `plant` in place.
    pub fn apply(self, plant: &mut Plant) {
        if let Some(name) = self.name {
            plant.name = name.trim().to_string();
        }
        if let Some(scientific_name) = self.scientific_name {
            plant.scientific_name = Some(scientific_name).filter(|s| !s.is_empty());
        }
        if let Some(description) = self.description {
            plant.description = description;
        }
        if let Some(care_level) = self.care_level {
            plant.care_level = care_level;
        }
        if let Some(location) = self.location {
            plant.location = location;
        }
        if let Some(placement) = self.placement {
            plant.placement = placement;
        }
        if let Some(sun_preference) = self.sun_preference {
            plant.sun_preference = sun_preference;
        }
        if let Some(interval) = self.watering_interval_days {
            plant.watering_interval_days = interval;
        }
        if let Some(last_watered) = self.last_watered {
            plant.last_watered = Some(last_watered);
        }
        if let Some(image_path) = self.image_path {
            plant.image_path = Some(image_path).filter(|s| !s.is_empty());
        }
        if let Some(notes) = self.notes {
            plant.notes = notes;
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;

    #[test]
    fn test_placement_parse_variants() {
        assert_eq!("Open Roof".parse::<Placement>().unwrap(), Placement::OpenRoof);
        assert_eq!("open-roof".parse::<Placement>().unwrap(), Placement::OpenRoof);
        assert_eq!("BALCONY".parse::<Placement>().unwrap(), Placement::Balcony);
        assert_eq!("indoor_window".parse::<Placement>().unwrap(), Placement::IndoorWindow);
        assert!("garden".parse::<Placement>().is_err());
    }

    #[test]
    fn test_unknown_stored_placement_deserializes() {
        let placement: Placement = serde_json::from_str("\"Greenhouse\"").unwrap();
        assert_eq!(placement, Placement::Unknown);
        assert!(!placement.is_outdoor());
    }

    #[test]
    fn test_placement_serializes_as_label() {
        assert_eq!(serde_json::to_string(&Placement::OpenRoof).unwrap(), "\"Open Roof\"");
    }

    #[test]
    fn test_legacy_record_loads() {
        let json = r#"{
            "id": 4,
            "name": "Rose",
            "scientific_name": "",
            "description": "",
            "care_level": "Moderate",
            "location": "Sialkot",
            "placement": "Balcony",
            "sun_preference": "Full Sun",
            "watering_interval_days": 2,
            "last_watered": "2024-06-01T08:30:00.123456",
            "image_path": "",
            "added_date": "2024-05-01T10:00:00",
            "notes": ""
        }"#;
        let plant: Plant = serde_json::from_str(json).unwrap();
        assert_eq!(plant.id, 4);
        assert_eq!(plant.scientific_name, None);
        assert_eq!(plant.image_path, None);
        assert_eq!(plant.placement, Placement::Balcony);
        assert_eq!(plant.sun_preference, SunPreference::FullSun);
        assert_eq!(plant.last_watered.unwrap().to_rfc3339(), "2024-06-01T08:30:00.123456+00:00");
    }

    #[test]
    fn test_update_applies_only_some_fields() {
        let mut plant: Plant = serde_json::from_str(r#"{"id": 1, "name": "Fern"}"#).unwrap();
        PlantUpdate {
            notes: Some("repotted".to_string()),
            watering_interval_days: Some(5),
            ..PlantUpdate::default()
        }
        .apply(&mut plant);

        assert_eq!(plant.name, "Fern");
        assert_eq!(plant.notes, "repotted");
        assert_eq!(plant.watering_interval_days, 5);
    }
}
