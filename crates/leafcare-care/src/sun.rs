//! Sun-exposure estimate from sun position, cloud cover and placement.

use chrono::{DateTime, Utc};
use leafcare_services::{Placement, SunPreference};
use leafcare_weather::WeatherSnapshot;
use serde::Serialize;

/// Sun hours treated as a full day when computing the percentage gauge.
pub const FULL_SUN_HOURS: f64 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SunIntensity {
    None,
    Low,
    Medium,
    #[serde(rename = "Medium-High")]
    MediumHigh,
    High,
}

impl SunIntensity {
    pub fn label(self) -> &'static str {
        match self {
            SunIntensity::None => "None",
            SunIntensity::Low => "Low",
            SunIntensity::Medium => "Medium",
            SunIntensity::MediumHigh => "Medium-High",
            SunIntensity::High => "High",
        }
    }
}

impl std::fmt::Display for SunIntensity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// How directly a placement receives sunlight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExposureClass {
    Full,
    Partial,
    Indirect,
    Unknown,
}

impl ExposureClass {
    pub fn for_placement(placement: Placement) -> Self {
        match placement {
            Placement::OpenRoof => ExposureClass::Full,
            Placement::Balcony => ExposureClass::Partial,
            Placement::IndoorWindow => ExposureClass::Indirect,
            Placement::Unknown => ExposureClass::Unknown,
        }
    }

    /// Fraction of open-sky sun hours the plant receives.
    pub fn multiplier(self) -> f64 {
        match self {
            ExposureClass::Full => 1.0,
            ExposureClass::Partial => 0.7,
            ExposureClass::Indirect => 0.4,
            ExposureClass::Unknown => 0.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SunRisk {
    None,
    Low,
    Medium,
    High,
}

impl std::fmt::Display for SunRisk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            SunRisk::None => "None",
            SunRisk::Low => "Low",
            SunRisk::Medium => "Medium",
            SunRisk::High => "High",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExposureCategory {
    Night,
    Overheating,
    HighMonitorTemperature,
    HighGood,
    HighMonitorClosely,
    Moderate,
    Low,
}

impl ExposureCategory {
    pub fn label(self) -> &'static str {
        match self {
            ExposureCategory::Night => "No Sun (Night)",
            ExposureCategory::Overheating => "Very High - Risk of Overheating",
            ExposureCategory::HighMonitorTemperature => "High - Monitor Temperature",
            ExposureCategory::HighGood => "High - Good Conditions",
            ExposureCategory::HighMonitorClosely => "High - Monitor closely",
            ExposureCategory::Moderate => "Moderate - Good conditions",
            ExposureCategory::Low => "Low - May need more light",
        }
    }

    pub fn recommendation(self) -> &'static str {
        match self {
            ExposureCategory::Night => "Night time - No sun exposure",
            ExposureCategory::Overheating => {
                "High heat and intense sun! Consider moving to shade or providing extra water."
            }
            ExposureCategory::HighMonitorTemperature | ExposureCategory::HighMonitorClosely => {
                "High sun exposure. Monitor temperature and water needs."
            }
            ExposureCategory::HighGood => "Good sun exposure. Monitor soil moisture.",
            ExposureCategory::Moderate => "Moderate conditions. Plant should be comfortable.",
            ExposureCategory::Low => {
                "Limited sunlight. Consider moving to brighter location if plant needs more light."
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SunInput<'a> {
    pub placement: Placement,
    pub sun_preference: SunPreference,
    pub weather: &'a WeatherSnapshot,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SunExposure {
    pub is_daytime: bool,
    pub hours_since_sunrise: f64,
    pub intensity: SunIntensity,
    pub cloud_cover: u8,
    pub placement: Placement,
    pub exposure_class: ExposureClass,
    /// Effective sun hours at the placement, one decimal
    pub sun_hours: f64,
    pub risk: SunRisk,
    pub category: ExposureCategory,
    pub recommendation: String,
    pub sun_preference: SunPreference,
}

impl SunExposure {
    /// Sun hours as a 0-100 gauge value.
    pub fn percentage(&self) -> u8 {
        let pct = (self.sun_hours / FULL_SUN_HOURS * 100.0).clamp(0.0, 100.0);
        pct.round() as u8
    }
}

fn hours_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    (to - from).num_seconds() as f64 / 3600.0
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Open-sky intensity and sun hours for the time of day and cloud cover.
fn open_sky(hours_since_sunrise: f64, hours_to_sunset: f64, cloud_cover: u8) -> (SunIntensity, f64) {
    let h = hours_since_sunrise;
    let clear = cloud_cover < 20;
    let partly = cloud_cover < 50;

    if h < 4.0 {
        if clear {
            (SunIntensity::Medium, 2.0 + (4.0 - h) * 0.5)
        } else if partly {
            (SunIntensity::Low, 1.0 + (4.0 - h) * 0.3)
        } else {
            (SunIntensity::Low, 0.5)
        }
    } else if h < 8.0 {
        if clear {
            (SunIntensity::High, 4.0 + (8.0 - h) * 0.5)
        } else if partly {
            (SunIntensity::Medium, 2.0 + (8.0 - h) * 0.3)
        } else {
            (SunIntensity::Low, 1.0)
        }
    } else {
        let remaining = hours_to_sunset.max(0.0);
        if clear {
            (SunIntensity::MediumHigh, remaining)
        } else if partly {
            (SunIntensity::Medium, remaining * 0.7)
        } else {
            (SunIntensity::Low, remaining * 0.4)
        }
    }
}

fn classify(
    intensity: SunIntensity,
    class: ExposureClass,
    temperature: f64,
    hours_since_sunrise: f64,
) -> (ExposureCategory, SunRisk) {
    match (intensity, class) {
        (SunIntensity::High, ExposureClass::Full) => {
            if temperature > 35.0 && hours_since_sunrise >= 4.0 {
                (ExposureCategory::Overheating, SunRisk::High)
            } else if temperature > 30.0 {
                (ExposureCategory::HighMonitorTemperature, SunRisk::Medium)
            } else {
                (ExposureCategory::HighGood, SunRisk::Low)
            }
        }
        (SunIntensity::High, ExposureClass::Partial) => {
            (ExposureCategory::HighMonitorClosely, SunRisk::Low)
        }
        (SunIntensity::MediumHigh | SunIntensity::Medium, _) => {
            (ExposureCategory::Moderate, SunRisk::None)
        }
        _ => (ExposureCategory::Low, SunRisk::None),
    }
}

/// Estimate how much sun a plant gets at `now`.
pub fn estimate_sun_exposure(input: &SunInput<'_>, now: DateTime<Utc>) -> SunExposure {
    let weather = input.weather;
    let exposure_class = ExposureClass::for_placement(input.placement);

    if !weather.is_daytime(now) {
        let category = ExposureCategory::Night;
        return SunExposure {
            is_daytime: false,
            hours_since_sunrise: 0.0,
            intensity: SunIntensity::None,
            cloud_cover: weather.cloud_cover,
            placement: input.placement,
            exposure_class,
            sun_hours: 0.0,
            risk: SunRisk::None,
            category,
            recommendation: category.recommendation().to_string(),
            sun_preference: input.sun_preference,
        };
    }

    let since_sunrise = hours_between(weather.sunrise, now);
    let to_sunset = hours_between(now, weather.sunset);
    let (intensity, open_hours) = open_sky(since_sunrise, to_sunset, weather.cloud_cover);
    let sun_hours = round1(open_hours * exposure_class.multiplier());
    let (category, risk) = classify(intensity, exposure_class, weather.temperature, since_sunrise);
    tracing::trace!(?intensity, sun_hours, ?category, "Estimated sun exposure");

    SunExposure {
        is_daytime: true,
        hours_since_sunrise: round1(since_sunrise),
        intensity,
        cloud_cover: weather.cloud_cover,
        placement: input.placement,
        exposure_class,
        sun_hours,
        risk,
        category,
        recommendation: category.recommendation().to_string(),
        sun_preference: input.sun_preference,
    }
}
