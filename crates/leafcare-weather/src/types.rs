use chrono::{DateTime, Utc};
use leafcare_core::{ProviderError, Source};
use serde::{Deserialize, Serialize};

/// Current weather conditions for a city
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    /// Degrees Celsius
    pub temperature: f64,
    pub feels_like: f64,
    /// Relative humidity, percent
    pub humidity: u8,
    /// Cloud cover, percent
    pub cloud_cover: u8,
    /// Metres per second
    pub wind_speed: f64,
    /// Short condition ("Clear", "Rain", "Thunderstorm")
    pub condition: String,
    /// Provider description ("light rain")
    pub description: String,
    pub sunrise: DateTime<Utc>,
    pub sunset: DateTime<Utc>,
    pub city: String,
    pub country: String,
    pub fetched_at: DateTime<Utc>,
}

impl WeatherSnapshot {
    /// Whether `now` falls between sunrise and sunset (inclusive).
    pub fn is_daytime(&self, now: DateTime<Utc>) -> bool {
        self.sunrise <= now && now <= self.sunset
    }
}

/// One 3-hour forecast step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    pub time: DateTime<Utc>,
    pub temperature: f64,
    /// Millimetres over the 3-hour step
    pub precipitation: f64,
    pub cloud_cover: u8,
    pub condition: String,
    pub description: String,
    pub humidity: u8,
}

/// Current weather plus forecast, each tagged with where it came from
#[derive(Debug, Clone, Serialize)]
pub struct WeatherReport {
    pub current: WeatherSnapshot,
    pub current_source: Source,
    pub forecast: Vec<ForecastEntry>,
    pub forecast_source: Source,
}

impl WeatherReport {
    /// True when any part of the report is baked-in default data.
    pub fn uses_fallback(&self) -> bool {
        self.current_source == Source::Fallback || self.forecast_source == Source::Fallback
    }
}

/// A resolved user location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub city: String,
    pub country: String,
    pub country_code: String,
    #[serde(default)]
    pub region: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl Location {
    pub fn new(city: impl Into<String>, country_code: impl Into<String>) -> Self {
        let country_code = country_code.into();
        Self {
            city: city.into(),
            country: country_code.clone(),
            country_code,
            region: String::new(),
            latitude: None,
            longitude: None,
        }
    }

    pub fn with_coordinates(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = Some(latitude);
        self.longitude = Some(longitude);
        self
    }

    pub fn coordinates(&self) -> Option<(f64, f64)> {
        self.latitude.zip(self.longitude)
    }

    /// "City, Country" for display
    pub fn label(&self) -> String {
        format!("{}, {}", self.city, self.country)
    }
}

/// Weather crate errors
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
    #[error("Invalid base URL: {0}")]
    InvalidUrl(String),
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

impl WeatherError {
    pub fn user_message(&self) -> &'static str {
        match self {
            WeatherError::Client(_) => "Weather service could not start.",
            WeatherError::InvalidUrl(_) => "Weather service URL is invalid. Check your settings.",
            WeatherError::Provider(e) => e.user_message(),
        }
    }
}
