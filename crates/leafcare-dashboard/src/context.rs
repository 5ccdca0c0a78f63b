//! Services shared by every handler.

use chrono::{DateTime, Utc};
use leafcare_ai::{ChatGateway, VisionGateway};
use leafcare_care::CategoryTable;
use leafcare_core::config::parse_location;
use leafcare_core::Config;
use leafcare_services::{
    JsonChatLog, JsonPlantStore, JsonProfileStore, NurseryService, PlantBackend, SpeciesService,
};
use leafcare_weather::{
    rain_alert, storm_alert, LocationService, RainAlert, StormAlert, WeatherReport, WeatherService,
    DEFAULT_ALERT_HOURS,
};

use crate::error::AppError;

/// Everything a handler needs, built once per invocation.
pub struct DashboardContext {
    pub config: Config,
    pub plants: Box<dyn PlantBackend>,
    pub chat_log: JsonChatLog,
    pub profile: JsonProfileStore,
    pub weather: WeatherService,
    pub location: LocationService,
    pub nurseries: NurseryService,
    pub species: SpeciesService,
    pub chat: ChatGateway,
    pub vision: VisionGateway,
    pub categories: CategoryTable,
}

/// Weather for the garden's city plus the alerts derived from it
#[derive(Debug, Clone)]
pub struct GardenWeather {
    pub city: String,
    pub country: String,
    pub report: WeatherReport,
    pub rain: RainAlert,
    pub storm: StormAlert,
}

impl DashboardContext {
    pub fn new(config: Config) -> Result<Self, AppError> {
        let plants = JsonPlantStore::new(config.plants_path(), config.garden.max_plants);
        let chat_log = JsonChatLog::new(config.chat_history_path(), config.garden.chat_retention);
        let profile = JsonProfileStore::new(config.profile_path());

        let ctx = Self {
            plants: Box::new(plants),
            chat_log,
            profile,
            weather: WeatherService::new(&config.weather)?,
            location: LocationService::new(&config.location)?,
            nurseries: NurseryService::new(&config.nursery)?,
            species: SpeciesService::new(&config.species)?,
            chat: ChatGateway::new(&config.chat)?,
            vision: VisionGateway::new(&config.vision)?,
            categories: CategoryTable::from(&config.garden.categories),
            config,
        };

        tracing::info!("Dashboard ready (data in {})", ctx.config.data_dir.display());
        Ok(ctx)
    }

    /// City and country code for weather: the profile's location when set,
    /// otherwise the configured default.
    pub fn resolve_location(&self) -> Result<(String, String), AppError> {
        let defaults = &self.config.location;
        let preferred = self
            .profile
            .load()?
            .map(|profile| profile.location.trim().to_string())
            .filter(|location| !location.is_empty());

        Ok(match preferred {
            Some(location) => parse_location(&location)
                .unwrap_or_else(|| (location, defaults.default_country_code.clone())),
            None => (defaults.default_city.clone(), defaults.default_country_code.clone()),
        })
    }

    /// Fetch (or reuse) the weather report for the resolved location.
    pub async fn garden_weather(&self, now: DateTime<Utc>) -> Result<GardenWeather, AppError> {
        let (city, country) = self.resolve_location()?;
        let report = self.weather.report(&city, &country, now).await;
        let rain = rain_alert(&report.forecast, now, DEFAULT_ALERT_HOURS);
        let storm = storm_alert(&report.forecast, now, DEFAULT_ALERT_HOURS);
        Ok(GardenWeather {
            city,
            country,
            report,
            rain,
            storm,
        })
    }
}
