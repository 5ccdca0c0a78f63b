//! OpenWeatherMap client.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use leafcare_core::{ProviderError, ProviderFuture, Provider, WeatherConfig};
use reqwest::Client;
use serde::Deserialize;
use tracing::instrument;

use crate::types::{ForecastEntry, WeatherError, WeatherSnapshot};

/// Forecast steps per day (3-hour intervals)
pub const STEPS_PER_DAY: usize = 8;

#[derive(Debug, Deserialize)]
struct OwmMain {
    temp: f64,
    #[serde(default)]
    feels_like: Option<f64>,
    #[serde(default)]
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwmCondition {
    main: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Default, Deserialize)]
struct OwmClouds {
    #[serde(default)]
    all: u8,
}

#[derive(Debug, Default, Deserialize)]
struct OwmWind {
    #[serde(default)]
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwmSys {
    #[serde(default)]
    country: String,
    sunrise: i64,
    sunset: i64,
}

#[derive(Debug, Deserialize)]
struct OwmCurrent {
    main: OwmMain,
    weather: Vec<OwmCondition>,
    #[serde(default)]
    clouds: OwmClouds,
    #[serde(default)]
    wind: OwmWind,
    sys: OwmSys,
    #[serde(default)]
    name: String,
}

#[derive(Debug, Default, Deserialize)]
struct OwmRain {
    #[serde(rename = "3h", default)]
    three_hours: f64,
}

#[derive(Debug, Deserialize)]
struct OwmForecastItem {
    dt: i64,
    main: OwmMain,
    weather: Vec<OwmCondition>,
    #[serde(default)]
    clouds: OwmClouds,
    #[serde(default)]
    rain: OwmRain,
}

#[derive(Debug, Deserialize)]
struct OwmForecast {
    list: Vec<OwmForecastItem>,
}

fn timestamp(secs: i64) -> Result<DateTime<Utc>, ProviderError> {
    Utc.timestamp_opt(secs, 0)
        .single()
        .ok_or_else(|| ProviderError::invalid_response(format!("bad timestamp {}", secs)))
}

fn first_condition(conditions: &[OwmCondition]) -> Result<&OwmCondition, ProviderError> {
    conditions
        .first()
        .ok_or_else(|| ProviderError::invalid_response("missing weather condition"))
}

/// OpenWeatherMap current-weather and 5-day/3-hour forecast client
#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    client: Arc<Client>,
    base_url: String,
    api_key: String,
}

impl OpenWeatherProvider {
    pub fn new(config: &WeatherConfig) -> Result<Self, WeatherError> {
        url::Url::parse(&config.base_url)
            .map_err(|e| WeatherError::InvalidUrl(format!("{}: {}", config.base_url, e)))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client: Arc::new(client),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    pub fn is_configured(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    async fn get<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &str,
        city: &str,
        country: &str,
    ) -> Result<T, ProviderError> {
        if !self.is_configured() {
            return Err(ProviderError::NotConfigured(
                "OpenWeatherMap API key not set".to_string(),
            ));
        }

        let url = format!("{}/{}", self.base_url, endpoint);
        let query = format!("{},{}", city, country);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("q", query.as_str()),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::debug!("OpenWeatherMap {} returned {}: {}", endpoint, status, body);
            return Err(ProviderError::from_status(status, body));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ProviderError::invalid_response(e.to_string()))
    }

    /// Fetch current conditions for `city,country`.
    #[instrument(skip(self), level = "debug")]
    pub async fn current(&self, city: &str, country: &str) -> Result<WeatherSnapshot, ProviderError> {
        let data: OwmCurrent = self.get("weather", city, country).await?;
        let condition = first_condition(&data.weather)?;

        Ok(WeatherSnapshot {
            temperature: data.main.temp.round(),
            feels_like: data.main.feels_like.unwrap_or(data.main.temp).round(),
            humidity: data.main.humidity,
            cloud_cover: data.clouds.all,
            wind_speed: data.wind.speed,
            condition: condition.main.clone(),
            description: condition.description.clone(),
            sunrise: timestamp(data.sys.sunrise)?,
            sunset: timestamp(data.sys.sunset)?,
            city: if data.name.is_empty() { city.to_string() } else { data.name },
            country: if data.sys.country.is_empty() {
                country.to_string()
            } else {
                data.sys.country
            },
            fetched_at: Utc::now(),
        })
    }

    /// Fetch up to `days * 8` forecast steps for `city,country`.
    #[instrument(skip(self), level = "debug")]
    pub async fn forecast(
        &self,
        city: &str,
        country: &str,
        days: u32,
    ) -> Result<Vec<ForecastEntry>, ProviderError> {
        let data: OwmForecast = self.get("forecast", city, country).await?;
        let limit = days as usize * STEPS_PER_DAY;

        data.list
            .iter()
            .take(limit)
            .map(|item| {
                let condition = first_condition(&item.weather)?;
                Ok(ForecastEntry {
                    time: timestamp(item.dt)?,
                    temperature: item.main.temp.round(),
                    precipitation: item.rain.three_hours,
                    cloud_cover: item.clouds.all,
                    condition: condition.main.clone(),
                    description: condition.description.clone(),
                    humidity: item.main.humidity,
                })
            })
            .collect()
    }
}

/// Query for current conditions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentQuery {
    pub city: String,
    pub country: String,
}

/// Query for a forecast window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForecastQuery {
    pub city: String,
    pub country: String,
    pub days: u32,
}

/// [`Provider`] adapter for current conditions
pub struct CurrentWeatherSource(pub Arc<OpenWeatherProvider>);

impl Provider<CurrentQuery, WeatherSnapshot> for CurrentWeatherSource {
    fn name(&self) -> &str {
        "openweathermap"
    }

    fn fetch<'a>(&'a self, request: &'a CurrentQuery) -> ProviderFuture<'a, WeatherSnapshot> {
        Box::pin(self.0.current(&request.city, &request.country))
    }
}

/// [`Provider`] adapter for the forecast
pub struct ForecastSource(pub Arc<OpenWeatherProvider>);

impl Provider<ForecastQuery, Vec<ForecastEntry>> for ForecastSource {
    fn name(&self) -> &str {
        "openweathermap"
    }

    fn fetch<'a>(&'a self, request: &'a ForecastQuery) -> ProviderFuture<'a, Vec<ForecastEntry>> {
        Box::pin(self.0.forecast(&request.city, &request.country, request.days))
    }
}
