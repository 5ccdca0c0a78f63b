use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use leafcare_core::{FallbackChain, WeatherConfig};

use crate::cache::WeatherCache;
use crate::defaults::{default_forecast, default_snapshot};
use crate::provider::{CurrentQuery, CurrentWeatherSource, ForecastQuery, ForecastSource, OpenWeatherProvider};
use crate::types::{ForecastEntry, WeatherError, WeatherReport, WeatherSnapshot};

/// Weather lookups with per-session caching and default fallbacks.
///
/// [`WeatherService::report`] never fails: missing keys, timeouts and bad
/// responses all resolve to the baked-in defaults.
#[derive(Debug)]
pub struct WeatherService {
    current: FallbackChain<CurrentQuery, WeatherSnapshot>,
    forecast: FallbackChain<ForecastQuery, Vec<ForecastEntry>>,
    cache: WeatherCache,
    forecast_days: u32,
}

impl WeatherService {
    pub fn new(config: &WeatherConfig) -> Result<Self, WeatherError> {
        let provider = Arc::new(OpenWeatherProvider::new(config)?);
        let timeout = Duration::from_secs(config.timeout_secs);

        if !provider.is_configured() {
            tracing::info!("No OpenWeatherMap key configured; default weather will be used");
        }

        Ok(Self {
            current: FallbackChain::new(timeout).with_provider(CurrentWeatherSource(provider.clone())),
            forecast: FallbackChain::new(timeout).with_provider(ForecastSource(provider)),
            cache: WeatherCache::new(config.refresh_minutes),
            forecast_days: config.forecast_days.max(1),
        })
    }

    pub fn cache(&self) -> &WeatherCache {
        &self.cache
    }

    /// Current weather and forecast for `city,country` as of `now`.
    pub async fn report(&self, city: &str, country: &str, now: DateTime<Utc>) -> WeatherReport {
        if let Some(cached) = self.cache.get(city, country, now) {
            return cached;
        }

        let current = self
            .current
            .resolve_or_else(
                &CurrentQuery {
                    city: city.to_string(),
                    country: country.to_string(),
                },
                || default_snapshot(city, country, now),
            )
            .await;

        let forecast = self
            .forecast
            .resolve_or_else(
                &ForecastQuery {
                    city: city.to_string(),
                    country: country.to_string(),
                    days: self.forecast_days,
                },
                || default_forecast(now),
            )
            .await;

        let report = WeatherReport {
            current: current.value,
            current_source: current.source,
            forecast: forecast.value,
            forecast_source: forecast.source,
        };

        if report.uses_fallback() {
            tracing::debug!("Weather for {}, {} uses default data", city, country);
        }

        self.cache.put(city, country, report.clone(), now);
        report
    }
}
