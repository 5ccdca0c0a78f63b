//! IP-based location detection.
//!
//! Each configured endpoint is queried in order. Both ipapi.co and
//! ip-api.com response shapes are understood. When every endpoint fails the
//! configured default location is returned.

use std::sync::Arc;
use std::time::Duration;

use leafcare_core::{FallbackChain, LocationConfig, Provider, ProviderError, ProviderFuture, Sourced};
use reqwest::Client;
use serde::Deserialize;

use crate::types::{Location, WeatherError};

const USER_AGENT: &str = concat!("LeafCare/", env!("CARGO_PKG_VERSION"));

/// Union of the ipapi.co and ip-api.com JSON shapes
#[derive(Debug, Default, Deserialize)]
struct GeoResponse {
    city: Option<String>,
    /// ISO code on ipapi.co, full name on ip-api.com
    country: Option<String>,
    country_name: Option<String>,
    #[serde(alias = "countryCode")]
    country_code: Option<String>,
    region: Option<String>,
    #[serde(rename = "regionName")]
    region_name: Option<String>,
    #[serde(alias = "lat")]
    latitude: Option<f64>,
    #[serde(alias = "lon")]
    longitude: Option<f64>,
    /// ip-api.com: "success" or "fail"
    status: Option<String>,
    /// ipapi.co: true on failure
    #[serde(default)]
    error: bool,
    #[serde(alias = "message")]
    reason: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

impl GeoResponse {
    fn into_location(self) -> Result<Location, ProviderError> {
        if self.error || self.status.as_deref().is_some_and(|s| s != "success") {
            return Err(ProviderError::invalid_response(
                self.reason.unwrap_or_else(|| "lookup failed".to_string()),
            ));
        }

        let city = non_empty(self.city).ok_or_else(|| ProviderError::empty("no city"))?;
        let country = non_empty(self.country_name)
            .or_else(|| non_empty(self.country.clone()))
            .ok_or_else(|| ProviderError::empty("no country"))?;
        let country_code = non_empty(self.country_code)
            .or_else(|| non_empty(self.country))
            .unwrap_or_else(|| country.clone());

        Ok(Location {
            city,
            country,
            country_code,
            region: non_empty(self.region_name)
                .or_else(|| non_empty(self.region))
                .unwrap_or_default(),
            latitude: self.latitude,
            longitude: self.longitude,
        })
    }
}

/// A single geolocation endpoint
pub struct IpGeoProvider {
    name: String,
    url: String,
    client: Arc<Client>,
}

impl IpGeoProvider {
    pub fn new(url: &str, client: Arc<Client>) -> Self {
        let name = url::Url::parse(url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
            .unwrap_or_else(|| url.to_string());
        Self {
            name,
            url: url.to_string(),
            client,
        }
    }

    async fn lookup(&self) -> Result<Location, ProviderError> {
        let response = self.client.get(&self.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::from_status(status, ""));
        }

        let body: GeoResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::invalid_response(e.to_string()))?;
        body.into_location()
    }
}

impl Provider<(), Location> for IpGeoProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch<'a>(&'a self, _request: &'a ()) -> ProviderFuture<'a, Location> {
        Box::pin(self.lookup())
    }
}

/// Detects the user's city from their public IP
#[derive(Debug)]
pub struct LocationService {
    chain: FallbackChain<(), Location>,
    default: Location,
    enabled: bool,
}

impl LocationService {
    pub fn new(config: &LocationConfig) -> Result<Self, WeatherError> {
        let timeout = Duration::from_secs(config.timeout_secs);
        let client = Arc::new(
            Client::builder()
                .timeout(timeout)
                .user_agent(USER_AGENT)
                .build()?,
        );

        let chain = config
            .providers
            .iter()
            .fold(FallbackChain::new(timeout), |chain, url| {
                chain.with_provider(IpGeoProvider::new(url, client.clone()))
            });

        Ok(Self {
            chain,
            default: Self::default_location(config),
            enabled: config.detect,
        })
    }

    pub fn default_location(config: &LocationConfig) -> Location {
        Location {
            city: config.default_city.clone(),
            country: config.default_country.clone(),
            country_code: config.default_country_code.clone(),
            region: String::new(),
            latitude: None,
            longitude: None,
        }
    }

    /// Detect the current location, falling back to the configured default.
    pub async fn detect(&self) -> Sourced<Location> {
        if !self.enabled {
            tracing::debug!("IP geolocation disabled; using default location");
            return Sourced::fallback(self.default.clone());
        }

        let resolved = self
            .chain
            .resolve_or_else(&(), || self.default.clone())
            .await;
        tracing::info!("Location: {} (from {})", resolved.value.label(), resolved.source);
        resolved
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;

    #[test]
    fn test_parse_ipapi_co_shape() {
        let body = r#"{"city":"Sialkot","region":"Punjab","country":"PK","country_name":"Pakistan",
            "country_code":"PK","latitude":32.49,"longitude":74.52}"#;
        let loc = serde_json::from_str::<GeoResponse>(body).unwrap().into_location().unwrap();
        assert_eq!(loc.city, "Sialkot");
        assert_eq!(loc.country, "Pakistan");
        assert_eq!(loc.country_code, "PK");
        assert_eq!(loc.region, "Punjab");
        assert_eq!(loc.coordinates(), Some((32.49, 74.52)));
    }

    #[test]
    fn test_parse_ip_api_com_shape() {
        let body = r#"{"status":"success","country":"Pakistan","countryCode":"PK","region":"PB",
            "regionName":"Punjab","city":"Lahore","lat":31.55,"lon":74.34}"#;
        let loc = serde_json::from_str::<GeoResponse>(body).unwrap().into_location().unwrap();
        assert_eq!(loc.city, "Lahore");
        assert_eq!(loc.country, "Pakistan");
        assert_eq!(loc.country_code, "PK");
        assert_eq!(loc.region, "Punjab");
    }

    #[test]
    fn test_failure_payloads_rejected() {
        let fail = r#"{"status":"fail","message":"reserved range"}"#;
        assert!(serde_json::from_str::<GeoResponse>(fail).unwrap().into_location().is_err());

        let error = r#"{"error":true,"reason":"RateLimited"}"#;
        assert!(serde_json::from_str::<GeoResponse>(error).unwrap().into_location().is_err());
    }

    #[test]
    fn test_missing_city_rejected() {
        let body = r#"{"country_name":"Pakistan","country_code":"PK"}"#;
        let err = serde_json::from_str::<GeoResponse>(body).unwrap().into_location().unwrap_err();
        assert!(matches!(err, ProviderError::Empty(_)));
    }

    #[test]
    fn test_provider_name_is_host() {
        let provider = IpGeoProvider::new("https://ipapi.co/json/", Arc::new(Client::new()));
        assert_eq!(provider.name, "ipapi.co");
    }

    #[tokio::test]
    async fn test_detection_disabled_returns_default() {
        let config = LocationConfig {
            detect: false,
            ..LocationConfig::default()
        };
        let service = LocationService::new(&config).unwrap();
        let resolved = service.detect().await;
        assert!(resolved.is_fallback());
        assert_eq!(resolved.value.city, "Sialkot");
    }
}
