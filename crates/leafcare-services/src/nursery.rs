//! Nearby plant nurseries from OpenStreetMap (Overpass API).
//!
//! Falls back to five synthesised nurseries around the given point when the
//! lookup fails or finds nothing.

use std::sync::Arc;
use std::time::Duration;

use leafcare_core::{FallbackChain, NurseryConfig, Provider, ProviderError, ProviderFuture, Sourced};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Approximate kilometres per degree of latitude
const KM_PER_DEGREE: f64 = 111.0;

/// Point used when no coordinates are known
pub const DEFAULT_COORDINATES: (f64, f64) = (32.4945, 74.5229);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Nursery {
    pub name: String,
    pub address: String,
    pub distance_km: f64,
    pub phone: String,
    pub rating: f64,
    pub latitude: f64,
    pub longitude: f64,
}

impl Nursery {
    pub fn map_url(&self) -> String {
        format!(
            "https://www.google.com/maps/search/?api=1&query={},{}",
            self.latitude, self.longitude
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NurseryQuery {
    pub latitude: f64,
    pub longitude: f64,
    pub radius_km: f64,
}

#[derive(Debug, Deserialize)]
struct OverpassResponse {
    #[serde(default)]
    elements: Vec<OverpassElement>,
}

#[derive(Debug, Deserialize)]
struct OverpassElement {
    lat: Option<f64>,
    lon: Option<f64>,
    #[serde(default)]
    tags: HashMap<String, String>,
}

/// Straight-line distance in km using a flat-earth approximation.
pub fn approximate_distance_km(from: (f64, f64), to: (f64, f64)) -> f64 {
    let dlat = to.0 - from.0;
    let dlon = to.1 - from.1;
    (dlat * dlat + dlon * dlon).sqrt() * KM_PER_DEGREE
}

/// Stable placeholder rating in 4.0..=4.9 derived from the name.
pub fn placeholder_rating(name: &str) -> f64 {
    let sum: u32 = name.bytes().map(u32::from).sum();
    4.0 + f64::from(sum % 10) / 10.0
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

pub fn overpass_query(query: &NurseryQuery) -> String {
    let radius_m = (query.radius_km * 1000.0).round() as i64;
    let around = format!("(around:{},{},{})", radius_m, query.latitude, query.longitude);
    format!(
        "[out:json][timeout:10];(\
         node[\"shop\"=\"garden_centre\"]{around};\
         node[\"amenity\"=\"marketplace\"][\"name\"~\"plant|nursery|garden\",i]{around};\
         node[\"shop\"~\"florist|garden\",i]{around};\
         );out body;",
        around = around
    )
}

struct OverpassProvider {
    client: Arc<Client>,
    url: String,
    max_results: usize,
}

impl OverpassProvider {
    async fn lookup(&self, query: &NurseryQuery) -> Result<Vec<Nursery>, ProviderError> {
        let response = self
            .client
            .get(&self.url)
            .query(&[("data", overpass_query(query))])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::from_status(status, ""));
        }

        let body: OverpassResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::invalid_response(e.to_string()))?;

        let origin = (query.latitude, query.longitude);
        let nurseries: Vec<Nursery> = body
            .elements
            .into_iter()
            .take(self.max_results)
            .map(|element| {
                let lat = element.lat.unwrap_or(query.latitude);
                let lon = element.lon.unwrap_or(query.longitude);
                let tag = |key: &str| element.tags.get(key).filter(|v| !v.is_empty()).cloned();
                let name = tag("name").unwrap_or_else(|| "Plant Nursery".to_string());
                Nursery {
                    rating: placeholder_rating(&name),
                    address: tag("addr:full")
                        .or_else(|| tag("addr:street"))
                        .unwrap_or_else(|| "Address not available".to_string()),
                    phone: tag("phone").unwrap_or_else(|| "N/A".to_string()),
                    distance_km: round1(approximate_distance_km(origin, (lat, lon))),
                    latitude: lat,
                    longitude: lon,
                    name,
                }
            })
            .collect();

        if nurseries.is_empty() {
            return Err(ProviderError::empty("no nurseries in range"));
        }
        Ok(nurseries)
    }
}

impl Provider<NurseryQuery, Vec<Nursery>> for OverpassProvider {
    fn name(&self) -> &str {
        "overpass"
    }

    fn fetch<'a>(&'a self, request: &'a NurseryQuery) -> ProviderFuture<'a, Vec<Nursery>> {
        Box::pin(self.lookup(request))
    }
}

/// Five nurseries around `coordinates` (or [`DEFAULT_COORDINATES`]).
pub fn mock_nurseries(coordinates: Option<(f64, f64)>, city: &str) -> Vec<Nursery> {
    // (name, street, distance km, phone, rating, offset, fixed point)
    const MOCKS: [(&str, &str, f64, &str, f64, (f64, f64), (f64, f64)); 5] = [
        ("Green Valley Plant Nursery", "Main Boulevard", 2.5, "+92 300 1234567", 4.5, (0.02, 0.02), (32.5, 74.5)),
        ("Flora Garden Center", "Garden Road", 4.1, "+92 300 2345678", 4.2, (-0.03, 0.01), (32.48, 74.52)),
        ("Nature's Paradise", "City Center", 5.8, "+92 300 3456789", 4.7, (0.01, -0.02), (32.51, 74.48)),
        ("Botanical Gardens Shop", "Highway Road", 7.2, "+92 300 4567890", 4.0, (-0.04, -0.01), (32.46, 74.49)),
        ("Green Thumb Nursery", "Residential Area", 8.5, "+92 300 5678901", 4.3, (0.03, 0.03), (32.53, 74.53)),
    ];

    MOCKS
        .iter()
        .map(|(name, street, distance, phone, rating, offset, fixed)| {
            let (latitude, longitude) = match coordinates {
                Some((lat, lon)) => (lat + offset.0, lon + offset.1),
                None => *fixed,
            };
            Nursery {
                name: name.to_string(),
                address: format!("{}, {}", street, city),
                distance_km: *distance,
                phone: phone.to_string(),
                rating: *rating,
                latitude,
                longitude,
            }
        })
        .collect()
}

/// Nursery lookup with mock fallback
#[derive(Debug)]
pub struct NurseryService {
    chain: FallbackChain<NurseryQuery, Vec<Nursery>>,
    radius_km: f64,
}

impl NurseryService {
    pub fn new(config: &NurseryConfig) -> Result<Self, reqwest::Error> {
        let timeout = Duration::from_secs(config.timeout_secs);
        let client = Client::builder().timeout(timeout).build()?;

        let provider = OverpassProvider {
            client: Arc::new(client),
            url: config.overpass_url.clone(),
            max_results: config.max_results,
        };

        Ok(Self {
            chain: FallbackChain::new(timeout).with_provider(provider),
            radius_km: config.radius_km,
        })
    }

    pub fn default_radius_km(&self) -> f64 {
        self.radius_km
    }

    /// Nurseries within `radius_km` of `coordinates`.
    ///
    /// Without coordinates no lookup is made and the mock list is returned.
    pub async fn nearby(
        &self,
        coordinates: Option<(f64, f64)>,
        radius_km: Option<f64>,
        city: &str,
    ) -> Sourced<Vec<Nursery>> {
        let Some((latitude, longitude)) = coordinates else {
            tracing::debug!("No coordinates known; using placeholder nurseries");
            return Sourced::fallback(mock_nurseries(None, city));
        };

        let query = NurseryQuery {
            latitude,
            longitude,
            radius_km: radius_km.unwrap_or(self.radius_km),
        };
        self.chain
            .resolve_or_else(&query, || mock_nurseries(coordinates, city))
            .await
    }
}
