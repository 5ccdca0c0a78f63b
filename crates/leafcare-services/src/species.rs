//! Species catalogue search (Perenual).

use std::time::Duration;

use leafcare_core::{ProviderError, SpeciesConfig, Sourced};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::instrument;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesSummary {
    pub id: u64,
    pub common_name: String,
    pub scientific_name: String,
}

/// Perenual returns scientific names as an array; older payloads use a string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

#[derive(Debug, Deserialize)]
struct PerenualSpecies {
    id: u64,
    common_name: Option<String>,
    scientific_name: Option<OneOrMany>,
}

#[derive(Debug, Deserialize)]
struct PerenualList {
    #[serde(default)]
    data: Vec<PerenualSpecies>,
}

impl From<PerenualSpecies> for SpeciesSummary {
    fn from(species: PerenualSpecies) -> Self {
        let scientific_name = match species.scientific_name {
            Some(OneOrMany::One(name)) => Some(name),
            Some(OneOrMany::Many(names)) => names.into_iter().next(),
            None => None,
        };
        Self {
            id: species.id,
            common_name: species.common_name.unwrap_or_else(|| "Unknown".to_string()),
            scientific_name: scientific_name.unwrap_or_else(|| "Unknown".to_string()),
        }
    }
}

/// Built-in results used without a key or when the catalogue is unreachable.
pub fn mock_species(query: &str) -> Vec<SpeciesSummary> {
    const KNOWN: [(&str, u64, &str, &str); 3] = [
        ("rose", 1, "Rose", "Rosa"),
        ("tomato", 2, "Tomato", "Solanum lycopersicum"),
        ("money", 3, "Money Plant", "Epipremnum aureum"),
    ];

    let lower = query.to_lowercase();
    KNOWN
        .iter()
        .find(|(key, ..)| lower.contains(key))
        .map(|(_, id, common, scientific)| {
            vec![SpeciesSummary {
                id: *id,
                common_name: common.to_string(),
                scientific_name: scientific.to_string(),
            }]
        })
        .unwrap_or_else(|| {
            vec![SpeciesSummary {
                id: 999,
                common_name: query.to_string(),
                scientific_name: "Unknown".to_string(),
            }]
        })
}

#[derive(Debug, Clone)]
pub struct SpeciesService {
    client: Client,
    base_url: String,
    api_key: String,
}

impl SpeciesService {
    pub fn new(config: &SpeciesConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    #[instrument(skip(self), level = "debug")]
    async fn fetch(&self, query: &str) -> Result<Vec<SpeciesSummary>, ProviderError> {
        if self.api_key.trim().is_empty() {
            return Err(ProviderError::NotConfigured("Perenual API key not set".to_string()));
        }

        let response = self
            .client
            .get(format!("{}/species-list", self.base_url))
            .query(&[("key", self.api_key.as_str()), ("q", query), ("page", "1")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::from_status(status, ""));
        }

        let list: PerenualList = response
            .json()
            .await
            .map_err(|e| ProviderError::invalid_response(e.to_string()))?;
        Ok(list.data.into_iter().map(SpeciesSummary::from).collect())
    }

    /// Search the catalogue, falling back to the built-in table.
    pub async fn search(&self, query: &str) -> Sourced<Vec<SpeciesSummary>> {
        match self.fetch(query).await {
            Ok(results) => Sourced::provider("perenual", results),
            Err(ProviderError::NotConfigured(reason)) => {
                tracing::debug!("{}; using built-in species", reason);
                Sourced::fallback(mock_species(query))
            }
            Err(e) => {
                tracing::warn!("Species search failed: {}; using built-in species", e);
                Sourced::fallback(mock_species(query))
            }
        }
    }
}
