//! Image identification and health captioning over the Hugging Face
//! inference API.

use std::time::Duration;

use leafcare_core::VisionConfig;
use reqwest::Client;
use tracing::instrument;

use crate::classify::{Identification, IdentificationTable};
use crate::error::AiError;
use crate::health::{classify_health, HealthAssessment};

/// Extract the free-text answer from an inference response.
///
/// Captioning models return `[{"generated_text": ..}]`, question-answering
/// models `[{"answer": ..}]`; some deployments drop the array.
pub fn extract_text(value: &serde_json::Value) -> Result<String, AiError> {
    if let Some(error) = value.get("error").and_then(|e| e.as_str()) {
        return Err(AiError::Model(error.to_string()));
    }

    let item = match value {
        serde_json::Value::Array(items) => items
            .first()
            .ok_or_else(|| AiError::InvalidResponse("empty result list".to_string()))?,
        other => other,
    };

    ["generated_text", "answer"]
        .iter()
        .find_map(|key| item.get(key).and_then(|v| v.as_str()))
        .map(|text| text.trim().to_string())
        .ok_or_else(|| AiError::InvalidResponse(format!("no text in {}", item)))
}

/// Vision inference client
#[derive(Debug, Clone)]
pub struct VisionGateway {
    client: Client,
    base_url: String,
    api_key: String,
    identification_model: String,
    health_model: String,
    table: IdentificationTable,
}

impl VisionGateway {
    pub fn new(config: &VisionConfig) -> Result<Self, AiError> {
        url::Url::parse(&config.base_url)
            .map_err(|e| AiError::InvalidUrl(format!("{}: {}", config.base_url, e)))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            identification_model: config.identification_model.clone(),
            health_model: config.health_model.clone(),
            table: IdentificationTable::from(config),
        })
    }

    pub fn is_configured(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    /// POST raw image bytes to `model` and return its text answer.
    #[instrument(skip(self, image), fields(bytes = image.len()), level = "debug")]
    pub async fn describe(&self, model: &str, image: &[u8]) -> Result<String, AiError> {
        if !self.is_configured() {
            return Err(AiError::NotConfigured);
        }

        let response = self
            .client
            .post(format!("{}/{}", self.base_url, model))
            .bearer_auth(&self.api_key)
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(image.to_vec())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::debug!("Vision model {} returned {}: {}", model, status, body);
            return Err(AiError::from_response(status, &body));
        }

        let value: serde_json::Value = response
            .json()
            .await
            .map_err(|e| AiError::InvalidResponse(e.to_string()))?;
        extract_text(&value)
    }

    /// Identify the plant in an image.
    ///
    /// Never fails: a missing key or provider error yields `Unrecognized`.
    #[instrument(skip(self, image), level = "info")]
    pub async fn identify(&self, image: &[u8]) -> Identification {
        match self.describe(&self.identification_model, image).await {
            Ok(text) => {
                tracing::debug!("Vision answer: {}", text);
                self.table.classify(&text)
            }
            Err(AiError::NotConfigured) => {
                tracing::debug!("Vision key not set; skipping identification");
                Identification::unrecognized("")
            }
            Err(e) => {
                tracing::warn!("Plant identification failed: {}", e);
                Identification::unrecognized("")
            }
        }
    }

    /// Caption the image and assess the plant's health from the caption.
    #[instrument(skip(self, image), level = "info")]
    pub async fn assess_health(
        &self,
        image: &[u8],
        question: Option<&str>,
    ) -> Result<HealthAssessment, AiError> {
        let caption = self.describe(&self.health_model, image).await?;
        Ok(classify_health(&caption).with_question(question))
    }
}
