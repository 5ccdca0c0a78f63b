//! Botanist chat over an OpenAI-compatible chat-completions API (Groq).

use std::time::Duration;

use leafcare_care::AlertKind;
use leafcare_core::ChatConfig;
use leafcare_weather::WeatherSnapshot;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::AiError;

/// Shown instead of an answer when no chat API key is configured.
pub const NOT_CONFIGURED_REPLY: &str = "I'm here to help with your plant care questions! \
However, the chat API key is not configured. Set GROQ_API_KEY (or chat.api_key in the \
config file) to enable AI chat responses.";

/// Shown when the provider answers with nothing.
pub const EMPTY_REPLY: &str = "I received an empty response. Please try asking your question again.";

/// Token budget for generated alert texts
const ALERT_MAX_TOKENS: u32 = 200;

const ALERT_SYSTEM_PROMPT: &str =
    "You are a helpful garden assistant. Generate friendly, concise alert messages.";

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// System prompt for the botanist persona, embedding the plant context.
pub fn botanist_prompt(context: Option<&str>) -> String {
    let context = context
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .unwrap_or("General plant care");
    format!(
        "You are an expert botanist and plant care advisor. You help users with their \
         gardening questions in a friendly, knowledgeable way.\n\n\
         Plant context: {}\n\n\
         Provide helpful, accurate advice. If you're unsure, say so. Always prioritize \
         plant health and safety. Keep responses concise but informative.",
        context
    )
}

fn alert_prompt(kind: AlertKind, plant: &str, weather: &WeatherSnapshot) -> String {
    match kind {
        AlertKind::Rain => format!(
            "Generate a friendly, helpful alert message for a garden app user.\n\n\
             Situation: Rain is expected soon in {}.\nPlant: {}\nWeather: {}\n\n\
             Write a short, warm message (2-3 sentences) telling the user to move their \
             outdoor plant to shelter. Be conversational and caring, like a helpful friend.",
            weather.city, plant, weather.description
        ),
        AlertKind::Storm => format!(
            "Generate an urgent but calm alert message for a garden app user.\n\n\
             Situation: Severe weather (thunderstorm/hail) is expected in {}.\nPlant: {}\nWeather: {}\n\n\
             Write a clear, urgent message (2-3 sentences) telling the user to immediately \
             move their outdoor plant indoors. Be direct but not alarming.",
            weather.city, plant, weather.description
        ),
        AlertKind::Heat => format!(
            "Generate a helpful reminder for a garden app user.\n\n\
             Situation: Very hot weather ({}°C) and intense sun.\nPlant: {}\nLocation: Outdoor/Open area\n\n\
             Write a friendly reminder (2-3 sentences) to check if the plant needs extra \
             water or shade. Be helpful and caring.",
            weather.temperature, plant
        ),
    }
}

/// Template alert used when the provider is unconfigured or fails.
pub fn default_alert(kind: AlertKind, plant: &str, weather: &WeatherSnapshot) -> String {
    let city = if weather.city.trim().is_empty() {
        "your area"
    } else {
        weather.city.as_str()
    };
    match kind {
        AlertKind::Rain => format!(
            "Rain Alert: Rain is expected in {} soon. Consider moving your {} under shelter!",
            city, plant
        ),
        AlertKind::Storm => format!(
            "Storm Alert: Severe weather is approaching {}. Please move your {} indoors immediately!",
            city, plant
        ),
        AlertKind::Heat => format!(
            "Heat Alert: It's very hot ({}°C) and sunny. Your {} may need extra water or shade. Check the soil moisture!",
            weather.temperature, plant
        ),
    }
}

/// Chat-completions client
#[derive(Debug, Clone)]
pub struct ChatGateway {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl ChatGateway {
    pub fn new(config: &ChatConfig) -> Result<Self, AiError> {
        url::Url::parse(&config.base_url)
            .map_err(|e| AiError::InvalidUrl(format!("{}: {}", config.base_url, e)))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    pub fn is_configured(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    /// Send one system + user exchange and return the trimmed reply.
    #[instrument(skip(self, system, user), level = "debug")]
    pub async fn complete(&self, system: &str, user: &str, max_tokens: u32) -> Result<String, AiError> {
        if !self.is_configured() {
            return Err(AiError::NotConfigured);
        }

        let request = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature: self.temperature,
            max_tokens,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::debug!("Chat completion returned {}: {}", status, body);
            return Err(AiError::from_response(status, &body));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| AiError::InvalidResponse(e.to_string()))?;

        Ok(body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .unwrap_or_default())
    }

    /// Ask the botanist a question. Always returns displayable text.
    #[instrument(skip(self, message, context), level = "info")]
    pub async fn ask(&self, message: &str, context: Option<&str>) -> String {
        let system = botanist_prompt(context);
        match self.complete(&system, message, self.max_tokens).await {
            Ok(reply) if reply.is_empty() => EMPTY_REPLY.to_string(),
            Ok(reply) => reply,
            Err(AiError::NotConfigured) => NOT_CONFIGURED_REPLY.to_string(),
            Err(e) => {
                tracing::warn!("Chat request failed: {}", e);
                e.user_message()
            }
        }
    }

    /// Friendly alert text for a plant, generated when possible.
    #[instrument(skip(self, weather), level = "debug")]
    pub async fn alert_message(&self, kind: AlertKind, plant: &str, weather: &WeatherSnapshot) -> String {
        if !self.is_configured() {
            return default_alert(kind, plant, weather);
        }

        let prompt = alert_prompt(kind, plant, weather);
        match self.complete(ALERT_SYSTEM_PROMPT, &prompt, ALERT_MAX_TOKENS).await {
            Ok(text) if !text.is_empty() => text,
            Ok(_) => default_alert(kind, plant, weather),
            Err(e) => {
                tracing::warn!("Alert generation failed: {}; using template", e);
                default_alert(kind, plant, weather)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;
    use chrono::{TimeZone, Utc};

    fn weather() -> WeatherSnapshot {
        let t = Utc.with_ymd_and_hms(2024, 6, 10, 12, 0, 0).unwrap();
        WeatherSnapshot {
            temperature: 38.0,
            feels_like: 41.0,
            humidity: 40,
            cloud_cover: 0,
            wind_speed: 2.0,
            condition: "Clear".into(),
            description: "clear sky".into(),
            sunrise: t,
            sunset: t,
            city: "Lahore".into(),
            country: "PK".into(),
            fetched_at: t,
        }
    }

    #[test]
    fn test_prompt_embeds_context() {
        assert!(botanist_prompt(Some("Rose on the balcony")).contains("Plant context: Rose on the balcony"));
        assert!(botanist_prompt(Some("  ")).contains("Plant context: General plant care"));
        assert!(botanist_prompt(None).contains("General plant care"));
    }

    #[test]
    fn test_default_alerts() {
        let w = weather();
        assert!(default_alert(AlertKind::Storm, "Basil", &w).contains("move your Basil indoors"));
        assert!(default_alert(AlertKind::Rain, "Basil", &w).contains("Rain is expected in Lahore"));
        assert!(default_alert(AlertKind::Rain, "3 outdoor plants", &w).contains("moving your 3 outdoor plants under"));
        assert!(default_alert(AlertKind::Heat, "Basil", &w).contains("(38°C)"));
    }

    #[tokio::test]
    async fn test_unconfigured_gateway() {
        let gateway = ChatGateway::new(&ChatConfig::default()).unwrap();
        assert!(!gateway.is_configured());
        assert_eq!(gateway.ask("hi", None).await, NOT_CONFIGURED_REPLY);
        let alert = gateway.alert_message(AlertKind::Rain, "Mint", &weather()).await;
        assert!(alert.starts_with("Rain Alert"));
    }

    #[test]
    fn test_rejects_bad_base_url() {
        let config = ChatConfig {
            base_url: "not a url".into(),
            ..ChatConfig::default()
        };
        assert!(matches!(ChatGateway::new(&config), Err(AiError::InvalidUrl(_))));
    }
}
