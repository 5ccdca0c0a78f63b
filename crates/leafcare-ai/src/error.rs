//! AI gateway error types.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AiError {
    #[error("API key not configured")]
    NotConfigured,

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// Model missing, loading or otherwise unavailable
    #[error("Model unavailable: {0}")]
    Model(String),

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl AiError {
    /// Classify a non-success response by status code, then by body text.
    pub fn from_response(status: reqwest::StatusCode, body: &str) -> Self {
        let message = error_message(body);
        let lower = message.to_lowercase();

        match status.as_u16() {
            401 | 403 => Self::Auth(message),
            429 => Self::RateLimited(message),
            404 | 503 => Self::Model(message),
            _ if lower.contains("api_key") || lower.contains("authentication") => Self::Auth(message),
            _ if lower.contains("rate limit") || lower.contains("quota") => Self::RateLimited(message),
            _ if lower.contains("model") => Self::Model(message),
            code => Self::Api {
                status: code,
                message,
            },
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Network(e) if e.is_timeout())
    }

    /// User-friendly error message for display.
    pub fn user_message(&self) -> String {
        match self {
            Self::NotConfigured => "The AI service is not configured. Add an API key to enable it.".to_string(),
            Self::Auth(_) => {
                "API Key Error: the AI provider rejected the key. Check your configuration.".to_string()
            }
            Self::RateLimited(_) => "Rate Limit: too many requests. Please wait a moment and try again.".to_string(),
            Self::Model(_) => {
                "Model Error: the AI model is temporarily unavailable. Please try again in a moment."
                    .to_string()
            }
            Self::Network(e) if e.is_timeout() => "Request timeout. Please try again.".to_string(),
            Self::Network(_) => "Network error. Check your connection.".to_string(),
            Self::Api { status, .. } => format!("Error: the AI provider returned {}. Please try again.", status),
            Self::InvalidResponse(_) => "Error: the AI provider sent an unexpected response.".to_string(),
            Self::InvalidUrl(url) => format!("Error: invalid AI endpoint {}", url),
        }
    }
}

/// Pull `error.message` (OpenAI style) or `error` (Hugging Face style) out of
/// a JSON error body, else return the body as-is.
fn error_message(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return body.trim().to_string();
    };
    let error = &value["error"];
    error["message"]
        .as_str()
        .or_else(|| error.as_str())
        .map(str::to_string)
        .unwrap_or_else(|| body.trim().to_string())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_classify_by_status() {
        assert!(matches!(AiError::from_response(StatusCode::UNAUTHORIZED, ""), AiError::Auth(_)));
        assert!(matches!(
            AiError::from_response(StatusCode::TOO_MANY_REQUESTS, ""),
            AiError::RateLimited(_)
        ));
        assert!(matches!(
            AiError::from_response(StatusCode::SERVICE_UNAVAILABLE, r#"{"error":"Model is loading"}"#),
            AiError::Model(m) if m == "Model is loading"
        ));
    }

    #[test]
    fn test_classify_by_body() {
        let body = r#"{"error":{"message":"The model `llama-9` does not exist","type":"invalid_request_error"}}"#;
        match AiError::from_response(StatusCode::BAD_REQUEST, body) {
            AiError::Model(message) => assert!(message.contains("llama-9")),
            other => panic!("unexpected {:?}", other),
        }

        let err = AiError::from_response(StatusCode::BAD_REQUEST, "Invalid api_key provided");
        assert!(matches!(err, AiError::Auth(_)));

        let err = AiError::from_response(StatusCode::INTERNAL_SERVER_ERROR, "boom");
        assert!(matches!(err, AiError::Api { status: 500, .. }));
    }

    #[test]
    fn test_user_messages() {
        assert!(AiError::Auth(String::new()).user_message().contains("API Key"));
        assert!(AiError::RateLimited(String::new()).user_message().contains("Rate Limit"));
        assert!(AiError::Model(String::new()).user_message().contains("Model Error"));
    }
}
