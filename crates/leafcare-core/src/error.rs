//! Shared error types for LeafCare.
//!
//! `ProviderError` covers every external HTTP collaborator (weather,
//! geolocation, AI gateways, nursery and species lookups). Callers treat it as
//! recoverable: they log it and move on to the next provider or the static
//! fallback. `ConfigError` covers the configuration file.

use thiserror::Error;

/// Failure of a single external provider call.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProviderError {
    /// No credentials configured; the provider was never contacted.
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Server returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The provider answered but had nothing usable (no city, no results...).
    #[error("Empty response: {0}")]
    Empty(String),
}

impl ProviderError {
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse(message.into())
    }

    pub fn empty(message: impl Into<String>) -> Self {
        Self::Empty(message.into())
    }

    /// Build an error from a non-success HTTP status.
    pub fn from_status(status: reqwest::StatusCode, body: impl Into<String>) -> Self {
        Self::Status {
            status: status.as_u16(),
            message: body.into(),
        }
    }

    /// Whether the provider rejected our credentials.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::Status { status: 401 | 403, .. })
    }

    /// Whether the provider is throttling us.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::Status { status: 429, .. })
    }

    /// Returns a user-friendly message suitable for display.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::NotConfigured(_) => "This service is not configured. Showing default data.",
            Self::Timeout => "The request timed out. Showing default data.",
            Self::ConnectionFailed(_) => "Unable to connect. Check your internet connection.",
            Self::Status { status, .. } if *status == 401 || *status == 403 => {
                "The API key was rejected. Check your settings."
            }
            Self::Status { status: 429, .. } => "Too many requests. Please wait a moment.",
            Self::Status { status, .. } if *status >= 500 => {
                "The service is experiencing issues. Please try again later."
            }
            Self::Status { .. } => "The request failed. Please try again.",
            Self::InvalidResponse(_) => "Received an unexpected response.",
            Self::Empty(_) => "The service returned no data.",
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Configuration parse error: {0}")]
    ParseError(String),
}

impl ConfigError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ConfigError::NotFound(_) => "Configuration not found. Using defaults.",
            ConfigError::Invalid(_) => "Invalid configuration. Check your settings.",
            ConfigError::ParseError(_) => "Configuration file is malformed. Check your settings.",
        }
    }
}

/// Extension trait for converting reqwest errors to our error types.
pub trait ReqwestErrorExt {
    fn into_provider_error(self) -> ProviderError;
}

impl ReqwestErrorExt for reqwest::Error {
    fn into_provider_error(self) -> ProviderError {
        if self.is_timeout() {
            ProviderError::Timeout
        } else if self.is_connect() {
            ProviderError::ConnectionFailed(self.to_string())
        } else if self.is_decode() {
            ProviderError::InvalidResponse(self.to_string())
        } else if let Some(status) = self.status() {
            ProviderError::Status {
                status: status.as_u16(),
                message: self.to_string(),
            }
        } else {
            ProviderError::ConnectionFailed(self.to_string())
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(error: reqwest::Error) -> Self {
        error.into_provider_error()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;

    #[test]
    fn test_status_classification() {
        let unauthorized = ProviderError::from_status(reqwest::StatusCode::UNAUTHORIZED, "bad key");
        assert!(unauthorized.is_auth_failure());
        assert!(!unauthorized.is_rate_limited());

        let throttled = ProviderError::from_status(reqwest::StatusCode::TOO_MANY_REQUESTS, "");
        assert!(throttled.is_rate_limited());
        assert!(!throttled.is_auth_failure());
    }

    #[test]
    fn test_user_messages() {
        assert!(ProviderError::Timeout.user_message().contains("timed out"));
        assert!(ProviderError::from_status(reqwest::StatusCode::BAD_GATEWAY, "")
            .user_message()
            .contains("later"));
        assert!(ProviderError::from_status(reqwest::StatusCode::FORBIDDEN, "")
            .user_message()
            .contains("API key"));
        assert!(ConfigError::ParseError("x".into()).user_message().contains("malformed"));
    }

    #[test]
    fn test_display_includes_status() {
        let err = ProviderError::from_status(reqwest::StatusCode::NOT_FOUND, "city not found");
        let text = err.to_string();
        assert!(text.contains("404"));
        assert!(text.contains("city not found"));
    }
}
