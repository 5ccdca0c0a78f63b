//! Top-level error type for the dashboard.
//!
//! Handlers only return `Err` for real failures (unreadable data files,
//! services that cannot be built). User mistakes come back as
//! [`Outcome::Rejected`](crate::Outcome::Rejected) instead.

use leafcare_ai::AiError;
use leafcare_services::StoreError;
use leafcare_weather::WeatherError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("Weather service error: {0}")]
    Weather(#[from] WeatherError),

    #[error("AI service error: {0}")]
    Ai(#[from] AiError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Output error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl AppError {
    /// Returns a user-friendly message suitable for the terminal.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Store(e) => e.user_message(),
            AppError::Weather(e) => e.user_message().to_string(),
            AppError::Ai(e) => e.user_message(),
            AppError::Http(_) => "A network client could not be created.".to_string(),
            AppError::Json(_) => "Could not format the output.".to_string(),
            AppError::Other(_) => "An unexpected error occurred. Please try again.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_messages_pass_through() {
        let err = AppError::from(StoreError::NotFound(7));
        assert_eq!(err.user_message(), "No plant with id 7.");
    }

    #[test]
    fn test_other_is_generic() {
        let err = AppError::from(anyhow::anyhow!("boom"));
        assert_eq!(err.to_string(), "boom");
        assert!(err.user_message().contains("unexpected"));
    }
}
