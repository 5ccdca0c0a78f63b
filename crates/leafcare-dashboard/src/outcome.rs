//! Result of a user action that may be rejected.

use leafcare_services::{StoreError, StoreResult};
use serde::Serialize;

use crate::error::AppError;

/// Either the action's result or an inline message explaining why nothing
/// was changed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", content = "value", rename_all = "snake_case")]
pub enum Outcome<T> {
    Done(T),
    Rejected(String),
}

impl<T> Outcome<T> {
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected(message.into())
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }

    pub fn done(self) -> Option<T> {
        match self {
            Self::Done(value) => Some(value),
            Self::Rejected(_) => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Self::Done(value) => Outcome::Done(f(value)),
            Self::Rejected(message) => Outcome::Rejected(message),
        }
    }

    /// Validation and not-found errors become `Rejected`; anything else is a
    /// real failure.
    pub fn from_store(result: StoreResult<T>) -> Result<Self, AppError> {
        match result {
            Ok(value) => Ok(Self::Done(value)),
            Err(e @ (StoreError::Validation(_) | StoreError::NotFound(_))) => {
                tracing::debug!("Rejected: {}", e);
                Ok(Self::Rejected(e.user_message()))
            }
            Err(e) => Err(e.into()),
        }
    }
}

impl<T: std::fmt::Display> std::fmt::Display for Outcome<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Done(value) => value.fmt(f),
            Self::Rejected(message) => write!(f, "{}", message),
        }
    }
}
