//! Record store error types.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during record store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Record was not found.
    #[error("Plant not found: {0}")]
    NotFound(u64),

    /// User input rejected; nothing was written.
    #[error("{0}")]
    Validation(String),

    /// The file exists but could not be parsed. It is left untouched.
    #[error("Corrupt data file {path}: {message}")]
    Corrupt { path: PathBuf, message: String },

    /// Filesystem failure (permissions, disk full...).
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize records: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl StoreError {
    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn corrupt(path: &Path, message: impl Into<String>) -> Self {
        Self::Corrupt {
            path: path.to_path_buf(),
            message: message.into(),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    pub fn user_message(&self) -> String {
        match self {
            Self::NotFound(id) => format!("No plant with id {}.", id),
            Self::Validation(message) => message.clone(),
            Self::Corrupt { path, .. } => format!(
                "{} is corrupt. Fix or move it aside; it will not be overwritten.",
                path.display()
            ),
            Self::Io { path, .. } => format!("Could not access {}.", path.display()),
            Self::Serialize(_) => "Could not save your data.".to_string(),
        }
    }
}

/// Result type for record store operations.
pub type StoreResult<T> = Result<T, StoreError>;
