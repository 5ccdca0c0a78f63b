use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::StoreResult;
use crate::json_file;
use crate::serde_helpers;
use crate::timestamp;

/// Default number of messages kept on disk.
pub const DEFAULT_RETENTION: usize = 100;

/// Default number of messages returned by [`JsonChatLog::recent`].
pub const DEFAULT_RECENT_LIMIT: usize = 50;

/// One question/answer exchange with the assistant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    #[serde(deserialize_with = "timestamp::required")]
    pub timestamp: DateTime<Utc>,
    pub user_message: String,
    pub bot_response: String,
    #[serde(default, deserialize_with = "serde_helpers::non_empty_string")]
    pub plant_context: Option<String>,
}

/// Append-only chat history capped at a retention count.
#[derive(Debug, Clone)]
pub struct JsonChatLog {
    path: PathBuf,
    retention: usize,
}

impl JsonChatLog {
    pub fn new(path: impl Into<PathBuf>, retention: usize) -> Self {
        Self {
            path: path.into(),
            retention: retention.max(1),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All stored messages, oldest first.
    pub fn all(&self) -> StoreResult<Vec<ChatMessage>> {
        Ok(json_file::read(&self.path)?.unwrap_or_default())
    }

    /// The newest `limit` messages in chronological order. `0` returns everything.
    pub fn recent(&self, limit: usize) -> StoreResult<Vec<ChatMessage>> {
        let mut history = self.all()?;
        if limit > 0 && history.len() > limit {
            history.drain(..history.len() - limit);
        }
        Ok(history)
    }

    /// Record an exchange, dropping the oldest entries beyond the retention count.
    pub fn append(
        &self,
        user_message: &str,
        bot_response: &str,
        plant_context: Option<&str>,
        at: DateTime<Utc>,
    ) -> StoreResult<ChatMessage> {
        let mut history = self.all()?;
        let entry = ChatMessage {
            timestamp: at,
            user_message: user_message.to_string(),
            bot_response: bot_response.to_string(),
            plant_context: plant_context
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_string),
        };

        history.push(entry.clone());
        if history.len() > self.retention {
            let excess = history.len() - self.retention;
            history.drain(..excess);
            tracing::debug!("Chat log trimmed {} old message(s)", excess);
        }

        json_file::write(&self.path, &history)?;
        Ok(entry)
    }

    pub fn clear(&self) -> StoreResult<()> {
        json_file::write(&self.path, &Vec::<ChatMessage>::new())
    }
}
