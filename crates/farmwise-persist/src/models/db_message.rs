use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sentinel title a session keeps until its first user message arrives
pub const DEFAULT_SESSION_TITLE: &str = "New Chat";

/// One message in a session's conversation order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredMessage {
    pub role: MessageRole,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

impl StoredMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            text: text.into(),
            explanation: None,
            timestamp: Utc::now(),
        }
    }

    pub fn assistant(text: impl Into<String>, explanation: Option<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            text: text.into(),
            explanation,
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

/// Derive a session title from its first user message: the first 50
/// characters, with an ellipsis marker when truncated.
pub fn derive_title(first_user_text: &str) -> String {
    let mut title: String = first_user_text.chars().take(50).collect();
    if first_user_text.chars().count() > 50 {
        title.push_str("...");
    }
    title
}
