use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::db_message::{MessageRole, StoredMessage};

/// Database-agnostic chat session model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSession {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub context: SessionContext,
    pub messages: Vec<StoredMessage>,
    pub product_context: Option<ProductContext>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ChatSession {
    /// List-view projection: title, crop, message count, and the first 80
    /// characters of the last message.
    pub fn summary(&self) -> SessionSummary {
        let last_message = self
            .messages
            .last()
            .map(|m| m.text.chars().take(80).collect())
            .unwrap_or_default();

        SessionSummary {
            id: self.id.clone(),
            title: self.title.clone(),
            crop: self.context.crop.clone(),
            message_count: self.messages.len(),
            last_message,
            updated_at: self.updated_at,
            created_at: self.created_at,
        }
    }

    pub fn first_user_message(&self) -> Option<&StoredMessage> {
        self.messages.iter().find(|m| m.role == MessageRole::User)
    }
}

/// The four optional situational fields that bias advice generation.
/// All default to empty string, matching the stored document schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionContext {
    pub crop: String,
    pub stage: String,
    pub location: String,
    pub season: String,
}

impl SessionContext {
    pub fn is_empty(&self) -> bool {
        self.crop.is_empty()
            && self.stage.is_empty()
            && self.location.is_empty()
            && self.season.is_empty()
    }
}

/// Optional product descriptor attached at session creation.
///
/// The wire accepts either a plain product name or a structured descriptor,
/// so this is an untagged enum.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProductContext {
    Name(String),
    Details {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        price: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        category: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        seller: Option<String>,
    },
}

/// Fields for creating a session; absent title defaults to the sentinel
#[derive(Debug, Clone, Default)]
pub struct NewSession {
    pub title: Option<String>,
    pub context: SessionContext,
    pub messages: Vec<StoredMessage>,
    pub product_context: Option<ProductContext>,
}

/// Wholesale replacement of session fields; `None` leaves a field untouched
#[derive(Debug, Clone, Default)]
pub struct SessionUpdate {
    pub title: Option<String>,
    pub context: Option<SessionContext>,
    pub messages: Option<Vec<StoredMessage>>,
}

/// List-view projection of a session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSummary {
    pub id: String,
    pub title: String,
    pub crop: String,
    pub message_count: usize,
    pub last_message: String,
    pub updated_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}
