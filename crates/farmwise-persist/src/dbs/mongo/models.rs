use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::models::{ChatSession, ProductContext, SessionContext, StoredMessage};

/// MongoDB-specific session model (uses ObjectId)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoChatSession {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub user_id: String,
    pub title: String,
    pub context: SessionContext,
    pub messages: Vec<StoredMessage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_context: Option<ProductContext>,
    pub is_active: bool,
    // Native BSON dates so `updated_at` sorts chronologically, not as a
    // string comparison
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl From<MongoChatSession> for ChatSession {
    fn from(session: MongoChatSession) -> Self {
        Self {
            id: session.id.to_hex(),
            user_id: session.user_id,
            title: session.title,
            context: session.context,
            messages: session.messages,
            product_context: session.product_context,
            is_active: session.is_active,
            created_at: session.created_at,
            updated_at: session.updated_at,
        }
    }
}
