use serde::{Deserialize, Serialize};

use farmwise_persist::{MessageRole, SessionContext, StoredMessage};

/// Request-side context record: the four optional situational fields
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatContext {
    pub crop: String,
    pub stage: String,
    pub location: String,
    pub season: String,
}

impl ChatContext {
    pub fn is_empty(&self) -> bool {
        self.crop.is_empty()
            && self.stage.is_empty()
            && self.location.is_empty()
            && self.season.is_empty()
    }
}

impl From<SessionContext> for ChatContext {
    fn from(context: SessionContext) -> Self {
        Self {
            crop: context.crop,
            stage: context.stage,
            location: context.location,
            season: context.season,
        }
    }
}

impl From<ChatContext> for SessionContext {
    fn from(context: ChatContext) -> Self {
        Self {
            crop: context.crop,
            stage: context.stage,
            location: context.location,
            season: context.season,
        }
    }
}

/// One turn of conversation history, tagged by role.
///
/// Assistant turns sometimes carry an explanation and sometimes not; the
/// prompt builder pattern-matches on the variant to decide how the turn is
/// re-serialized. Wire shape is `{role, text, explanation?}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum ChatTurn {
    User {
        text: String,
    },
    Assistant {
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        explanation: Option<String>,
    },
}

impl From<StoredMessage> for ChatTurn {
    fn from(message: StoredMessage) -> Self {
        match message.role {
            MessageRole::User => ChatTurn::User { text: message.text },
            MessageRole::Assistant => ChatTurn::Assistant {
                text: message.text,
                explanation: message.explanation,
            },
        }
    }
}

/// The advice/explanation pair extracted from a model reply
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedReply {
    pub advice: String,
    pub explanation: String,
}
