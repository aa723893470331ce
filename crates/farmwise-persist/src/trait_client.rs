use async_trait::async_trait;

use crate::error::Result;
use crate::models::{ChatSession, NewSession, SessionSummary, SessionUpdate, StoredMessage};

/// Trait for session persistence operations
///
/// Every id-taking operation also takes the owning user; a session owned by
/// another user behaves as absent. Implementations must make
/// `append_messages` atomic with respect to concurrent appends.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Create a new session; an absent title defaults to the sentinel
    async fn create_session(&self, user_id: &str, new: NewSession) -> Result<ChatSession>;

    /// List active sessions for a user, most recently updated first
    async fn list_sessions(&self, user_id: &str) -> Result<Vec<SessionSummary>>;

    /// Get a session by id; soft-deleted sessions are still returned
    async fn get_session(&self, session_id: &str, user_id: &str) -> Result<Option<ChatSession>>;

    /// Replace title/context/messages wholesale
    async fn update_session(
        &self,
        session_id: &str,
        user_id: &str,
        update: SessionUpdate,
    ) -> Result<Option<ChatSession>>;

    /// Append messages to the end of the conversation; triggers the
    /// auto-title rule when the title is still the sentinel
    async fn append_messages(
        &self,
        session_id: &str,
        user_id: &str,
        messages: Vec<StoredMessage>,
    ) -> Result<Option<ChatSession>>;

    /// Flip `is_active` to false; returns whether a session matched
    async fn soft_delete_session(&self, session_id: &str, user_id: &str) -> Result<bool>;
}
