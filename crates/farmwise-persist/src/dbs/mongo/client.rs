use async_trait::async_trait;
use mongodb::{bson::oid::ObjectId, Client};

use crate::dbs::mongo::repository::MongoSessionRepository;
use crate::error::{PersistError, Result};
use crate::models::{ChatSession, NewSession, SessionSummary, SessionUpdate, StoredMessage};
use crate::trait_client::SessionStore;

/// MongoDB-backed implementation of [`SessionStore`]
pub struct MongoSessionStore {
    repository: MongoSessionRepository,
}

impl MongoSessionStore {
    /// Connect to MongoDB and create the store
    pub async fn connect(mongodb_uri: &str, database: &str) -> Result<Self> {
        let client = Client::with_uri_str(mongodb_uri)
            .await
            .map_err(|e| PersistError::Connection(e.to_string()))?;

        tracing::info!(database, "Connected to MongoDB");

        Ok(Self {
            repository: MongoSessionRepository::new(&client, database),
        })
    }

    fn parse_id(session_id: &str) -> Result<ObjectId> {
        ObjectId::parse_str(session_id)
            .map_err(|_| PersistError::InvalidObjectId(session_id.to_string()))
    }
}

#[async_trait]
impl SessionStore for MongoSessionStore {
    async fn create_session(&self, user_id: &str, new: NewSession) -> Result<ChatSession> {
        let session = self
            .repository
            .create_session(user_id.to_string(), new)
            .await?;
        Ok(session.into())
    }

    async fn list_sessions(&self, user_id: &str) -> Result<Vec<SessionSummary>> {
        let sessions = self.repository.list_sessions(user_id).await?;
        Ok(sessions
            .into_iter()
            .map(|s| ChatSession::from(s).summary())
            .collect())
    }

    async fn get_session(&self, session_id: &str, user_id: &str) -> Result<Option<ChatSession>> {
        let object_id = Self::parse_id(session_id)?;
        let session = self.repository.get_session(object_id, user_id).await?;
        Ok(session.map(Into::into))
    }

    async fn update_session(
        &self,
        session_id: &str,
        user_id: &str,
        update: SessionUpdate,
    ) -> Result<Option<ChatSession>> {
        let object_id = Self::parse_id(session_id)?;
        let session = self
            .repository
            .update_session(object_id, user_id, update)
            .await?;
        Ok(session.map(Into::into))
    }

    async fn append_messages(
        &self,
        session_id: &str,
        user_id: &str,
        messages: Vec<StoredMessage>,
    ) -> Result<Option<ChatSession>> {
        let object_id = Self::parse_id(session_id)?;
        let session = self
            .repository
            .append_messages(object_id, user_id, messages)
            .await?;
        Ok(session.map(Into::into))
    }

    async fn soft_delete_session(&self, session_id: &str, user_id: &str) -> Result<bool> {
        let object_id = Self::parse_id(session_id)?;
        self.repository
            .soft_delete_session(object_id, user_id)
            .await
    }
}
