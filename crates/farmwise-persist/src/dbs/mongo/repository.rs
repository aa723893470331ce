use chrono::Utc;
use futures::TryStreamExt;
use mongodb::options::ReturnDocument;
use mongodb::{bson, bson::doc, bson::oid::ObjectId, Client, Collection};

use crate::dbs::mongo::models::MongoChatSession;
use crate::error::Result;
use crate::models::{derive_title, NewSession, SessionUpdate, StoredMessage, DEFAULT_SESSION_TITLE};

/// Collection wrapper for `chat_sessions`
///
/// Every filter that takes a session id also filters on `user_id`, so a
/// foreign-owned session is indistinguishable from a missing one.
#[derive(Clone)]
pub struct MongoSessionRepository {
    collection: Collection<MongoChatSession>,
}

impl MongoSessionRepository {
    pub fn new(client: &Client, db_name: &str) -> Self {
        let collection = client.database(db_name).collection("chat_sessions");
        Self { collection }
    }

    /// Create a new session
    pub async fn create_session(
        &self,
        user_id: String,
        new: NewSession,
    ) -> Result<MongoChatSession> {
        let now = Utc::now();
        let session = MongoChatSession {
            id: ObjectId::new(),
            user_id,
            title: new.title.unwrap_or_else(|| DEFAULT_SESSION_TITLE.to_string()),
            context: new.context,
            messages: new.messages,
            product_context: new.product_context,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        self.collection.insert_one(&session).await?;
        Ok(session)
    }

    /// List active sessions for a user, most recently updated first
    pub async fn list_sessions(&self, user_id: &str) -> Result<Vec<MongoChatSession>> {
        let filter = doc! { "user_id": user_id, "is_active": true };
        let sessions = self
            .collection
            .find(filter)
            .sort(doc! { "updated_at": -1 })
            .await?
            .try_collect()
            .await?;
        Ok(sessions)
    }

    /// Get a session by id; soft-deleted sessions remain readable
    pub async fn get_session(
        &self,
        session_id: ObjectId,
        user_id: &str,
    ) -> Result<Option<MongoChatSession>> {
        let filter = doc! { "_id": session_id, "user_id": user_id };
        Ok(self.collection.find_one(filter).await?)
    }

    /// Replace title/context/messages wholesale
    pub async fn update_session(
        &self,
        session_id: ObjectId,
        user_id: &str,
        update: SessionUpdate,
    ) -> Result<Option<MongoChatSession>> {
        let mut set = doc! { "updated_at": bson::DateTime::from_chrono(Utc::now()) };
        if let Some(title) = update.title {
            set.insert("title", title);
        }
        if let Some(context) = update.context {
            set.insert("context", bson::to_bson(&context)?);
        }
        if let Some(messages) = update.messages {
            set.insert("messages", bson::to_bson(&messages)?);
        }

        let filter = doc! { "_id": session_id, "user_id": user_id };
        let updated = self
            .collection
            .find_one_and_update(filter, doc! { "$set": set })
            .return_document(ReturnDocument::After)
            .await?;
        Ok(updated)
    }

    /// Append messages atomically with `$push $each`
    ///
    /// Concurrent appends against the same session may interleave but never
    /// lose messages. The auto-title update afterwards is guarded by the
    /// sentinel title in its filter, so it is idempotent under the same race.
    pub async fn append_messages(
        &self,
        session_id: ObjectId,
        user_id: &str,
        messages: Vec<StoredMessage>,
    ) -> Result<Option<MongoChatSession>> {
        let filter = doc! { "_id": session_id, "user_id": user_id };
        let update = doc! {
            "$push": { "messages": { "$each": bson::to_bson(&messages)? } },
            "$set": { "updated_at": bson::DateTime::from_chrono(Utc::now()) },
        };

        let updated = self
            .collection
            .find_one_and_update(filter, update)
            .return_document(ReturnDocument::After)
            .await?;

        let Some(mut session) = updated else {
            return Ok(None);
        };

        if session.title == DEFAULT_SESSION_TITLE {
            if let Some(first_user) = session
                .messages
                .iter()
                .find(|m| m.role == crate::models::MessageRole::User)
            {
                let title = derive_title(&first_user.text);
                let titled = self
                    .collection
                    .find_one_and_update(
                        doc! {
                            "_id": session_id,
                            "user_id": user_id,
                            "title": DEFAULT_SESSION_TITLE,
                        },
                        doc! { "$set": { "title": title.clone() } },
                    )
                    .return_document(ReturnDocument::After)
                    .await?;
                match titled {
                    Some(titled) => session = titled,
                    // A racing append already set the same derived title
                    None => session.title = title,
                }
            }
        }

        Ok(Some(session))
    }

    /// Soft delete: flip `is_active` to false
    pub async fn soft_delete_session(&self, session_id: ObjectId, user_id: &str) -> Result<bool> {
        let filter = doc! { "_id": session_id, "user_id": user_id };
        let update = doc! {
            "$set": { "is_active": false, "updated_at": bson::DateTime::from_chrono(Utc::now()) }
        };
        let deleted = self.collection.find_one_and_update(filter, update).await?;
        Ok(deleted.is_some())
    }
}
