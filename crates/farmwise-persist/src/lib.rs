//! Session store for FarmWise advisory chats.
//!
//! Database-agnostic models plus a [`SessionStore`] trait, with a MongoDB
//! implementation behind a collection repository. Message appends use an
//! atomic `$push` so concurrent sends against the same session may
//! interleave but never lose messages.

pub mod dbs;
pub mod error;
pub mod models;
pub mod trait_client;

pub use dbs::mongo::{MongoChatSession, MongoSessionRepository, MongoSessionStore};
pub use error::{PersistError, Result};
pub use models::{
    derive_title, ChatSession, MessageRole, NewSession, ProductContext, SessionContext,
    SessionSummary, SessionUpdate, StoredMessage, DEFAULT_SESSION_TITLE,
};
pub use trait_client::SessionStore;
