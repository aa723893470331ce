mod db_message;
mod db_session;

pub use db_message::{derive_title, MessageRole, StoredMessage, DEFAULT_SESSION_TITLE};
pub use db_session::{
    ChatSession, NewSession, ProductContext, SessionContext, SessionSummary, SessionUpdate,
};
