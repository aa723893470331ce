mod client;
mod models;
mod repository;

pub use client::MongoSessionStore;
pub use models::MongoChatSession;
pub use repository::MongoSessionRepository;
