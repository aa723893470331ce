pub mod advisory;
pub mod health;
pub mod sessions;
