mod client;

pub use client::{GeminiClient, DEFAULT_MODEL};
