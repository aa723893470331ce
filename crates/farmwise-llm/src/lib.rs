//! Generative-model client for the FarmWise advisory service.
//!
//! The advisory flow talks to the model through the [`GenerativeClient`]
//! trait so that tests can substitute a scripted fake; [`GeminiClient`] is
//! the production implementation (HTTP direct, no SDK).

pub mod gemini;
pub mod traits;

pub use gemini::{GeminiClient, DEFAULT_MODEL};
pub use traits::{GenerateOptions, GenerateRequest, GenerateResponse, GenerativeClient};
