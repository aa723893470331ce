// Gemini-specific client implementation

use crate::traits::{GenerateOptions, GenerateRequest, GenerateResponse, GenerativeClient};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use serde_json::Value;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com";

/// Default model for advisory turns
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Gemini client (HTTP direct, no SDK)
///
/// Talks to the Google Generative Language v1beta REST API. One request per
/// advisory turn; no retries, no streaming. Failures propagate to the caller.
pub struct GeminiClient {
    http_client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl GeminiClient {
    /// Create new client with API key
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http_client,
            base_url: GEMINI_API_BASE.to_string(),
            api_key: api_key.into(),
        })
    }

    /// Build generateContent request payload
    fn build_generate_request(&self, prompt: &str, options: &GenerateOptions) -> Value {
        let mut request = serde_json::json!({
            "contents": [{
                "parts": [{ "text": prompt }]
            }],
        });

        let mut generation_config = serde_json::Map::new();
        if let Some(temp) = options.temperature {
            generation_config.insert("temperature".to_string(), serde_json::json!(temp));
        }
        if let Some(max_tokens) = options.max_output_tokens {
            generation_config.insert("maxOutputTokens".to_string(), serde_json::json!(max_tokens));
        }
        if !generation_config.is_empty() {
            request
                .as_object_mut()
                .expect("request is an object")
                .insert("generationConfig".to_string(), Value::Object(generation_config));
        }

        request
    }
}

#[async_trait]
impl GenerativeClient for GeminiClient {
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse> {
        let payload = self.build_generate_request(&request.prompt, &request.options);
        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, request.model, self.api_key
        );

        tracing::debug!(model = %request.model, "Sending generate request to Gemini API");

        let response = self
            .http_client
            .post(&url)
            .json(&payload)
            .send()
            .await
            .context("Failed to send request")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("Gemini API error ({}): {}", status, error_text);
        }

        let raw: GeminiGenerateResponse = response
            .json()
            .await
            .context("Failed to parse response")?;

        let candidate = raw
            .candidates
            .first()
            .context("Gemini API returned no candidates")?;

        let text: String = candidate
            .content
            .as_ref()
            .map(|content| {
                content
                    .parts
                    .iter()
                    .map(|part| part.text.as_str())
                    .collect()
            })
            .unwrap_or_default();

        let finish_reason = candidate.finish_reason.clone();

        Ok(GenerateResponse {
            text,
            finish_reason,
            raw: serde_json::to_value(raw)?,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct GeminiGenerateResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
    #[serde(rename = "finishReason")]
    finish_reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: String,
}
