//! Gemini `generateContent` client.
//!
//! # Responsibility
//! - Send prompts to the Gemini REST API over blocking HTTPS.
//! - Request JSON-mode output when a response schema is supplied.
//! - Extract the candidate text from the response envelope.
//!
//! # Invariants
//! - The API key is sent as a header and never logged or printed.
//! - No explicit request timeout is configured.

use super::{AssistantError, GenerationRequest, TextGenerator};
use log::{debug, error};
use serde_json::{json, Value};
use std::fmt::{Debug, Formatter};
use std::time::Instant;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
const API_KEY_ENV_VARS: &[&str] = &["GEMINI_API_KEY", "API_KEY"];

/// Connection settings for the Gemini API.
#[derive(Clone)]
pub struct GeminiConfig {
    /// Scheme + host, without trailing slash.
    pub base_url: String,
    pub model: String,
    pub api_key: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: String::new(),
        }
    }
}

impl GeminiConfig {
    /// Default endpoint and model, with the key read from `GEMINI_API_KEY`
    /// or `API_KEY` (first non-empty wins).
    pub fn from_env() -> Self {
        let api_key = API_KEY_ENV_VARS
            .iter()
            .filter_map(|name| std::env::var(name).ok())
            .map(|value| value.trim().to_string())
            .find(|value| !value.is_empty())
            .unwrap_or_default();
        Self {
            api_key,
            ..Self::default()
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

impl Debug for GeminiConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key_set", &!self.api_key.is_empty())
            .finish()
    }
}

/// Blocking Gemini client.
pub struct GeminiClient {
    config: GeminiConfig,
    agent: ureq::Agent,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Self {
        Self {
            config,
            agent: ureq::AgentBuilder::new().build(),
        }
    }
}

impl Debug for GeminiClient {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("config", &self.config)
            .finish()
    }
}

impl TextGenerator for GeminiClient {
    fn generate(&self, request: &GenerationRequest) -> Result<String, AssistantError> {
        if self.config.api_key.is_empty() {
            return Err(AssistantError::MissingApiKey);
        }

        let started_at = Instant::now();
        let body = request_body(request);
        let body_str = serde_json::to_string(&body).map_err(|e| AssistantError::RequestFailed {
            message: format!("JSON serialize error: {e}"),
        })?;

        let resp = self
            .agent
            .post(&self.config.endpoint())
            .set("Content-Type", "application/json")
            .set("x-goog-api-key", &self.config.api_key)
            .send_string(&body_str)
            .map_err(|e| {
                let message = match e {
                    ureq::Error::Status(code, _) => format!("server returned status {code}"),
                    ureq::Error::Transport(transport) => transport.to_string(),
                };
                error!(
                    "event=assistant_http module=assistant status=error model={} duration_ms={} error={}",
                    self.config.model,
                    started_at.elapsed().as_millis(),
                    message
                );
                AssistantError::RequestFailed { message }
            })?;

        let resp_str = resp
            .into_string()
            .map_err(|e| AssistantError::InvalidResponse {
                message: e.to_string(),
            })?;
        let json: Value =
            serde_json::from_str(&resp_str).map_err(|e| AssistantError::InvalidResponse {
                message: e.to_string(),
            })?;

        debug!(
            "event=assistant_http module=assistant status=ok model={} duration_ms={} structured={}",
            self.config.model,
            started_at.elapsed().as_millis(),
            request.response_schema.is_some()
        );

        candidate_text(&json).ok_or(AssistantError::EmptyResponse)
    }
}

fn request_body(request: &GenerationRequest) -> Value {
    let mut body = json!({
        "contents": [{
            "role": "user",
            "parts": [{ "text": request.prompt }],
        }],
    });
    if let Some(schema) = &request.response_schema {
        body["generationConfig"] = json!({
            "responseMimeType": "application/json",
            "responseSchema": schema,
        });
    }
    body
}

/// Concatenated text parts of the first candidate, if any non-empty text.
fn candidate_text(response: &Value) -> Option<String> {
    let text = response["candidates"][0]["content"]["parts"]
        .as_array()?
        .iter()
        .filter_map(|part| part["text"].as_str())
        .collect::<String>();
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}
