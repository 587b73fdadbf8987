//! Plan assistant adapter over an external text-generation service.
//!
//! # Responsibility
//! - Turn free-text day descriptions into partial day record updates.
//! - Produce a short natural-language summary of a finished day.
//! - Keep the service behind the [`TextGenerator`] seam so tests and other
//!   backends can stand in for it.
//!
//! # Invariants
//! - One request per call; no retry, no cancellation, no timeout beyond
//!   what the transport applies.
//! - Outcomes are success or failure only; failures never mutate records.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod draft;
pub mod gemini;
pub mod planner;
pub mod prompt;

pub use draft::{reconcile_draft, DraftMeals, DraftResponse, DraftSlot};
pub use gemini::{GeminiClient, GeminiConfig};
pub use planner::{AssistantConfig, PlanAssistant, SUMMARY_FALLBACK};

/// Failure talking to, or interpreting, the text-generation service.
#[derive(Debug)]
pub enum AssistantError {
    /// User text was blank; nothing was sent.
    EmptyInput,
    /// No API key was configured for the service.
    MissingApiKey,
    /// Transport or HTTP-level failure.
    RequestFailed { message: String },
    /// Service answered without any usable text.
    EmptyResponse,
    /// Text did not match the expected structure.
    InvalidResponse { message: String },
}

impl Display for AssistantError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyInput => write!(f, "assistant input is empty"),
            Self::MissingApiKey => write!(f, "text-generation API key is not configured"),
            Self::RequestFailed { message } => {
                write!(f, "text-generation request failed: {message}")
            }
            Self::EmptyResponse => write!(f, "text-generation service returned no text"),
            Self::InvalidResponse { message } => {
                write!(f, "unexpected text-generation response: {message}")
            }
        }
    }
}

impl Error for AssistantError {}

/// One prompt sent to the service.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub prompt: String,
    /// When set, the service is asked for JSON matching this schema.
    pub response_schema: Option<serde_json::Value>,
}

impl GenerationRequest {
    /// Free-text request.
    pub fn text(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            response_schema: None,
        }
    }

    /// Structured JSON request constrained by `schema`.
    pub fn structured(prompt: impl Into<String>, schema: serde_json::Value) -> Self {
        Self {
            prompt: prompt.into(),
            response_schema: Some(schema),
        }
    }
}

/// External text-generation dependency.
pub trait TextGenerator {
    /// Sends one request and returns the raw response text.
    fn generate(&self, request: &GenerationRequest) -> Result<String, AssistantError>;
}

impl<T: TextGenerator + ?Sized> TextGenerator for &T {
    fn generate(&self, request: &GenerationRequest) -> Result<String, AssistantError> {
        (**self).generate(request)
    }
}
