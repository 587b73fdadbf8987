//! Plan assistant use-cases: draft a day from text, summarize a day.
//!
//! # Responsibility
//! - Build prompts, call the text generator once, interpret the answer.
//! - Classify every outcome as success or failure.
//!
//! # Invariants
//! - `draft_from_text` never mutates the caller's record; callers apply
//!   the returned updates only on success.
//! - `summarize` never fails outward; failures yield [`SUMMARY_FALLBACK`].
//! - Prompts and responses are not logged; only sizes and error kinds.

use super::draft::{reconcile_draft, DraftResponse};
use super::prompt::{draft_prompt, draft_response_schema, summary_prompt};
use super::{AssistantError, GenerationRequest, TextGenerator};
use crate::model::day_record::{DayRecord, DayUpdates};
use log::{info, warn};
use std::time::Instant;

/// Text returned by `summarize` when no review could be produced.
pub const SUMMARY_FALLBACK: &str = "Sorry, the day review is not available right now.";

/// Assistant behavior settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssistantConfig {
    /// Language the service is asked to answer in.
    pub response_language: String,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            response_language: "English".to_string(),
        }
    }
}

/// Stateless adapter between planner records and a [`TextGenerator`].
pub struct PlanAssistant<G: TextGenerator> {
    generator: G,
    config: AssistantConfig,
}

impl<G: TextGenerator> PlanAssistant<G> {
    pub fn new(generator: G) -> Self {
        Self::with_config(generator, AssistantConfig::default())
    }

    pub fn with_config(generator: G, config: AssistantConfig) -> Self {
        Self { generator, config }
    }

    /// Drafts schedule, priorities, todos and meals from free text.
    ///
    /// # Errors
    /// - `EmptyInput` when `user_text` is blank (no request is sent).
    /// - Any generator failure, `EmptyResponse` for blank text, and
    ///   `InvalidResponse` when the text is not the expected JSON object.
    pub fn draft_from_text(
        &self,
        date: &str,
        current: &DayRecord,
        user_text: &str,
    ) -> Result<DayUpdates, AssistantError> {
        let user_text = user_text.trim();
        if user_text.is_empty() {
            return Err(AssistantError::EmptyInput);
        }

        let started_at = Instant::now();
        let request = GenerationRequest::structured(
            draft_prompt(date, current, user_text, &self.config.response_language),
            draft_response_schema(),
        );

        let result = self
            .generator
            .generate(&request)
            .and_then(|text| parse_draft(&text))
            .map(|draft| reconcile_draft(current, &draft));

        match &result {
            Ok(updates) => info!(
                "event=assistant_draft module=assistant status=ok date={} duration_ms={} input_chars={} top3={} schedule={} todos={} meals={}",
                date,
                started_at.elapsed().as_millis(),
                user_text.chars().count(),
                updates.top_priorities.is_some(),
                updates.schedule.is_some(),
                updates.todos.is_some(),
                updates.meals.is_some()
            ),
            Err(err) => warn!(
                "event=assistant_draft module=assistant status=error date={} duration_ms={} error={}",
                date,
                started_at.elapsed().as_millis(),
                err
            ),
        }
        result
    }

    /// Returns a short encouraging review of `record`, or the fallback text.
    pub fn summarize(&self, record: &DayRecord) -> String {
        let started_at = Instant::now();
        let request =
            GenerationRequest::text(summary_prompt(record, &self.config.response_language));

        match self.generator.generate(&request) {
            Ok(text) if !text.trim().is_empty() => {
                info!(
                    "event=assistant_summary module=assistant status=ok date={} duration_ms={}",
                    record.date,
                    started_at.elapsed().as_millis()
                );
                text.trim().to_string()
            }
            Ok(_) => {
                warn!(
                    "event=assistant_summary module=assistant status=error date={} error={}",
                    record.date,
                    AssistantError::EmptyResponse
                );
                SUMMARY_FALLBACK.to_string()
            }
            Err(err) => {
                warn!(
                    "event=assistant_summary module=assistant status=error date={} error={}",
                    record.date, err
                );
                SUMMARY_FALLBACK.to_string()
            }
        }
    }
}

fn parse_draft(text: &str) -> Result<DraftResponse, AssistantError> {
    if text.trim().is_empty() {
        return Err(AssistantError::EmptyResponse);
    }
    DraftResponse::parse(text).map_err(|e| AssistantError::InvalidResponse {
        message: e.to_string(),
    })
}
