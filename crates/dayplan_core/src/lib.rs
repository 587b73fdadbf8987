//! Core domain logic for the daily planner.
//! This crate is the single source of truth for day record invariants.

pub mod assistant;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use assistant::{
    AssistantConfig, AssistantError, GeminiClient, GeminiConfig, GenerationRequest,
    PlanAssistant, TextGenerator, SUMMARY_FALLBACK,
};
pub use logging::{default_log_level, init_logging, logging_status, LogLevel, LoggingError};
pub use model::day_record::{
    build_default, schedule_slot_times, validate_date, ChecklistItem, DateValidationError,
    DayRecord, DayUpdates, HabitItem, MealField, Meals, Review, ReviewField, ScheduleSlot,
};
pub use repo::kv_repo::{KvRepository, RepoError, RepoResult, SqliteKvRepository};
pub use service::day_store::{storage_key, DayStore, StoreError, STORAGE_PREFIX};
pub use service::planner_session::{PlannerSession, SessionError, SessionResult};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
