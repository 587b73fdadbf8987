//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into day-level planner APIs.
//! - Keep CLI and other callers decoupled from storage details.

pub mod day_store;
pub mod planner_session;
