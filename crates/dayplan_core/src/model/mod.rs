//! Planner domain model.
//!
//! # Responsibility
//! - Define the canonical day record structure used by store and services.
//! - Keep default construction and range rules next to the data they guard.
//!
//! # Invariants
//! - Every record surfaced by core has all fields populated.
//! - A record is identified by its `YYYY-MM-DD` date.

pub mod day_record;
