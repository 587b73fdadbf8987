//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the key-value data access contract used by the day store.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repositories store opaque strings; record shape is a service concern.

pub mod kv_repo;
