//! Per-date day record persistence with default-overlay reads.
//!
//! # Responsibility
//! - Persist whole day records as JSON under `{STORAGE_PREFIX}{date}`.
//! - Load records so that partial, stale or corrupt stored values never
//!   surface as missing fields.
//! - Enumerate dates that have stored data.
//!
//! # Invariants
//! - `load` never fails and always returns a fully populated record whose
//!   `date` equals the requested date.
//! - The overlay is shallow: a present stored field replaces the default
//!   field wholesale, including arrays.
//! - `save` failures are logged and swallowed; the caller's in-memory record
//!   stays authoritative for the session.

use crate::model::day_record::{
    build_default, validate_date, DateValidationError, DayRecord, DayUpdates,
};
use crate::repo::kv_repo::{KvRepository, RepoError};
use log::{debug, error, warn};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Namespace prefix for every day record key.
pub const STORAGE_PREFIX: &str = "aesthetic_planner_";

/// Builds the storage key for `date`.
pub fn storage_key(date: &str) -> String {
    format!("{STORAGE_PREFIX}{date}")
}

/// Write-path error for day records.
#[derive(Debug)]
pub enum StoreError {
    InvalidDate(DateValidationError),
    Serialize(serde_json::Error),
    Repo(RepoError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidDate(err) => write!(f, "{err}"),
            Self::Serialize(err) => write!(f, "failed to serialize day record: {err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidDate(err) => Some(err),
            Self::Serialize(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<DateValidationError> for StoreError {
    fn from(value: DateValidationError) -> Self {
        Self::InvalidDate(value)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialize(value)
    }
}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Day record store over any key-value repository.
pub struct DayStore<R: KvRepository> {
    repo: R,
}

impl<R: KvRepository> DayStore<R> {
    /// Creates a store using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Writes the full record under its date key.
    ///
    /// Failures are logged and not returned.
    pub fn save(&self, record: &DayRecord) {
        if let Err(err) = self.try_save(record) {
            error!(
                "event=day_save module=store status=error date={} error={}",
                record.date, err
            );
        }
    }

    /// Writes the full record under its date key, returning any failure.
    ///
    /// # Errors
    /// - `InvalidDate` when `record.date` is not `YYYY-MM-DD`.
    /// - `Serialize`/`Repo` when encoding or the write fails.
    pub fn try_save(&self, record: &DayRecord) -> Result<(), StoreError> {
        validate_date(&record.date)?;
        let payload = serde_json::to_string(record)?;
        self.repo.put(&storage_key(&record.date), &payload)?;
        debug!(
            "event=day_save module=store status=ok date={} bytes={}",
            record.date,
            payload.len()
        );
        Ok(())
    }

    /// Loads the record for `date`, filling anything missing from defaults.
    pub fn load(&self, date: &str) -> DayRecord {
        let stored = match self.repo.get(&storage_key(date)) {
            Ok(stored) => stored,
            Err(err) => {
                error!(
                    "event=day_load module=store status=error date={} error_code=read_failed error={}",
                    date, err
                );
                None
            }
        };

        let Some(payload) = stored else {
            return build_default(date);
        };

        match serde_json::from_str::<Value>(&payload) {
            Ok(Value::Object(fields)) => overlay_onto_default(date, &fields),
            Ok(other) => {
                warn!(
                    "event=day_load module=store status=error date={} error_code=not_an_object kind={}",
                    date,
                    json_kind(&other)
                );
                build_default(date)
            }
            Err(err) => {
                warn!(
                    "event=day_load module=store status=error date={} error_code=parse_failed error={}",
                    date, err
                );
                build_default(date)
            }
        }
    }

    /// Returns the date suffix of every stored record key.
    ///
    /// Order follows the repository; callers sort when they need to.
    pub fn list_stored_dates(&self) -> Vec<String> {
        match self.repo.keys_with_prefix(STORAGE_PREFIX) {
            Ok(keys) => keys
                .into_iter()
                .filter_map(|key| key.strip_prefix(STORAGE_PREFIX).map(str::to_string))
                .collect(),
            Err(err) => {
                error!("event=day_list module=store status=error error={err}");
                Vec::new()
            }
        }
    }
}

/// Overlays stored top-level fields onto a fresh default for `date`.
///
/// Each known field is decoded on its own; a field whose stored shape does
/// not decode keeps its default value. `date` is always the requested one.
pub fn overlay_onto_default(date: &str, stored: &Map<String, Value>) -> DayRecord {
    let updates = DayUpdates {
        top_priorities: stored_field(date, stored, &["top3", "topPriorities"]),
        schedule: stored_field(date, stored, &["schedule"]),
        todos: stored_field(date, stored, &["todos"]),
        habits: stored_field(date, stored, &["habits"]),
        meals: stored_field(date, stored, &["meals"]),
        notes: stored_field(date, stored, &["notes"]),
        tomorrow: stored_field(date, stored, &["tomorrow"]),
        review: stored_field(date, stored, &["review"]),
    };

    let mut record = build_default(date);
    record.apply_updates(updates);
    record.date = date.to_string();
    record
}

fn stored_field<T: DeserializeOwned>(
    date: &str,
    stored: &Map<String, Value>,
    names: &[&str],
) -> Option<T> {
    let (name, value) = names
        .iter()
        .find_map(|name| stored.get(*name).map(|value| (*name, value)))?;

    match serde_json::from_value::<T>(value.clone()) {
        Ok(decoded) => Some(decoded),
        Err(err) => {
            warn!(
                "event=day_load module=store status=degraded date={} field={} kind={} error={}",
                date,
                name,
                json_kind(value),
                err
            );
            None
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::{overlay_onto_default, storage_key};
    use crate::model::day_record::build_default;
    use serde_json::json;

    #[test]
    fn storage_key_prefixes_date() {
        assert_eq!(storage_key("2025-05-01"), "aesthetic_planner_2025-05-01");
    }

    #[test]
    fn overlay_keeps_defaults_for_undecodable_fields() {
        let stored = json!({
            "habits": "not a list",
            "notes": "kept",
            "meals": { "breakfast": "toast", "lunch": "", "dinner": "", "water": 99 }
        });

        let record = overlay_onto_default("2025-05-01", stored.as_object().unwrap());

        assert_eq!(record.habits, build_default("2025-05-01").habits);
        assert_eq!(record.notes, "kept");
        assert_eq!(record.meals.breakfast, "toast");
        assert_eq!(record.meals.water, 8);
    }

    #[test]
    fn overlay_accepts_legacy_priority_field_name() {
        let stored = json!({
            "topPriorities": [{ "id": "1", "text": "ship", "completed": true }]
        });

        let record = overlay_onto_default("2025-05-01", stored.as_object().unwrap());

        assert_eq!(record.top_priorities.len(), 1);
        assert_eq!(record.top_priorities[0].text, "ship");
    }
}
