//! Planner session: the single owned, mutable day record.
//!
//! # Responsibility
//! - Hold the day record currently being edited.
//! - Expose one explicit setter per user edit.
//! - Persist through the day store after every accepted mutation.
//!
//! # Invariants
//! - Rejected edits (unknown id, bad index, blank name) change nothing and
//!   do not write.
//! - Accepted edits are saved immediately; there is no batching.
//! - Schedule slot times are never edited; only task text changes.

use crate::model::day_record::{
    clamp_rate, next_water, validate_date, ChecklistItem, DateValidationError, DayRecord,
    DayUpdates, HabitItem, MealField, ReviewField,
};
use crate::repo::kv_repo::KvRepository;
use crate::service::day_store::DayStore;
use log::{debug, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Rejected session edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    InvalidDate(DateValidationError),
    /// Schedule index outside the fixed slot grid.
    SlotOutOfRange { index: usize, len: usize },
    /// No item with the given id in the named section.
    ItemNotFound { section: &'static str, id: String },
    /// Habit names must contain non-whitespace text.
    EmptyHabitName,
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidDate(err) => write!(f, "{err}"),
            Self::SlotOutOfRange { index, len } => {
                write!(f, "schedule slot {index} out of range (0..{len})")
            }
            Self::ItemNotFound { section, id } => write!(f, "{section} item not found: {id}"),
            Self::EmptyHabitName => write!(f, "habit name cannot be empty"),
        }
    }
}

impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidDate(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DateValidationError> for SessionError {
    fn from(value: DateValidationError) -> Self {
        Self::InvalidDate(value)
    }
}

pub type SessionResult<T> = Result<T, SessionError>;

/// Owner of the in-memory day record and its write-through store.
pub struct PlannerSession<R: KvRepository> {
    store: DayStore<R>,
    record: DayRecord,
}

impl<R: KvRepository> PlannerSession<R> {
    /// Opens a session on `date`, loading any stored record.
    pub fn open(store: DayStore<R>, date: &str) -> SessionResult<Self> {
        validate_date(date)?;
        let record = store.load(date);
        info!("event=session_open module=session status=ok date={date}");
        Ok(Self { store, record })
    }

    /// Replaces the current record with the one stored for `date`.
    pub fn switch_date(&mut self, date: &str) -> SessionResult<()> {
        validate_date(date)?;
        self.record = self.store.load(date);
        debug!("event=session_switch module=session status=ok date={date}");
        Ok(())
    }

    pub fn record(&self) -> &DayRecord {
        &self.record
    }

    pub fn date(&self) -> &str {
        &self.record.date
    }

    /// Dates with stored data, sorted ascending for calendar marking.
    pub fn stored_dates(&self) -> Vec<String> {
        let mut dates = self.store.list_stored_dates();
        dates.sort();
        dates
    }

    pub fn set_schedule_task(&mut self, index: usize, task: impl Into<String>) -> SessionResult<()> {
        let len = self.record.schedule.len();
        let slot = self
            .record
            .schedule
            .get_mut(index)
            .ok_or(SessionError::SlotOutOfRange { index, len })?;
        slot.task = task.into();
        self.commit();
        Ok(())
    }

    pub fn set_priority_text(&mut self, id: &str, text: impl Into<String>) -> SessionResult<()> {
        find_checklist(&mut self.record.top_priorities, "priority", id)?.text = text.into();
        self.commit();
        Ok(())
    }

    pub fn toggle_priority(&mut self, id: &str) -> SessionResult<()> {
        let item = find_checklist(&mut self.record.top_priorities, "priority", id)?;
        item.completed = !item.completed;
        self.commit();
        Ok(())
    }

    pub fn set_todo_text(&mut self, id: &str, text: impl Into<String>) -> SessionResult<()> {
        find_checklist(&mut self.record.todos, "todo", id)?.text = text.into();
        self.commit();
        Ok(())
    }

    pub fn toggle_todo(&mut self, id: &str) -> SessionResult<()> {
        let item = find_checklist(&mut self.record.todos, "todo", id)?;
        item.completed = !item.completed;
        self.commit();
        Ok(())
    }

    /// Appends a new incomplete habit and returns its generated id.
    pub fn add_habit(&mut self, name: &str) -> SessionResult<String> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SessionError::EmptyHabitName);
        }
        let id = Uuid::new_v4().to_string();
        self.record.habits.push(HabitItem {
            id: id.clone(),
            name: name.to_string(),
            completed: false,
        });
        self.commit();
        Ok(id)
    }

    pub fn remove_habit(&mut self, id: &str) -> SessionResult<()> {
        let before = self.record.habits.len();
        self.record.habits.retain(|habit| habit.id != id);
        if self.record.habits.len() == before {
            return Err(SessionError::ItemNotFound {
                section: "habit",
                id: id.to_string(),
            });
        }
        self.commit();
        Ok(())
    }

    pub fn toggle_habit(&mut self, id: &str) -> SessionResult<()> {
        let habit = self
            .record
            .habits
            .iter_mut()
            .find(|habit| habit.id == id)
            .ok_or_else(|| SessionError::ItemNotFound {
                section: "habit",
                id: id.to_string(),
            })?;
        habit.completed = !habit.completed;
        self.commit();
        Ok(())
    }

    pub fn set_meal(&mut self, field: MealField, text: impl Into<String>) {
        *field.slot(&mut self.record.meals) = text.into();
        self.commit();
    }

    /// Applies a tap on water glass `glass` and returns the new count.
    pub fn tap_water(&mut self, glass: u8) -> u8 {
        self.record.meals.water = next_water(self.record.meals.water, glass);
        self.commit();
        self.record.meals.water
    }

    pub fn set_review_text(&mut self, field: ReviewField, text: impl Into<String>) {
        *field.slot(&mut self.record.review) = text.into();
        self.commit();
    }

    /// Sets the satisfaction rate, clamped to `[0, 10]`, and returns it.
    pub fn set_rate(&mut self, rate: i64) -> u8 {
        self.record.review.rate = clamp_rate(rate);
        self.commit();
        self.record.review.rate
    }

    pub fn set_notes(&mut self, text: impl Into<String>) {
        self.record.notes = text.into();
        self.commit();
    }

    pub fn set_tomorrow(&mut self, text: impl Into<String>) {
        self.record.tomorrow = text.into();
        self.commit();
    }

    /// Merges a partial update (e.g. an assistant draft) and saves.
    pub fn apply_updates(&mut self, updates: DayUpdates) {
        if updates.is_empty() {
            return;
        }
        self.record.apply_updates(updates);
        self.commit();
    }

    fn commit(&self) {
        self.store.save(&self.record);
    }
}

fn find_checklist<'a>(
    items: &'a mut [ChecklistItem],
    section: &'static str,
    id: &str,
) -> SessionResult<&'a mut ChecklistItem> {
    items
        .iter_mut()
        .find(|item| item.id == id)
        .ok_or_else(|| SessionError::ItemNotFound {
            section,
            id: id.to_string(),
        })
}
