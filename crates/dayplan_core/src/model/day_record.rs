//! Day record domain model.
//!
//! # Responsibility
//! - Define the canonical shape of one calendar day's planner state.
//! - Build the all-fields-present default record for a date.
//! - Own the clamping rules for water intake and satisfaction rate.
//!
//! # Invariants
//! - `date` is `YYYY-MM-DD` and is the unique identity of a record.
//! - The schedule is the fixed 37-slot half-hour grid `05:00..=23:00`.
//! - `meals.water` stays in `[0, 8]` and `review.rate` in `[0, 10]`.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Number of top-priority items on every record.
pub const TOP_PRIORITY_COUNT: usize = 3;
/// Number of todo rows on a freshly built record.
pub const DEFAULT_TODO_COUNT: usize = 15;
/// Upper bound for glasses of water.
pub const WATER_MAX: u8 = 8;
/// Upper bound for the daily satisfaction rate.
pub const RATE_MAX: u8 = 10;

const SCHEDULE_FIRST_MINUTE: u32 = 5 * 60;
const SCHEDULE_LAST_MINUTE: u32 = 23 * 60;
const SCHEDULE_STEP_MINUTES: u32 = 30;

const STARTER_HABITS: &[(&str, &str)] = &[
    ("h1", "Exercise"),
    ("h2", "Reading"),
    ("h3", "Meditation"),
    ("h4", "Reduce sugar"),
    ("h5", "Sleep 7 hours"),
];

static DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{4})-(0[1-9]|1[0-2])-(0[1-9]|[12]\d|3[01])$").expect("valid date regex")
});

/// Labeled checkbox row used by top priorities and todos.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub id: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub completed: bool,
}

impl ChecklistItem {
    fn empty(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: String::new(),
            completed: false,
        }
    }
}

/// One half-hour slot of the daily schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleSlot {
    /// `HH:MM`, 24h clock.
    pub time: String,
    #[serde(default)]
    pub task: String,
}

/// Named habit tracked per day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitItem {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub completed: bool,
}

/// Meal notes plus water intake.
///
/// Missing keys decode as empty text and zero glasses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Meals {
    pub breakfast: String,
    pub lunch: String,
    pub dinner: String,
    /// Glasses of water, `0..=8`.
    #[serde(deserialize_with = "deserialize_water")]
    pub water: u8,
}

/// End-of-day review block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Review {
    pub achievement: String,
    pub improve: String,
    /// Satisfaction rate, `0..=10`.
    #[serde(deserialize_with = "deserialize_rate")]
    pub rate: u8,
}

/// Text fields of [`Meals`] addressable by setters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MealField {
    Breakfast,
    Lunch,
    Dinner,
}

/// Text fields of [`Review`] addressable by setters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewField {
    Achievement,
    Improve,
}

/// Complete planner state for one calendar date.
///
/// Serialized field names match the persisted JSON layout, so records
/// written by earlier versions keep loading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayRecord {
    pub date: String,
    #[serde(rename = "top3", alias = "topPriorities")]
    pub top_priorities: Vec<ChecklistItem>,
    pub schedule: Vec<ScheduleSlot>,
    pub todos: Vec<ChecklistItem>,
    pub habits: Vec<HabitItem>,
    pub meals: Meals,
    pub notes: String,
    pub tomorrow: String,
    pub review: Review,
}

/// Partial record: every present field replaces the record field wholesale.
///
/// Produced by the store overlay and by assistant drafts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DayUpdates {
    pub top_priorities: Option<Vec<ChecklistItem>>,
    pub schedule: Option<Vec<ScheduleSlot>>,
    pub todos: Option<Vec<ChecklistItem>>,
    pub habits: Option<Vec<HabitItem>>,
    pub meals: Option<Meals>,
    pub notes: Option<String>,
    pub tomorrow: Option<String>,
    pub review: Option<Review>,
}

impl DayUpdates {
    /// Returns whether no field is present.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Date-string validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateValidationError {
    /// Value does not look like `YYYY-MM-DD`.
    InvalidFormat(String),
    /// Well-formed value naming a day the month does not have.
    NoSuchDay(String),
}

impl Display for DateValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidFormat(value) => {
                write!(f, "invalid date `{value}`; expected YYYY-MM-DD")
            }
            Self::NoSuchDay(value) => write!(f, "invalid date `{value}`; no such calendar day"),
        }
    }
}

impl Error for DateValidationError {}

/// Validates a `YYYY-MM-DD` date key against the proleptic Gregorian calendar.
pub fn validate_date(date: &str) -> Result<(), DateValidationError> {
    let caps = DATE_RE
        .captures(date)
        .ok_or_else(|| DateValidationError::InvalidFormat(date.to_string()))?;
    let parse = |idx: usize| caps[idx].parse::<u32>().unwrap_or_default();
    let (year, month, day) = (parse(1), parse(2), parse(3));

    if day > days_in_month(year, month) {
        return Err(DateValidationError::NoSuchDay(date.to_string()));
    }
    Ok(())
}

fn days_in_month(year: u32, month: u32) -> u32 {
    match month {
        2 if year % 4 == 0 && (year % 100 != 0 || year % 400 == 0) => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

/// Returns the fixed schedule slot times, `05:00` through `23:00`.
pub fn schedule_slot_times() -> Vec<String> {
    (SCHEDULE_FIRST_MINUTE..=SCHEDULE_LAST_MINUTE)
        .step_by(SCHEDULE_STEP_MINUTES as usize)
        .map(|minute| format!("{:02}:{:02}", minute / 60, minute % 60))
        .collect()
}

/// Builds the fully populated default record for `date`.
///
/// Pure and total; the date string is copied as-is.
pub fn build_default(date: &str) -> DayRecord {
    DayRecord {
        date: date.to_string(),
        top_priorities: (1..=TOP_PRIORITY_COUNT)
            .map(|n| ChecklistItem::empty(n.to_string()))
            .collect(),
        schedule: schedule_slot_times()
            .into_iter()
            .map(|time| ScheduleSlot {
                time,
                task: String::new(),
            })
            .collect(),
        todos: (0..DEFAULT_TODO_COUNT)
            .map(|n| ChecklistItem::empty(format!("todo-{n}")))
            .collect(),
        habits: STARTER_HABITS
            .iter()
            .map(|(id, name)| HabitItem {
                id: (*id).to_string(),
                name: (*name).to_string(),
                completed: false,
            })
            .collect(),
        meals: Meals::default(),
        notes: String::new(),
        tomorrow: String::new(),
        review: Review::default(),
    }
}

/// Resolves a tap on water glass `tapped` given the `current` count.
///
/// Tapping the glass that is already the current count steps back by one,
/// so the last filled glass can be cleared.
pub fn next_water(current: u8, tapped: u8) -> u8 {
    let tapped = tapped.min(WATER_MAX);
    if tapped == current {
        tapped.saturating_sub(1)
    } else {
        tapped
    }
}

/// Clamps a water count into `[0, 8]`.
pub fn clamp_water(value: i64) -> u8 {
    value.clamp(0, i64::from(WATER_MAX)) as u8
}

/// Clamps a satisfaction rate into `[0, 10]`.
pub fn clamp_rate(value: i64) -> u8 {
    value.clamp(0, i64::from(RATE_MAX)) as u8
}

fn deserialize_water<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
    i64::deserialize(deserializer).map(clamp_water)
}

fn deserialize_rate<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
    i64::deserialize(deserializer).map(clamp_rate)
}

impl DayRecord {
    /// Replaces every top-level field present in `updates`.
    ///
    /// Shallow: arrays and nested blocks are swapped wholesale.
    pub fn apply_updates(&mut self, updates: DayUpdates) {
        if let Some(value) = updates.top_priorities {
            self.top_priorities = value;
        }
        if let Some(value) = updates.schedule {
            self.schedule = value;
        }
        if let Some(value) = updates.todos {
            self.todos = value;
        }
        if let Some(value) = updates.habits {
            self.habits = value;
        }
        if let Some(value) = updates.meals {
            self.meals = value;
        }
        if let Some(value) = updates.notes {
            self.notes = value;
        }
        if let Some(value) = updates.tomorrow {
            self.tomorrow = value;
        }
        if let Some(value) = updates.review {
            self.review = value;
        }
        self.clamp_ranges();
    }

    /// Forces `meals.water` and `review.rate` back into range.
    pub fn clamp_ranges(&mut self) {
        self.meals.water = self.meals.water.min(WATER_MAX);
        self.review.rate = self.review.rate.min(RATE_MAX);
    }
}

impl MealField {
    pub(crate) fn slot<'a>(&self, meals: &'a mut Meals) -> &'a mut String {
        match self {
            Self::Breakfast => &mut meals.breakfast,
            Self::Lunch => &mut meals.lunch,
            Self::Dinner => &mut meals.dinner,
        }
    }
}

impl ReviewField {
    pub(crate) fn slot<'a>(&self, review: &'a mut Review) -> &'a mut String {
        match self {
            Self::Achievement => &mut review.achievement,
            Self::Improve => &mut review.improve,
        }
    }
}
