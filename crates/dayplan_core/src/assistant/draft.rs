//! Structured draft response and its reconciliation against a record.
//!
//! # Invariants
//! - Priority and todo strings overwrite item text positionally; item ids,
//!   completion flags and list lengths never change.
//! - Blank strings keep the existing text.
//! - Schedule entries only touch slots whose time matches exactly.
//! - Fields absent from the response stay absent from the updates.

use crate::model::day_record::{ChecklistItem, DayRecord, DayUpdates, Meals, ScheduleSlot};
use serde::Deserialize;

/// Assistant output for a day draft; every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DraftResponse {
    pub top3: Option<Vec<String>>,
    pub schedule: Option<Vec<DraftSlot>>,
    pub todos: Option<Vec<String>>,
    pub meals: Option<DraftMeals>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DraftSlot {
    pub time: Option<String>,
    pub task: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DraftMeals {
    pub breakfast: Option<String>,
    pub lunch: Option<String>,
    pub dinner: Option<String>,
}

impl DraftResponse {
    /// Parses service text, tolerating a fenced ```json block around it.
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(strip_code_fence(text))
    }
}

/// Builds the partial update produced by applying `draft` to `current`.
pub fn reconcile_draft(current: &DayRecord, draft: &DraftResponse) -> DayUpdates {
    DayUpdates {
        top_priorities: draft
            .top3
            .as_ref()
            .map(|texts| overwrite_texts(&current.top_priorities, texts)),
        schedule: draft
            .schedule
            .as_ref()
            .map(|entries| overwrite_slots(&current.schedule, entries)),
        todos: draft
            .todos
            .as_ref()
            .map(|texts| overwrite_texts(&current.todos, texts)),
        meals: draft
            .meals
            .as_ref()
            .map(|meals| overlay_meals(&current.meals, meals)),
        ..DayUpdates::default()
    }
}

fn overwrite_texts(items: &[ChecklistItem], texts: &[String]) -> Vec<ChecklistItem> {
    items
        .iter()
        .enumerate()
        .map(|(idx, item)| match texts.get(idx) {
            Some(text) if !text.is_empty() => ChecklistItem {
                text: text.clone(),
                ..item.clone()
            },
            _ => item.clone(),
        })
        .collect()
}

fn overwrite_slots(slots: &[ScheduleSlot], entries: &[DraftSlot]) -> Vec<ScheduleSlot> {
    slots
        .iter()
        .map(|slot| {
            let matched = entries.iter().find_map(|entry| match (&entry.time, &entry.task) {
                (Some(time), Some(task)) if *time == slot.time => Some(task),
                _ => None,
            });
            match matched {
                Some(task) => ScheduleSlot {
                    time: slot.time.clone(),
                    task: task.clone(),
                },
                None => slot.clone(),
            }
        })
        .collect()
}

fn overlay_meals(current: &Meals, draft: &DraftMeals) -> Meals {
    Meals {
        breakfast: draft
            .breakfast
            .clone()
            .unwrap_or_else(|| current.breakfast.clone()),
        lunch: draft.lunch.clone().unwrap_or_else(|| current.lunch.clone()),
        dinner: draft.dinner.clone().unwrap_or_else(|| current.dinner.clone()),
        water: current.water,
    }
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::day_record::build_default;

    #[test]
    fn parse_accepts_partial_objects() {
        let draft = DraftResponse::parse(r#"{"todos":["a","b"]}"#).unwrap();
        assert_eq!(draft.todos, Some(vec!["a".to_string(), "b".to_string()]));
        assert_eq!(draft.top3, None);
        assert_eq!(draft.schedule, None);
    }

    #[test]
    fn parse_strips_markdown_fence() {
        let draft = DraftResponse::parse("```json\n{\"top3\":[\"x\"]}\n```").unwrap();
        assert_eq!(draft.top3, Some(vec!["x".to_string()]));
    }

    #[test]
    fn parse_rejects_wrong_shapes() {
        assert!(DraftResponse::parse("not json").is_err());
        assert!(DraftResponse::parse(r#"{"top3":"one"}"#).is_err());
        assert!(DraftResponse::parse("[]").is_err());
    }

    #[test]
    fn blank_priority_text_keeps_existing() {
        let mut record = build_default("2025-06-01");
        record.top_priorities[1].text = "existing".to_string();
        let draft = DraftResponse {
            top3: Some(vec!["new".to_string(), String::new()]),
            ..DraftResponse::default()
        };

        let updates = reconcile_draft(&record, &draft);
        let priorities = updates.top_priorities.unwrap();

        assert_eq!(priorities[0].text, "new");
        assert_eq!(priorities[1].text, "existing");
        assert_eq!(priorities.len(), 3);
    }

    #[test]
    fn extra_todo_strings_are_dropped() {
        let mut record = build_default("2025-06-01");
        record.todos.truncate(2);
        let draft = DraftResponse {
            todos: Some(vec!["a".into(), "b".into(), "c".into()]),
            ..DraftResponse::default()
        };

        let todos = reconcile_draft(&record, &draft).todos.unwrap();
        assert_eq!(todos.len(), 2);
        assert_eq!(todos[1].text, "b");
    }

    #[test]
    fn meals_overlay_keeps_water_and_missing_keys() {
        let mut record = build_default("2025-06-01");
        record.meals.lunch = "salad".to_string();
        record.meals.water = 4;
        let draft = DraftResponse {
            meals: Some(DraftMeals {
                breakfast: Some("oats".to_string()),
                ..DraftMeals::default()
            }),
            ..DraftResponse::default()
        };

        let meals = reconcile_draft(&record, &draft).meals.unwrap();
        assert_eq!(meals.breakfast, "oats");
        assert_eq!(meals.lunch, "salad");
        assert_eq!(meals.water, 4);
    }

    #[test]
    fn schedule_entries_without_time_or_task_are_ignored() {
        let record = build_default("2025-06-01");
        let draft = DraftResponse {
            schedule: Some(vec![
                DraftSlot {
                    time: None,
                    task: Some("orphan".into()),
                },
                DraftSlot {
                    time: Some("10:00".into()),
                    task: None,
                },
            ]),
            ..DraftResponse::default()
        };

        let schedule = reconcile_draft(&record, &draft).schedule.unwrap();
        assert_eq!(schedule, record.schedule);
    }
}
