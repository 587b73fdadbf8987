//! Prompt and response-schema builders for the plan assistant.

use crate::model::day_record::{DayRecord, ScheduleSlot, TOP_PRIORITY_COUNT};
use serde_json::{json, Value};

/// Instruction asking the service to draft a day plan from `user_text`.
///
/// Includes a JSON snapshot of the schedule slots that already have a task.
pub fn draft_prompt(date: &str, current: &DayRecord, user_text: &str, language: &str) -> String {
    let booked: Vec<&ScheduleSlot> = current
        .schedule
        .iter()
        .filter(|slot| !slot.task.trim().is_empty())
        .collect();
    let booked_json = serde_json::to_string(&booked).unwrap_or_else(|_| "[]".to_string());

    format!(
        "You are an expert daily planner assistant.\n\
         The user wants to plan their day for {date}.\n\
         \n\
         User input: \"{user_text}\"\n\
         \n\
         Based on this input, fill in the following planner fields. Respond in {language}.\n\
         1. Schedule: assign realistic times to the tasks mentioned, using 24h HH:MM \
         on the half hour between 05:00 and 23:00.\n\
         2. Top priorities: pick up to {TOP_PRIORITY_COUNT} of the most important tasks.\n\
         3. To-do list: other tasks that are not a top priority and have no fixed time.\n\
         4. Meals: breakfast, lunch and dinner, only if mentioned.\n\
         \n\
         Current schedule context: {booked_json}\n\
         \n\
         Return only a JSON object with the fields to update."
    )
}

/// Response schema for [`draft_prompt`]; every field is optional.
pub fn draft_response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "top3": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": format!("Up to {TOP_PRIORITY_COUNT} top priority task descriptions"),
            },
            "schedule": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "time": { "type": "STRING", "description": "Time in HH:MM format (e.g. 09:30)" },
                        "task": { "type": "STRING", "description": "Task description" },
                    },
                },
            },
            "todos": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "Other to-do items",
            },
            "meals": {
                "type": "OBJECT",
                "properties": {
                    "breakfast": { "type": "STRING" },
                    "lunch": { "type": "STRING" },
                    "dinner": { "type": "STRING" },
                },
            },
        },
    })
}

/// Instruction asking for a ~50-word encouraging review of `record`.
pub fn summary_prompt(record: &DayRecord, language: &str) -> String {
    let priorities = completed_texts(record.top_priorities.iter().map(|t| (t.completed, &t.text)));
    let todos = completed_texts(record.todos.iter().map(|t| (t.completed, &t.text)));
    let habits = completed_texts(record.habits.iter().map(|h| (h.completed, &h.name)));

    format!(
        "Analyze this daily planner data and write a short, encouraging and constructive \
         daily review (about 50 words) in {language}.\n\
         Highlight achievements based on the completed items and offer one tip for tomorrow.\n\
         \n\
         Data:\n\
         Top priorities completed: {priorities}\n\
         To-dos completed: {todos}\n\
         Habits done: {habits}\n\
         Notes: {notes}\n\
         Mood rating: {rate}/10",
        notes = record.notes,
        rate = record.review.rate,
    )
}

fn completed_texts<'a>(items: impl Iterator<Item = (bool, &'a String)>) -> String {
    items
        .filter(|(completed, _)| *completed)
        .map(|(_, text)| text.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::day_record::build_default;

    #[test]
    fn draft_prompt_includes_only_booked_slots() {
        let mut record = build_default("2025-06-01");
        record.schedule[8].task = "standup".to_string();

        let prompt = draft_prompt("2025-06-01", &record, "gym then groceries", "English");

        assert!(prompt.contains("2025-06-01"));
        assert!(prompt.contains("gym then groceries"));
        assert!(prompt.contains(r#"[{"time":"09:00","task":"standup"}]"#));
        assert!(!prompt.contains("05:30\""));
    }

    #[test]
    fn summary_prompt_lists_completed_items_and_rate() {
        let mut record = build_default("2025-06-01");
        record.top_priorities[0].text = "write report".to_string();
        record.top_priorities[0].completed = true;
        record.top_priorities[1].text = "skipped".to_string();
        record.habits[1].completed = true;
        record.review.rate = 7;

        let prompt = summary_prompt(&record, "English");

        assert!(prompt.contains("Top priorities completed: write report\n"));
        assert!(!prompt.contains("skipped"));
        assert!(prompt.contains("Habits done: Reading"));
        assert!(prompt.contains("7/10"));
    }

    #[test]
    fn draft_schema_declares_all_fields() {
        let schema = draft_response_schema();
        for field in ["top3", "schedule", "todos", "meals"] {
            assert!(schema["properties"].get(field).is_some(), "missing {field}");
        }
        assert!(schema.get("required").is_none());
    }
}
