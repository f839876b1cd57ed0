//! Task data structure and related functionality.
//!
//! This module defines the `Task` record persisted to storage and the
//! `TaskDraft` payload that forms and commands submit before an id and
//! defaults are assigned.

use chrono::NaiveDate;
use serde::de::{DeserializeOwned, IntoDeserializer};
use serde::{Deserialize, Deserializer, Serialize};

use crate::fields::Priority;

/// Title given to tasks submitted without one.
pub const UNTITLED_TASK: &str = "Untitled Task";

/// A single tracked task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "StoredTask")]
pub struct Task {
    pub id: u64,
    pub title: String,
    pub priority: Option<Priority>,
    pub due_date: Option<NaiveDate>,
    pub completed: bool,
}

/// A task record as found in storage.
///
/// Older records may carry the title under `name` (sometimes next to
/// `title`), and write an empty string for an unset priority or due date.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredTask {
    id: u64,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    priority: Option<Priority>,
    #[serde(default, deserialize_with = "blank_as_none")]
    due_date: Option<NaiveDate>,
    #[serde(default)]
    completed: bool,
}

impl From<StoredTask> for Task {
    fn from(raw: StoredTask) -> Self {
        let title = [raw.title, raw.name]
            .into_iter()
            .flatten()
            .find(|t| !t.trim().is_empty())
            .unwrap_or_else(|| UNTITLED_TASK.to_string());
        Task {
            id: raw.id,
            title,
            priority: raw.priority,
            due_date: raw.due_date,
            completed: raw.completed,
        }
    }
}

/// Read an optional string-encoded value, treating `null` and `""` as absent.
fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(s) if !s.trim().is_empty() => {
            T::deserialize(s.trim().into_deserializer()).map(Some)
        }
        _ => Ok(None),
    }
}

impl Task {
    /// Build a fresh, incomplete task from a draft.
    pub fn from_draft(id: u64, draft: TaskDraft) -> Self {
        Task {
            id,
            title: draft.resolved_title(),
            priority: draft.priority,
            due_date: draft.due_date,
            completed: false,
        }
    }

    /// Replace the editable fields with those of a draft, keeping id and completion.
    pub fn apply_draft(&mut self, draft: TaskDraft) {
        self.title = draft.resolved_title();
        self.priority = draft.priority;
        self.due_date = draft.due_date;
    }
}

/// Field values collected by a form or command, not yet validated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    pub priority: Option<Priority>,
    pub due_date: Option<NaiveDate>,
}

impl TaskDraft {
    pub fn new(title: impl Into<String>) -> Self {
        TaskDraft {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn with_due(mut self, due: NaiveDate) -> Self {
        self.due_date = Some(due);
        self
    }

    /// The trimmed title, or the placeholder when nothing was typed.
    fn resolved_title(&self) -> String {
        let title = self.title.trim();
        if title.is_empty() {
            UNTITLED_TASK.to_string()
        } else {
            title.to_string()
        }
    }
}

impl From<&Task> for TaskDraft {
    fn from(task: &Task) -> Self {
        TaskDraft {
            title: task.title.clone(),
            priority: task.priority,
            due_date: task.due_date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_title_falls_back_to_placeholder() {
        let task = Task::from_draft(1, TaskDraft::new("   "));
        assert_eq!(task.title, UNTITLED_TASK);
        assert!(!task.completed);
    }

    #[test]
    fn test_apply_draft_keeps_completion() {
        let mut task = Task::from_draft(7, TaskDraft::new("Water plants"));
        task.completed = true;
        task.apply_draft(TaskDraft::new("Water garden").with_priority(Priority::Low));
        assert_eq!(task.id, 7);
        assert_eq!(task.title, "Water garden");
        assert_eq!(task.priority, Some(Priority::Low));
        assert!(task.completed);
    }

    #[test]
    fn test_deserialises_legacy_name_key() {
        let raw = r#"{"id": 3, "name": "Pay bills", "priority": "High", "dueDate": "2024-05-01"}"#;
        let task: Task = serde_json::from_str(raw).unwrap();
        assert_eq!(task.title, "Pay bills");
        assert_eq!(task.priority, Some(Priority::High));
        assert_eq!(task.due_date, NaiveDate::from_ymd_opt(2024, 5, 1));
        assert!(!task.completed);
    }

    #[test]
    fn test_title_wins_over_name_when_both_present() {
        let raw = r#"{"title": "Pay bills", "priority": "High", "dueDate": "2024-05-01",
            "id": 1714000000000, "completed": false, "name": "Untitled Task"}"#;
        let task: Task = serde_json::from_str(raw).unwrap();
        assert_eq!(task.id, 1714000000000);
        assert_eq!(task.title, "Pay bills");
        assert_eq!(task.priority, Some(Priority::High));
    }

    #[test]
    fn test_blank_title_falls_back_to_name() {
        let raw = r#"{"id": 4, "title": "", "name": "Untitled Task"}"#;
        let task: Task = serde_json::from_str(raw).unwrap();
        assert_eq!(task.title, UNTITLED_TASK);
    }

    #[test]
    fn test_empty_strings_load_as_unset() {
        let raw = r#"{"id": 5, "title": "Call mom", "priority": "", "dueDate": ""}"#;
        let task: Task = serde_json::from_str(raw).unwrap();
        assert_eq!(task.priority, None);
        assert_eq!(task.due_date, None);

        let raw = r#"{"id": 6, "title": "Call dad", "priority": null, "dueDate": null}"#;
        let task: Task = serde_json::from_str(raw).unwrap();
        assert_eq!(task.priority, None);
        assert_eq!(task.due_date, None);
    }

    #[test]
    fn test_garbled_due_date_is_rejected() {
        let raw = r#"{"id": 7, "title": "x", "dueDate": "next-ish"}"#;
        assert!(serde_json::from_str::<Task>(raw).is_err());
    }

    #[test]
    fn test_serialises_camel_case_keys() {
        let task = Task::from_draft(
            2,
            TaskDraft::new("Buy milk").with_due(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()),
        );
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["dueDate"], "2024-01-02");
        assert_eq!(json["title"], "Buy milk");
        assert_eq!(json["priority"], serde_json::Value::Null);
    }
}
