//! Task form handling for the terminal user interface.
//!
//! This module provides the `TaskForm` structure used for both creating and
//! editing tasks, including field ordering and the event it emits on submit.

use chrono::NaiveDate;

use crate::dates::parse_due_input;
use crate::fields::Priority;
use crate::task::{Task, TaskDraft};
use crate::tui::input::InputField;

/// Field order constants for the form.
pub const TITLE_FIELD: usize = 0;
pub const PRIORITY_FIELD: usize = 1;
pub const DUE_FIELD: usize = 2;
const FIELD_COUNT: usize = 3;

/// What the form asks the application to do on submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEvent {
    Create(TaskDraft),
    Update { id: u64, draft: TaskDraft },
}

/// Task form for creating or editing one task.
pub struct TaskForm {
    pub title: InputField,
    pub due: InputField,
    pub priority: usize,
    pub current_field: usize,
    pub priorities: Vec<Option<Priority>>,
    editing: Option<u64>,
}

impl TaskForm {
    /// Create an empty form in create mode.
    pub fn new() -> Self {
        let mut form = Self {
            title: InputField::new(),
            due: InputField::new(),
            priority: 0, // None (first item)
            current_field: TITLE_FIELD,
            priorities: vec![
                None,
                Some(Priority::Low),
                Some(Priority::Medium),
                Some(Priority::High),
            ],
            editing: None,
        };
        form.update_active_field();
        form
    }

    /// Create a form in edit mode, populated from an existing task.
    pub fn from_task(task: &Task) -> Self {
        let mut form = Self::new();
        form.title = InputField::with_value(&task.title);
        form.due = InputField::with_value(
            &task.due_date.map(|d| d.to_string()).unwrap_or_default());
        form.priority = form.priorities.iter().position(|&p| p == task.priority).unwrap_or(0);
        form.editing = Some(task.id);
        form.update_active_field();
        form
    }

    pub fn selected_priority(&self) -> Option<Priority> {
        self.priorities.get(self.priority).copied().flatten()
    }

    pub fn next_field(&mut self) {
        self.current_field = (self.current_field + 1) % FIELD_COUNT;
        self.update_active_field();
    }

    pub fn prev_field(&mut self) {
        self.current_field = (self.current_field + FIELD_COUNT - 1) % FIELD_COUNT;
        self.update_active_field();
    }

    /// Update which text field is currently active for editing.
    pub fn update_active_field(&mut self) {
        self.title.active = self.current_field == TITLE_FIELD;
        self.due.active = self.current_field == DUE_FIELD;
    }

    fn active_input(&mut self) -> Option<&mut InputField> {
        match self.current_field {
            TITLE_FIELD => Some(&mut self.title),
            DUE_FIELD => Some(&mut self.due),
            _ => None,
        }
    }

    pub fn handle_char(&mut self, c: char) {
        if let Some(field) = self.active_input() {
            field.handle_char(c);
        }
    }

    pub fn handle_backspace(&mut self) {
        if let Some(field) = self.active_input() {
            field.handle_backspace();
        }
    }

    pub fn handle_delete(&mut self) {
        if let Some(field) = self.active_input() {
            field.handle_delete();
        }
    }

    /// Handle left/right arrow keys for cursor movement or selector changes.
    pub fn handle_left_right(&mut self, right: bool) {
        if self.current_field == PRIORITY_FIELD {
            let len = self.priorities.len();
            self.priority = if right {
                (self.priority + 1) % len
            } else {
                (self.priority + len - 1) % len
            };
            return;
        }
        if let Some(field) = self.active_input() {
            if right {
                field.move_cursor_right();
            } else {
                field.move_cursor_left();
            }
        }
    }

    /// Collect the form into a draft. Fails when the due date text is not understood.
    pub fn to_draft(&self, today: NaiveDate) -> Result<TaskDraft, String> {
        let due_text = self.due.value.trim();
        let due_date = if due_text.is_empty() {
            None
        } else {
            Some(
                parse_due_input(due_text, today)
                    .ok_or_else(|| format!("Could not understand due date '{due_text}'"))?,
            )
        };
        Ok(TaskDraft {
            title: self.title.value.trim().to_string(),
            priority: self.selected_priority(),
            due_date,
        })
    }

    /// Build the event for the current form contents.
    pub fn submit(&self, today: NaiveDate) -> Result<FormEvent, String> {
        let draft = self.to_draft(today)?;
        Ok(match self.editing {
            Some(id) => FormEvent::Update { id, draft },
            None => FormEvent::Create(draft),
        })
    }
}

impl Default for TaskForm {
    fn default() -> Self {
        Self::new()
    }
}
