//! The application state machine.
//!
//! `Tracker` owns the canonical task list together with the edit target and
//! the filter selection. Every change goes through one of its transitions;
//! transitions touching the task list write the whole list back to storage,
//! filter transitions only change what `board` derives.

use std::collections::HashSet;

use chrono::NaiveDate;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::buckets::{bucketize, Board};
use crate::fields::PriorityFilter;
use crate::filter::{filter_tasks, TaskFilter};
use crate::store::{self, Storage, StoreError};
use crate::task::{Task, TaskDraft};

/// Errors raised by tracker transitions.
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("task {0} not found")]
    NotFound(u64),

    #[error("no task ids left to allocate")]
    IdsExhausted,

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type TrackerResult<T> = Result<T, TrackerError>;

/// A request to change tracker state, raised by forms, lists and filter controls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Create a task, or save the task being edited.
    Submit(TaskDraft),
    /// Replace the task with the same id.
    Update(Task),
    ToggleComplete(u64),
    Delete(u64),
    BeginEdit(u64),
    CancelEdit,
    SetSearch(String),
    SetPriority(PriorityFilter),
}

/// Owner of the canonical task list.
pub struct Tracker<S: Storage> {
    storage: S,
    tasks: Vec<Task>,
    editing: Option<u64>,
    filter: TaskFilter,
    /// `None` once the id space is used up.
    next_id: Option<u64>,
}

impl<S: Storage> Tracker<S> {
    /// Load persisted tasks from `storage`, resetting unreadable data.
    pub fn open(mut storage: S) -> Result<Self, StoreError> {
        let tasks = store::load_or_reset(&mut storage)?;
        debug!(count = tasks.len(), "loaded tasks");
        Ok(Self::with_tasks(storage, tasks))
    }

    /// Start from an already loaded task list without touching storage.
    ///
    /// Tasks sharing an id with an earlier task get a fresh id; the change is
    /// written back with the next mutation.
    pub fn with_tasks(storage: S, tasks: Vec<Task>) -> Self {
        let next_id = match tasks.iter().map(|t| t.id).max() {
            Some(max) => max.checked_add(1),
            None => Some(1),
        };
        let mut tracker = Tracker {
            storage,
            tasks,
            editing: None,
            filter: TaskFilter::default(),
            next_id,
        };
        tracker.reassign_duplicate_ids();
        tracker
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: u64) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn filter(&self) -> &TaskFilter {
        &self.filter
    }

    pub fn editing_id(&self) -> Option<u64> {
        self.editing
    }

    /// The task currently targeted by the edit form.
    pub fn editing(&self) -> Option<&Task> {
        self.editing.and_then(|id| self.get(id))
    }

    /// Tasks passing the current filter, in canonical order.
    pub fn visible(&self) -> Vec<&Task> {
        filter_tasks(&self.tasks, &self.filter)
    }

    /// The filtered tasks split into buckets relative to `today`.
    pub fn board(&self, today: NaiveDate) -> Board<'_> {
        bucketize(self.visible(), today)
    }

    /// Apply an action, dispatching to the matching transition.
    pub fn apply(&mut self, action: Action) -> TrackerResult<()> {
        match action {
            Action::Submit(draft) => self.submit(draft).map(|_| ()),
            Action::Update(task) => self.update(task),
            Action::ToggleComplete(id) => self.toggle_complete(id).map(|_| ()),
            Action::Delete(id) => self.delete(id).map(|_| ()),
            Action::BeginEdit(id) => self.begin_edit(id),
            Action::CancelEdit => {
                self.cancel_edit();
                Ok(())
            }
            Action::SetSearch(term) => {
                self.set_search(term);
                Ok(())
            }
            Action::SetPriority(p) => {
                self.set_priority(p);
                Ok(())
            }
        }
    }

    /// Append a new incomplete task built from `draft`. Returns its id.
    pub fn create(&mut self, draft: TaskDraft) -> TrackerResult<u64> {
        let id = self.allocate_id()?;
        let task = Task::from_draft(id, draft);
        info!(id, title = %task.title, "created task");
        self.tasks.push(task);
        self.persist()?;
        Ok(id)
    }

    /// Save the form contents: updates the edit target when there is one,
    /// otherwise creates a new task. Clears the edit target either way.
    pub fn submit(&mut self, draft: TaskDraft) -> TrackerResult<u64> {
        let Some(id) = self.editing.take() else {
            return self.create(draft);
        };
        let task = self
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(TrackerError::NotFound(id))?;
        task.apply_draft(draft);
        info!(id, title = %task.title, "edited task");
        self.persist()?;
        Ok(id)
    }

    /// Replace the stored task carrying the same id.
    pub fn update(&mut self, task: Task) -> TrackerResult<()> {
        let id = task.id;
        let slot = self
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(TrackerError::NotFound(id))?;
        *slot = task;
        info!(id, "updated task");
        self.persist()
    }

    /// Flip the completion flag of a task. Returns the new state.
    pub fn toggle_complete(&mut self, id: u64) -> TrackerResult<bool> {
        let mut task = self.get(id).cloned().ok_or(TrackerError::NotFound(id))?;
        task.completed = !task.completed;
        let completed = task.completed;
        self.update(task)?;
        Ok(completed)
    }

    /// Remove a task. Returns the removed record.
    pub fn delete(&mut self, id: u64) -> TrackerResult<Task> {
        let idx = self
            .tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or(TrackerError::NotFound(id))?;
        let removed = self.tasks.remove(idx);
        if self.editing == Some(id) {
            self.editing = None;
        }
        info!(id, "deleted task");
        self.persist()?;
        Ok(removed)
    }

    /// Mark a task as the target of the next `submit`.
    pub fn begin_edit(&mut self, id: u64) -> TrackerResult<()> {
        if self.get(id).is_none() {
            return Err(TrackerError::NotFound(id));
        }
        debug!(id, "editing task");
        self.editing = Some(id);
        Ok(())
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.filter.search = term.into();
        debug!(search = %self.filter.search, "search changed");
    }

    pub fn set_priority(&mut self, priority: PriorityFilter) {
        self.filter.priority = priority;
        debug!(%priority, "priority filter changed");
    }

    fn allocate_id(&mut self) -> TrackerResult<u64> {
        let id = self.next_id.ok_or(TrackerError::IdsExhausted)?;
        self.next_id = id.checked_add(1);
        Ok(id)
    }

    fn reassign_duplicate_ids(&mut self) {
        let mut seen = HashSet::with_capacity(self.tasks.len());
        for idx in 0..self.tasks.len() {
            let old = self.tasks[idx].id;
            if seen.insert(old) {
                continue;
            }
            match self.allocate_id() {
                Ok(id) => {
                    warn!(old, new = id, "duplicate task id, reassigned");
                    self.tasks[idx].id = id;
                    seen.insert(id);
                }
                Err(_) => warn!(id = old, "duplicate task id left in place, no free ids"),
            }
        }
    }

    fn persist(&mut self) -> TrackerResult<()> {
        store::save(&mut self.storage, &self.tasks)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::{Bucket, Priority};
    use crate::store::{MemoryStorage, TASKS_KEY};
    use crate::task::UNTITLED_TASK;
    use chrono::Duration;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 10).unwrap()
    }

    fn tracker() -> Tracker<MemoryStorage> {
        Tracker::open(MemoryStorage::new()).unwrap()
    }

    fn persisted(tracker: &Tracker<MemoryStorage>) -> Vec<Task> {
        store::load(tracker.storage()).unwrap()
    }

    #[test]
    fn test_create_assigns_id_and_defaults() {
        let mut t = tracker();
        let id = t.create(TaskDraft::new("")).unwrap();
        let task = t.get(id).unwrap();
        assert_eq!(task.title, UNTITLED_TASK);
        assert!(!task.completed);
        assert_eq!(persisted(&t), t.tasks());
    }

    #[test]
    fn test_ids_are_unique_and_monotonic() {
        let mut t = tracker();
        let a = t.create(TaskDraft::new("a")).unwrap();
        let b = t.create(TaskDraft::new("b")).unwrap();
        t.delete(b).unwrap();
        let c = t.create(TaskDraft::new("c")).unwrap();
        assert!(a < b && b < c);
    }

    #[test]
    fn test_reopen_continues_after_highest_id() {
        let mut storage = MemoryStorage::new();
        storage
            .set(TASKS_KEY, r#"[{"id": 41, "title": "old", "completed": true}]"#)
            .unwrap();
        let mut t = Tracker::open(storage).unwrap();
        assert_eq!(t.create(TaskDraft::new("new")).unwrap(), 42);
    }

    #[test]
    fn test_highest_possible_id_exhausts_allocation() {
        let mut storage = MemoryStorage::new();
        storage
            .set(TASKS_KEY, r#"[{"id": 18446744073709551615, "title": "x"}]"#)
            .unwrap();
        let mut t = Tracker::open(storage).unwrap();
        assert_eq!(t.tasks()[0].id, u64::MAX);
        assert!(matches!(
            t.create(TaskDraft::new("y")),
            Err(TrackerError::IdsExhausted)
        ));
        assert_eq!(t.tasks().len(), 1);
        assert_eq!(persisted(&t).len(), 1);
    }

    #[test]
    fn test_last_id_before_max_is_still_allocated() {
        let tasks = vec![Task::from_draft(u64::MAX - 1, TaskDraft::new("a"))];
        let mut t = Tracker::with_tasks(MemoryStorage::new(), tasks);
        assert_eq!(t.create(TaskDraft::new("b")).unwrap(), u64::MAX);
        assert!(matches!(t.create(TaskDraft::new("c")), Err(TrackerError::IdsExhausted)));
    }

    #[test]
    fn test_duplicate_loaded_ids_are_reassigned() {
        let mut storage = MemoryStorage::new();
        storage
            .set(
                TASKS_KEY,
                r#"[{"id": 5, "title": "first"}, {"id": 5, "title": "second"}, {"id": 2, "title": "third"}]"#,
            )
            .unwrap();
        let mut t = Tracker::open(storage).unwrap();
        let ids: Vec<u64> = t.tasks().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![5, 6, 2]);

        let removed = t.delete(6).unwrap();
        assert_eq!(removed.title, "second");
        assert_eq!(t.get(5).unwrap().title, "first");
        assert_eq!(t.create(TaskDraft::new("fourth")).unwrap(), 7);
    }

    #[test]
    fn test_overdue_task_moves_to_completed_when_toggled() {
        let mut t = tracker();
        let day = today();
        let id = t
            .create(
                TaskDraft::new("Pay bills")
                    .with_priority(Priority::High)
                    .with_due(day - Duration::days(1)),
            )
            .unwrap();
        assert_eq!(t.board(day).locate(id), Some(Bucket::Overdue));

        assert!(t.toggle_complete(id).unwrap());
        let board = t.board(day);
        assert_eq!(board.locate(id), Some(Bucket::Completed));
        assert!(board.overdue.is_empty());
        assert!(persisted(&t)[0].completed);
    }

    #[test]
    fn test_editing_due_date_moves_between_buckets() {
        let mut t = tracker();
        let day = today();
        let id = t
            .create(TaskDraft::new("Renew passport").with_due(day - Duration::days(1)))
            .unwrap();
        assert_eq!(t.board(day).locate(id), Some(Bucket::Overdue));

        t.apply(Action::BeginEdit(id)).unwrap();
        let mut draft = TaskDraft::from(t.editing().unwrap());
        draft.due_date = Some(day + Duration::days(1));
        assert_eq!(t.submit(draft).unwrap(), id);

        assert_eq!(t.editing_id(), None);
        assert_eq!(t.tasks().len(), 1);
        assert_eq!(t.board(day).locate(id), Some(Bucket::Upcoming));
    }

    #[test]
    fn test_submit_without_edit_target_creates() {
        let mut t = tracker();
        t.apply(Action::Submit(TaskDraft::new("one"))).unwrap();
        t.apply(Action::Submit(TaskDraft::new("two"))).unwrap();
        assert_eq!(t.tasks().len(), 2);
    }

    #[test]
    fn test_submit_edit_keeps_completion_and_applies_placeholder() {
        let mut t = tracker();
        let id = t.create(TaskDraft::new("Laundry")).unwrap();
        t.toggle_complete(id).unwrap();
        t.begin_edit(id).unwrap();
        t.submit(TaskDraft::new("  ")).unwrap();
        let task = t.get(id).unwrap();
        assert_eq!(task.title, UNTITLED_TASK);
        assert!(task.completed);
    }

    #[test]
    fn test_delete_removes_from_buckets_and_storage() {
        let mut t = tracker();
        let day = today();
        let keep = t.create(TaskDraft::new("keep").with_due(day + Duration::days(3))).unwrap();
        let gone = t.create(TaskDraft::new("gone").with_due(day - Duration::days(3))).unwrap();
        t.begin_edit(gone).unwrap();

        let removed = t.delete(gone).unwrap();
        assert_eq!(removed.title, "gone");
        assert_eq!(t.editing_id(), None);
        assert_eq!(t.board(day).locate(gone), None);
        assert_eq!(t.board(day).locate(keep), Some(Bucket::Upcoming));
        let stored = persisted(&t);
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].id, keep);
    }

    #[test]
    fn test_update_replaces_in_place() {
        let mut t = tracker();
        let first = t.create(TaskDraft::new("first")).unwrap();
        t.create(TaskDraft::new("second")).unwrap();
        let mut task = t.get(first).unwrap().clone();
        task.priority = Some(Priority::Medium);
        t.apply(Action::Update(task.clone())).unwrap();
        assert_eq!(t.tasks()[0], task);
        assert_eq!(persisted(&t)[0], task);
    }

    #[test]
    fn test_unknown_ids_are_rejected() {
        let mut t = tracker();
        assert!(matches!(t.delete(5), Err(TrackerError::NotFound(5))));
        assert!(matches!(t.begin_edit(5), Err(TrackerError::NotFound(5))));
        assert!(matches!(t.toggle_complete(5), Err(TrackerError::NotFound(5))));
    }

    #[test]
    fn test_filter_changes_do_not_touch_storage() {
        let mut t = tracker();
        let day = today();
        t.create(TaskDraft::new("Buy milk").with_due(day + Duration::days(1))).unwrap();
        t.create(
            TaskDraft::new("Clean house")
                .with_priority(Priority::Low)
                .with_due(day + Duration::days(2)),
        )
        .unwrap();
        let before = persisted(&t);

        t.apply(Action::SetSearch("MILK".into())).unwrap();
        assert_eq!(t.board(day).upcoming.len(), 1);
        t.apply(Action::SetSearch(String::new())).unwrap();
        t.apply(Action::SetPriority(PriorityFilter::Only(Priority::Low))).unwrap();
        let board = t.board(day);
        assert_eq!(board.upcoming.len(), 1);
        assert_eq!(board.upcoming[0].title, "Clean house");

        assert_eq!(persisted(&t), before);
    }
}
