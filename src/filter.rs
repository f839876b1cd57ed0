//! Search and priority filtering over the canonical task list.

use crate::fields::PriorityFilter;
use crate::task::Task;

/// The current (search term, priority) selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub search: String,
    pub priority: PriorityFilter,
}

impl TaskFilter {
    pub fn new(search: impl Into<String>, priority: PriorityFilter) -> Self {
        TaskFilter {
            search: search.into(),
            priority,
        }
    }

    pub fn matches(&self, task: &Task) -> bool {
        if !self.priority.matches(task.priority) {
            return false;
        }
        let needle = self.search.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        !task.title.is_empty() && task.title.to_lowercase().contains(&needle)
    }
}

/// Keep the tasks passing `filter`, in their original order.
pub fn filter_tasks<'a, I>(tasks: I, filter: &TaskFilter) -> Vec<&'a Task>
where
    I: IntoIterator<Item = &'a Task>,
{
    tasks.into_iter().filter(|t| filter.matches(t)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::Priority;

    fn task(id: u64, title: &str, priority: Option<Priority>) -> Task {
        Task {
            id,
            title: title.to_string(),
            priority,
            due_date: None,
            completed: false,
        }
    }

    fn titles(tasks: &[&Task]) -> Vec<String> {
        tasks.iter().map(|t| t.title.clone()).collect()
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let tasks = vec![task(1, "Buy milk", None), task(2, "Clean house", None)];
        let hits = filter_tasks(&tasks, &TaskFilter::new("MILK", PriorityFilter::All));
        assert_eq!(titles(&hits), vec!["Buy milk"]);

        let all = filter_tasks(&tasks, &TaskFilter::default());
        assert_eq!(titles(&all), vec!["Buy milk", "Clean house"]);
    }

    #[test]
    fn test_search_term_is_trimmed() {
        let tasks = vec![task(1, "Buy milk", None), task(2, "Clean house", None)];
        let hits = filter_tasks(&tasks, &TaskFilter::new("  house ", PriorityFilter::All));
        assert_eq!(titles(&hits), vec!["Clean house"]);

        let blank = filter_tasks(&tasks, &TaskFilter::new("   ", PriorityFilter::All));
        assert_eq!(blank.len(), 2);
    }

    #[test]
    fn test_empty_titles_excluded_once_searching() {
        let tasks = vec![task(1, "", None), task(2, "Read", None)];
        let hits = filter_tasks(&tasks, &TaskFilter::new("r", PriorityFilter::All));
        assert_eq!(titles(&hits), vec!["Read"]);
    }

    #[test]
    fn test_all_priority_is_noop() {
        let tasks = vec![
            task(3, "c", Some(Priority::High)),
            task(1, "a", None),
            task(2, "b", Some(Priority::Low)),
        ];
        let out: Vec<Task> = filter_tasks(&tasks, &TaskFilter::default())
            .into_iter()
            .cloned()
            .collect();
        assert_eq!(out, tasks);
    }

    #[test]
    fn test_priority_and_search_combine_stably() {
        let tasks = vec![
            task(1, "Pay rent", Some(Priority::High)),
            task(2, "Pay bills", Some(Priority::Low)),
            task(3, "Pay taxes", Some(Priority::High)),
            task(4, "Walk dog", Some(Priority::High)),
        ];
        let filter = TaskFilter::new("pay", PriorityFilter::Only(Priority::High));
        let hits = filter_tasks(&tasks, &filter);
        assert_eq!(hits.iter().map(|t| t.id).collect::<Vec<_>>(), vec![1, 3]);
    }

    #[test]
    fn test_filtering_is_idempotent() {
        let tasks = vec![
            task(1, "Pay rent", Some(Priority::High)),
            task(2, "pay bills", Some(Priority::Low)),
            task(3, "Walk dog", Some(Priority::High)),
        ];
        let filter = TaskFilter::new("PAY", PriorityFilter::Only(Priority::High));
        let once = filter_tasks(&tasks, &filter);
        let twice = filter_tasks(once.iter().copied(), &filter);
        assert_eq!(once, twice);
    }
}
