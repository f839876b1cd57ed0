//! Partitioning of filtered tasks into the upcoming, overdue and completed
//! buckets.
//!
//! Incomplete tasks are placed by comparing their due date against today:
//! strictly later is upcoming, strictly earlier is overdue. Tasks due today,
//! and tasks without a due date, land in neither.

use chrono::NaiveDate;

use crate::fields::Bucket;
use crate::task::Task;

/// The three derived views, each in canonical order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Board<'a> {
    pub upcoming: Vec<&'a Task>,
    pub overdue: Vec<&'a Task>,
    pub completed: Vec<&'a Task>,
}

impl<'a> Board<'a> {
    pub fn bucket(&self, bucket: Bucket) -> &[&'a Task] {
        match bucket {
            Bucket::Upcoming => &self.upcoming,
            Bucket::Overdue => &self.overdue,
            Bucket::Completed => &self.completed,
        }
    }

    /// Which bucket, if any, holds the task with `id`.
    pub fn locate(&self, id: u64) -> Option<Bucket> {
        Bucket::ALL
            .into_iter()
            .find(|&b| self.bucket(b).iter().any(|t| t.id == id))
    }

    pub fn len(&self) -> usize {
        self.upcoming.len() + self.overdue.len() + self.completed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Classify a single task against `today`.
pub fn classify(task: &Task, today: NaiveDate) -> Option<Bucket> {
    if task.completed {
        return Some(Bucket::Completed);
    }
    match task.due_date {
        Some(due) if due > today => Some(Bucket::Upcoming),
        Some(due) if due < today => Some(Bucket::Overdue),
        _ => None,
    }
}

/// Split `tasks` into buckets relative to `today`.
pub fn bucketize<'a, I>(tasks: I, today: NaiveDate) -> Board<'a>
where
    I: IntoIterator<Item = &'a Task>,
{
    let mut board = Board::default();
    for task in tasks {
        match classify(task, today) {
            Some(Bucket::Upcoming) => board.upcoming.push(task),
            Some(Bucket::Overdue) => board.overdue.push(task),
            Some(Bucket::Completed) => board.completed.push(task),
            None => {}
        }
    }
    board
}
