//! Command implementations for the CLI interface.
//!
//! Each handler drives the same `Tracker` transitions as the board, so the
//! CLI and the TUI share defaults, id assignment and persistence.

use std::fmt::Write as _;

use chrono::NaiveDate;
use clap::Subcommand;
use clap_complete::{generate, Shell};
use thiserror::Error;

use crate::buckets::Board;
use crate::dates::{format_due_relative, parse_due_input, truncate};
use crate::fields::{Bucket, Priority, PriorityFilter};
use crate::store::Storage;
use crate::task::{Task, TaskDraft};
use crate::tracker::{Tracker, TrackerError};
use crate::tui::run::run_tui;

#[derive(Subcommand)]
pub enum Commands {
    /// Launch the interactive board.
    Ui,

    /// Add a new task.
    Add {
        /// Short title for the task. Defaults to "Untitled Task".
        title: Option<String>,
        /// Priority: low | medium | high.
        #[arg(long, value_enum)]
        priority: Option<Priority>,
        /// Due date: YYYY-MM-DD, "today", "tomorrow", "fri", "next mon", or "in Nd".
        #[arg(long)]
        due: Option<String>,
    },

    /// Show the upcoming, overdue and completed buckets.
    List {
        /// Only tasks whose title contains this text (case-insensitive).
        #[arg(long, default_value = "")]
        search: String,
        /// Priority filter: all | low | medium | high.
        #[arg(long, default_value = "all")]
        priority: PriorityFilter,
        /// Print every matching task in one list instead of buckets.
        #[arg(long)]
        flat: bool,
    },

    /// Edit fields on a task.
    Edit {
        /// Task ID.
        id: u64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long, value_enum, conflicts_with = "clear_priority")]
        priority: Option<Priority>,
        #[arg(long, conflicts_with = "clear_due")]
        due: Option<String>,
        /// Remove the priority.
        #[arg(long)]
        clear_priority: bool,
        /// Remove the due date.
        #[arg(long)]
        clear_due: bool,
    },

    /// Mark a task completed.
    Complete {
        /// Task ID.
        id: u64,
    },

    /// Mark a completed task as not completed.
    Reopen {
        /// Task ID.
        id: u64,
    },

    /// Delete a task.
    Delete {
        /// Task ID.
        id: u64,
    },

    /// Generate shell completions.
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Errors surfaced to the command line.
#[derive(Debug, Error)]
pub enum CmdError {
    #[error("could not understand due date '{0}'")]
    InvalidDue(String),

    #[error(transparent)]
    Tracker(#[from] TrackerError),

    #[error("UI error: {0}")]
    Ui(#[from] std::io::Error),
}

pub type CmdResult = Result<(), CmdError>;

fn parse_due(raw: &str, today: NaiveDate) -> Result<NaiveDate, CmdError> {
    parse_due_input(raw, today).ok_or_else(|| CmdError::InvalidDue(raw.to_string()))
}

/// Launch the terminal user interface.
pub fn cmd_ui<S: Storage>(tracker: Tracker<S>) -> CmdResult {
    run_tui(tracker)?;
    Ok(())
}

/// Add a new task.
pub fn cmd_add<S: Storage>(
    tracker: &mut Tracker<S>,
    title: Option<String>,
    priority: Option<Priority>,
    due: Option<String>,
    today: NaiveDate,
) -> CmdResult {
    let due_date = due.as_deref().map(|d| parse_due(d, today)).transpose()?;
    let draft = TaskDraft {
        title: title.unwrap_or_default(),
        priority,
        due_date,
    };
    let id = tracker.create(draft)?;
    println!("Added task {id}");
    Ok(())
}

/// Print the filtered tasks, bucketed unless `flat` is set.
pub fn cmd_list<S: Storage>(
    tracker: &mut Tracker<S>,
    search: String,
    priority: PriorityFilter,
    flat: bool,
    today: NaiveDate,
) -> CmdResult {
    tracker.set_search(search);
    tracker.set_priority(priority);
    let out = if flat {
        format_table(&tracker.visible(), today)
    } else {
        format_board(&tracker.board(today), today)
    };
    print!("{out}");
    Ok(())
}

/// Edit a task through the same begin-edit/submit flow as the form.
#[allow(clippy::too_many_arguments)]
pub fn cmd_edit<S: Storage>(
    tracker: &mut Tracker<S>,
    id: u64,
    title: Option<String>,
    priority: Option<Priority>,
    due: Option<String>,
    clear_priority: bool,
    clear_due: bool,
    today: NaiveDate,
) -> CmdResult {
    let due_date = due.as_deref().map(|d| parse_due(d, today)).transpose()?;

    tracker.begin_edit(id)?;
    let mut draft = tracker
        .editing()
        .map(TaskDraft::from)
        .ok_or(TrackerError::NotFound(id))?;
    if let Some(title) = title {
        draft.title = title;
    }
    if priority.is_some() || clear_priority {
        draft.priority = priority;
    }
    if due_date.is_some() || clear_due {
        draft.due_date = due_date;
    }
    tracker.submit(draft)?;
    println!("Updated task {id}");
    Ok(())
}

/// Set the completion flag of a task.
pub fn cmd_set_completed<S: Storage>(tracker: &mut Tracker<S>, id: u64, completed: bool) -> CmdResult {
    let mut task = tracker.get(id).cloned().ok_or(TrackerError::NotFound(id))?;
    if task.completed == completed {
        println!(
            "Task {id} is already {}",
            if completed { "completed" } else { "open" }
        );
        return Ok(());
    }
    task.completed = completed;
    tracker.update(task)?;
    println!("{} task {id}", if completed { "Completed" } else { "Reopened" });
    Ok(())
}

/// Delete a task.
pub fn cmd_delete<S: Storage>(tracker: &mut Tracker<S>, id: u64) -> CmdResult {
    let removed = tracker.delete(id)?;
    println!("Deleted task {id} ({})", removed.title);
    Ok(())
}

/// Generate shell completion scripts.
pub fn cmd_completions(shell: Shell) {
    use clap::CommandFactory;
    use crate::cli::Cli;

    let mut app = Cli::command();
    let app_name = app.get_name().to_string();
    generate(shell, &mut app, app_name, &mut std::io::stdout());
}

/// Render tasks as a fixed-width table.
pub fn format_table(tasks: &[&Task], today: NaiveDate) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<5} {:<7} {:<10} {:<4} {}", "ID", "Pri", "Due", "Done", "Title");
    for t in tasks {
        let _ = writeln!(
            out,
            "{:<5} {:<7} {:<10} {:<4} {}",
            t.id,
            t.priority.map(|p| p.label()).unwrap_or("-"),
            truncate(&format_due_relative(t.due_date, today), 10),
            if t.completed { "x" } else { "" },
            t.title
        );
    }
    out
}

/// Render the three buckets one after another.
pub fn format_board(board: &Board<'_>, today: NaiveDate) -> String {
    let mut out = String::new();
    for bucket in Bucket::ALL {
        let tasks = board.bucket(bucket);
        let _ = writeln!(out, "{} ({})", bucket.title(), tasks.len());
        if tasks.is_empty() {
            let _ = writeln!(out, "  (none)");
        } else {
            for line in format_table(tasks, today).lines() {
                let _ = writeln!(out, "  {line}");
            }
        }
        let _ = writeln!(out);
    }
    out
}
