//! # tt - Task Tracker
//!
//! A local task tracker that sorts tasks into three buckets:
//!
//! - **Upcoming**: not completed, due after today
//! - **Overdue**: not completed, due before today
//! - **Completed**: completed, whatever the due date
//!
//! Tasks carry a title, an optional priority (low, medium, high), an optional
//! due date and a completion flag. Tasks due today or without a due date are
//! only shown once completed.
//!
//! ## Quick Start
//!
//! ```bash
//! # Open the interactive board
//! tt
//!
//! # Add a task via CLI
//! tt add "Pay bills" --priority high --due tomorrow
//!
//! # Show the buckets, filtered
//! tt list --search bills --priority high
//!
//! # Tick it off
//! tt complete 1
//! ```
//!
//! Data is stored in `~/.task-tracker/tasks.json` (override with `--dir` or
//! `TASK_TRACKER_DIR`). Set `TASK_TRACKER_LOG=debug` for verbose logs on stderr.

use clap::Parser;
use tracing::error;

pub mod buckets;
pub mod cli;
pub mod cmd;
pub mod config;
pub mod dates;
pub mod fields;
pub mod filter;
pub mod store;
pub mod task;
pub mod tracker;
pub mod tui {
    pub mod app;
    pub mod colors;
    pub mod enums;
    pub mod filter_controls;
    pub mod input;
    pub mod run;
    pub mod task_form;
    pub mod task_list;
    pub mod utils;
}

use cli::Cli;
use cmd::*;
use config::Config;
use store::FileStorage;
use tracker::Tracker;

fn main() {
    let cli = Cli::parse();
    let config = Config::resolve(cli.dir.as_deref());
    config.init_logging();

    if let Some(Commands::Completions { shell }) = &cli.command {
        cmd_completions(*shell);
        return;
    }

    let storage = FileStorage::new(&config.data_dir);
    let mut tracker = match Tracker::open(storage) {
        Ok(tracker) => tracker,
        Err(e) => {
            error!(dir = %config.data_dir.display(), "failed to open task store");
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };
    let today = dates::today();

    let result = match cli.command.unwrap_or(Commands::Ui) {
        Commands::Ui => cmd_ui(tracker),
        Commands::Add { title, priority, due } => cmd_add(&mut tracker, title, priority, due, today),
        Commands::List { search, priority, flat } => cmd_list(&mut tracker, search, priority, flat, today),
        Commands::Edit { id, title, priority, due, clear_priority, clear_due } =>
            cmd_edit(&mut tracker, id, title, priority, due, clear_priority, clear_due, today),
        Commands::Complete { id } => cmd_set_completed(&mut tracker, id, true),
        Commands::Reopen { id } => cmd_set_completed(&mut tracker, id, false),
        Commands::Delete { id } => cmd_delete(&mut tracker, id),
        Commands::Completions { .. } => unreachable!("completions handled above"),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
