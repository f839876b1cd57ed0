use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;

/// Local task tracker.
/// Tasks are stored in <dir>/tasks.json; the board opens when no command is given.
#[derive(Parser)]
#[command(name = "tt", version, about = "Track upcoming, overdue and completed tasks")]
pub struct Cli {
    /// Directory holding the task store. Defaults to ~/.task-tracker.
    #[arg(long, global = true, env = "TASK_TRACKER_DIR")]
    pub dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::{Priority, PriorityFilter};
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_add_and_list() {
        let cli = Cli::try_parse_from(["tt", "add", "Pay bills", "--priority", "high", "--due", "tomorrow"]).unwrap();
        match cli.command {
            Some(Commands::Add { title, priority, due }) => {
                assert_eq!(title.as_deref(), Some("Pay bills"));
                assert_eq!(priority, Some(Priority::High));
                assert_eq!(due.as_deref(), Some("tomorrow"));
            }
            _ => panic!("expected add"),
        }

        let cli = Cli::try_parse_from(["tt", "--dir", "/tmp/t", "list", "--priority", "Low"]).unwrap();
        assert_eq!(cli.dir, Some(PathBuf::from("/tmp/t")));
        match cli.command {
            Some(Commands::List { priority, .. }) => {
                assert_eq!(priority, PriorityFilter::Only(Priority::Low));
            }
            _ => panic!("expected list"),
        }
    }

    #[test]
    fn test_no_subcommand_means_board() {
        let cli = Cli::try_parse_from(["tt"]).unwrap();
        assert!(cli.command.is_none());
    }
}
