//! Runtime configuration: where tasks are stored and how much is logged.

use std::path::{Path, PathBuf};

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directive.
pub const LOG_ENV: &str = "TASK_TRACKER_LOG";
/// Directory name used under `$HOME`.
pub const DEFAULT_DIR_NAME: &str = ".task-tracker";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub log_filter: String,
}

impl Config {
    /// Resolve the configuration from an explicit directory (flag or
    /// environment, already merged by clap) and the process environment.
    pub fn resolve(dir: Option<&Path>) -> Self {
        let data_dir = match dir {
            Some(d) => d.to_path_buf(),
            None => default_data_dir(std::env::var("HOME").ok().as_deref()),
        };
        let log_filter = std::env::var(LOG_ENV).unwrap_or_else(|_| "warn".to_string());
        Config {
            data_dir,
            log_filter,
        }
    }

    /// Install the global tracing subscriber, writing to stderr.
    pub fn init_logging(&self) {
        let filter = EnvFilter::try_new(&self.log_filter).unwrap_or_else(|_| EnvFilter::new("warn"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }
}

/// `$HOME/.task-tracker`, or `./.task-tracker` when HOME is unset.
pub fn default_data_dir(home: Option<&str>) -> PathBuf {
    let base = match home {
        Some(h) if !h.is_empty() => PathBuf::from(h),
        _ => PathBuf::from("."),
    };
    base.join(DEFAULT_DIR_NAME)
}
