//! Persistence for the canonical task list.
//!
//! Tasks live in a key-value store under a single fixed key, serialised as a
//! JSON array. `FileStorage` keeps one file per key inside the data directory;
//! `MemoryStorage` keeps everything in memory.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::PathBuf;

use thiserror::Error;
use tracing::{debug, warn};

use crate::task::Task;

/// Key under which the full task list is stored.
pub const TASKS_KEY: &str = "tasks";
/// Key receiving the raw text of a task list that failed to parse.
pub const CORRUPT_BACKUP_KEY: &str = "tasks.corrupt";

/// Errors raised while reading or writing persisted tasks.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("stored data under '{key}' is malformed: {source}")]
    Corrupt {
        key: String,
        raw: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode tasks: {0}")]
    Encode(#[source] serde_json::Error),
}

/// A durable string key-value store.
pub trait Storage {
    /// Read the value under `key`, `None` when nothing was ever written.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Replace the value under `key`.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Storage backed by one JSON file per key in a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileStorage { dir: dir.into() }
    }

    /// File holding the value for `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(buf) => Ok(Some(buf)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Io { path, source }),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path_for(key);
        let io_err = |source| StoreError::Io {
            path: path.clone(),
            source,
        };
        fs::create_dir_all(&self.dir).map_err(io_err)?;

        // Atomic-ish write via temp + rename.
        let tmp = path.with_extension("json.tmp");
        let mut f = File::create(&tmp).map_err(io_err)?;
        f.write_all(value.as_bytes()).map_err(io_err)?;
        f.flush().map_err(io_err)?;
        fs::rename(&tmp, &path).map_err(io_err)?;
        Ok(())
    }
}

/// Storage kept entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Load the task list. An absent entry yields an empty list.
pub fn load<S: Storage + ?Sized>(storage: &S) -> Result<Vec<Task>, StoreError> {
    let Some(raw) = storage.get(TASKS_KEY)? else {
        return Ok(Vec::new());
    };
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(&raw).map_err(|source| StoreError::Corrupt {
        key: TASKS_KEY.to_string(),
        raw,
        source,
    })
}

/// Persist the whole task list, replacing what was stored before.
pub fn save<S: Storage + ?Sized>(storage: &mut S, tasks: &[Task]) -> Result<(), StoreError> {
    let data = serde_json::to_string_pretty(tasks).map_err(StoreError::Encode)?;
    storage.set(TASKS_KEY, &data)?;
    debug!(count = tasks.len(), "saved tasks");
    Ok(())
}

/// Load the task list, discarding malformed data instead of failing.
///
/// The unreadable text is copied to [`CORRUPT_BACKUP_KEY`] before starting
/// fresh, so nothing is lost silently. I/O failures still propagate.
pub fn load_or_reset<S: Storage + ?Sized>(storage: &mut S) -> Result<Vec<Task>, StoreError> {
    match load(storage) {
        Err(StoreError::Corrupt { key, raw, source }) => {
            warn!(%key, error = %source, "stored tasks are malformed, starting fresh");
            storage.set(CORRUPT_BACKUP_KEY, &raw)?;
            Ok(Vec::new())
        }
        other => other,
    }
}
