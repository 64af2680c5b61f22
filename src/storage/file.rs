//! JSON task file: the persisted form of the task store.
//!
//! The file is a pretty-printed array of `{"task": ..., "completed": ...}`
//! objects and is always rewritten whole, through a temp file and rename.

#![allow(missing_docs)]

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::core::errors::{Result, TodoError};
use crate::tasks::task::Task;

/// Receiver for "persist now" requests issued after a mutation.
pub trait TaskSink {
    /// Store the full task list, replacing whatever was stored before.
    fn persist(&mut self, tasks: &[Task]) -> Result<()>;

    /// Where the tasks end up, for messages and activity logging.
    fn location(&self) -> Option<&Path> {
        None
    }
}

/// Task list stored as a JSON file on disk.
#[derive(Debug, Clone)]
pub struct TaskFile {
    path: PathBuf,
}

impl TaskFile {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Read the task list. A missing file is an empty list, not an error.
    pub fn load(&self) -> Result<Vec<Task>> {
        let raw = match fs::read(&self.path) {
            Ok(raw) => raw,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(error) => return Err(TodoError::io(&self.path, error)),
        };

        // Older files may hold a literal `null` for an empty list.
        let parsed: serde_json::Result<Option<Vec<Task>>> = serde_json::from_slice(&raw);
        let tasks = parsed.map_err(|error| TodoError::Serialization {
            context: "task file",
            details: format!("{}: {error}", self.path.display()),
        })?;
        Ok(tasks.unwrap_or_default())
    }

    pub fn save(&self, tasks: &[Task]) -> Result<()> {
        write_tasks(&self.path, tasks)
    }
}

impl TaskSink for TaskFile {
    fn persist(&mut self, tasks: &[Task]) -> Result<()> {
        self.save(tasks)
    }

    fn location(&self) -> Option<&Path> {
        Some(&self.path)
    }
}

/// Serialize `tasks` to `path` using atomic rename.
pub fn write_tasks(path: &Path, tasks: &[Task]) -> Result<()> {
    let data = serde_json::to_vec_pretty(tasks)?;

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|error| TodoError::io(parent, error))?;
    }

    let tmp_path = temp_path(path);
    fs::write(&tmp_path, data).map_err(|error| TodoError::io(&tmp_path, error))?;
    fs::rename(&tmp_path, path).map_err(|error| {
        let _ = fs::remove_file(&tmp_path);
        TodoError::io(path, error)
    })
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map_or_else(|| OsString::from("tasks"), ToOwned::to_owned);
    name.push(".tmp");
    path.with_file_name(name)
}
