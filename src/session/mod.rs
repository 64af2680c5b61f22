//! Session orchestration: runs list operations, applies the autosave policy
//! and records activity.
//!
//! The task list itself never does IO. After each operation the session looks
//! at the returned [`Outcome`]: if the list changed and autosave is on, the
//! full task list is handed to the [`TaskSink`]. A failed save is reported in
//! the [`Commit`] and never rolls back the in-memory change.

#![allow(missing_docs)]

use std::path::PathBuf;

use crate::core::errors::{ErrorClass, Result, TodoError};
use crate::logger::jsonl::{ActivityLog, EventType, LogEntry, Severity};
use crate::storage::export::export_text;
use crate::storage::file::{TaskSink, write_tasks};
use crate::storage::file_name_path;
use crate::tasks::list::{Outcome, TodoList};
use crate::tasks::task::Task;

/// What happened to persistence after an operation.
#[derive(Debug)]
pub enum SaveStatus {
    /// Nothing changed, or autosave is off.
    NotRequested,
    Saved,
    /// The change stands in memory but could not be written.
    Failed(TodoError),
}

/// Result of running one operation through the session.
#[derive(Debug)]
#[must_use]
pub struct Commit {
    pub outcome: Outcome,
    pub save: SaveStatus,
}

/// One interactive (or one-shot) run over a loaded task list.
#[derive(Debug)]
pub struct Session<S: TaskSink> {
    list: TodoList,
    sink: S,
    autosave: bool,
    log: ActivityLog,
}

impl<S: TaskSink> Session<S> {
    pub fn new(tasks: Vec<Task>, sink: S, autosave: bool, mut log: ActivityLog) -> Self {
        let mut entry = LogEntry::new(EventType::SessionStart, Severity::Info);
        entry.count = Some(tasks.len());
        entry.path = sink.location().map(|p| p.display().to_string());
        entry.details = Some(format!("autosave={autosave}"));
        log.write_entry(&entry);

        Self {
            list: TodoList::from_tasks(tasks),
            sink,
            autosave,
            log,
        }
    }

    #[must_use]
    pub fn list(&self) -> &TodoList {
        &self.list
    }

    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        self.list.tasks()
    }

    #[must_use]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Flip the autosave policy; returns the new setting.
    pub fn toggle_autosave(&mut self) -> bool {
        self.autosave = !self.autosave;
        self.autosave
    }

    pub fn add_task(&mut self, text: &str) -> Commit {
        let outcome = self.list.add_task(text);
        let mut entry = LogEntry::new(EventType::TaskAdded, Severity::Info);
        entry.index = Some(self.list.len() - 1);
        entry.text = Some(text.to_string());
        self.commit(outcome, &entry)
    }

    pub fn delete_task(&mut self, index: usize) -> Result<Commit> {
        let text = self.list.store().get(index).map(|task| task.text.clone());
        let outcome = self
            .list
            .delete_task(index)
            .map_err(|e| self.failed(EventType::TaskDeleted, e))?;
        let mut entry = LogEntry::new(EventType::TaskDeleted, Severity::Info);
        entry.index = Some(index);
        entry.text = text;
        Ok(self.commit(outcome, &entry))
    }

    pub fn edit_task(&mut self, index: usize, text: &str) -> Result<Commit> {
        let outcome = self
            .list
            .edit_task(index, text)
            .map_err(|e| self.failed(EventType::TaskEdited, e))?;
        let mut entry = LogEntry::new(EventType::TaskEdited, Severity::Info);
        entry.index = Some(index);
        entry.text = Some(text.to_string());
        Ok(self.commit(outcome, &entry))
    }

    pub fn toggle_task(&mut self, index: usize) -> Result<Commit> {
        let outcome = self
            .list
            .toggle_task(index)
            .map_err(|e| self.failed(EventType::TaskToggled, e))?;
        Ok(self.commit_toggle(outcome, index))
    }

    pub fn mark_task(&mut self, index: usize) -> Result<Commit> {
        let outcome = self
            .list
            .mark_task(index)
            .map_err(|e| self.failed(EventType::TaskToggled, e))?;
        Ok(self.commit_toggle(outcome, index))
    }

    pub fn unmark_task(&mut self, index: usize) -> Result<Commit> {
        let outcome = self
            .list
            .unmark_task(index)
            .map_err(|e| self.failed(EventType::TaskToggled, e))?;
        Ok(self.commit_toggle(outcome, index))
    }

    pub fn mark_all(&mut self) -> Commit {
        let outcome = self.list.mark_all();
        let entry = batch_entry(EventType::TasksMarked, &outcome);
        self.commit(outcome, &entry)
    }

    pub fn unmark_all(&mut self) -> Commit {
        let outcome = self.list.unmark_all();
        let entry = batch_entry(EventType::TasksUnmarked, &outcome);
        self.commit(outcome, &entry)
    }

    pub fn sort_by_completed(&mut self) -> Commit {
        let outcome = self.list.sort_by_completed();
        let entry = batch_entry(EventType::TasksSorted, &outcome);
        self.commit(outcome, &entry)
    }

    pub fn undo(&mut self) -> Result<Commit> {
        let outcome = self
            .list
            .undo()
            .map_err(|e| self.failed(EventType::Undo, e))?;
        let mut entry = LogEntry::new(EventType::Undo, Severity::Info);
        if let Outcome::Undone { kind } = &outcome {
            entry.details = Some(kind.to_string());
        }
        Ok(self.commit(outcome, &entry))
    }

    /// Write the current list as JSON to a user-named file.
    pub fn save_as(&mut self, raw_name: &str) -> Result<PathBuf> {
        let path = file_name_path(raw_name).map_err(|e| self.failed(EventType::Save, e))?;
        let result = write_tasks(&path, self.list.tasks());
        self.log_save(Some(&path), result.as_ref().err());
        result.map(|()| path)
    }

    /// Write the current list as plain text to a user-named file.
    pub fn export_text(&mut self, raw_name: &str) -> Result<PathBuf> {
        let path = file_name_path(raw_name).map_err(|e| self.failed(EventType::Export, e))?;
        let result = export_text(&path, self.list.tasks());
        let mut entry = LogEntry::new(EventType::Export, Severity::Info);
        entry.path = Some(path.display().to_string());
        entry.count = Some(self.list.len());
        match &result {
            Ok(()) => entry.ok = Some(true),
            Err(e) => entry = entry.with_error(e),
        }
        self.log.write_entry(&entry);
        result.map(|()| path)
    }

    /// End the session and hand back the sink.
    pub fn finish(mut self) -> S {
        let mut entry = LogEntry::new(EventType::SessionEnd, Severity::Info);
        entry.count = Some(self.list.len());
        self.log.write_entry(&entry);
        self.sink
    }

    // ──────────────────────── internals ────────────────────────

    fn commit_toggle(&mut self, outcome: Outcome, index: usize) -> Commit {
        let mut entry = LogEntry::new(EventType::TaskToggled, Severity::Info);
        entry.index = Some(index);
        entry.details = self
            .list
            .store()
            .get(index)
            .map(|task| format!("completed={}", task.completed));
        self.commit(outcome, &entry)
    }

    fn commit(&mut self, outcome: Outcome, entry: &LogEntry) -> Commit {
        if !outcome.changed() {
            return Commit {
                outcome,
                save: SaveStatus::NotRequested,
            };
        }
        self.log.write_entry(entry);

        let save = if self.autosave {
            match self.sink.persist(self.list.tasks()) {
                Ok(()) => {
                    self.log_save(None, None);
                    SaveStatus::Saved
                }
                Err(e) => {
                    self.log_save(None, Some(&e));
                    SaveStatus::Failed(e)
                }
            }
        } else {
            SaveStatus::NotRequested
        };
        Commit { outcome, save }
    }

    fn log_save(&mut self, target: Option<&std::path::Path>, error: Option<&TodoError>) {
        let mut entry = LogEntry::new(EventType::Save, Severity::Info);
        entry.count = Some(self.list.len());
        entry.path = target
            .or_else(|| self.sink.location())
            .map(|p| p.display().to_string());
        match error {
            None => entry.ok = Some(true),
            Some(e) => {
                entry = entry.with_error(e);
                entry.severity = Severity::Error;
            }
        }
        self.log.write_entry(&entry);
    }

    fn failed(&mut self, event: EventType, error: TodoError) -> TodoError {
        let severity = match error.class() {
            ErrorClass::User => Severity::Warning,
            ErrorClass::Internal | ErrorClass::Persistence | ErrorClass::Config => {
                Severity::Error
            }
        };
        let mut entry = LogEntry::new(EventType::Error, severity).with_error(&error);
        entry.details = Some(format!("{event:?}"));
        self.log.write_entry(&entry);
        error
    }
}

fn batch_entry(event: EventType, outcome: &Outcome) -> LogEntry {
    let mut entry = LogEntry::new(event, Severity::Info);
    if let Outcome::Applied { affected } = outcome {
        entry.count = Some(*affected);
    }
    entry
}
