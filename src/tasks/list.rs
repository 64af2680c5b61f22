//! Undoable mutation operations over an explicit task-list state object.
//!
//! Every operation follows the same sequence: validate, capture whatever the
//! inverse needs, mutate the store, then record the action. Nothing here does
//! IO; callers look at the returned [`Outcome`] to decide whether to persist.

#![allow(missing_docs)]

use crate::core::errors::Result;
use crate::tasks::history::{Action, ActionKind, HistoryLog, ToggleAction};
use crate::tasks::progress::Progress;
use crate::tasks::task::{Task, TaskStore};

/// Why an operation left the list untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Skip {
    /// Sort found completed tasks already ahead of pending ones.
    AlreadySorted,
    /// Mark on a task that is already completed.
    AlreadyCompleted,
    /// Unmark on a task that is already pending.
    AlreadyPending,
    /// Mark-all found no pending task.
    AllCompleted,
    /// Unmark-all found no completed task.
    NoneCompleted,
    /// Undo with an empty history.
    NothingToUndo,
}

/// Result of a mutation, doubling as the "state changed" signal.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum Outcome {
    /// The store changed; `affected` tasks were added, removed or modified.
    Applied { affected: usize },
    /// Undo reversed the newest action of this kind.
    Undone { kind: ActionKind },
    /// Nothing changed and nothing was recorded.
    Skipped(Skip),
}

impl Outcome {
    /// Whether the store was modified (and should be persisted).
    #[must_use]
    pub const fn changed(&self) -> bool {
        !matches!(self, Self::Skipped(_))
    }
}

/// The in-memory task store together with its history log.
#[derive(Debug, Clone, Default)]
pub struct TodoList {
    pub(crate) store: TaskStore,
    pub(crate) history: HistoryLog,
}

impl TodoList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a session from loaded tasks. History always starts empty.
    #[must_use]
    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        Self {
            store: TaskStore::from_tasks(tasks),
            history: HistoryLog::new(),
        }
    }

    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        self.store.as_slice()
    }

    #[must_use]
    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    #[must_use]
    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.store.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    #[must_use]
    pub fn progress(&self) -> Progress {
        Progress::of(self.store.as_slice())
    }

    pub fn add_task(&mut self, text: impl Into<String>) -> Outcome {
        let task = self.store.add(text).clone();
        self.history.record(Action::Add { task });
        Outcome::Applied { affected: 1 }
    }

    pub fn delete_task(&mut self, index: usize) -> Result<Outcome> {
        let task = self.store.delete(index)?;
        self.history.record(Action::Delete { task, index });
        Ok(Outcome::Applied { affected: 1 })
    }

    pub fn edit_task(&mut self, index: usize, text: impl Into<String>) -> Result<Outcome> {
        let previous_text = self.store.edit(index, text)?;
        self.history.record(Action::Edit {
            index,
            previous_text,
        });
        Ok(Outcome::Applied { affected: 1 })
    }

    /// Flip completion of one task.
    pub fn toggle_task(&mut self, index: usize) -> Result<Outcome> {
        self.store.toggle(index)?;
        self.history.record(Action::Toggle(ToggleAction::Single { index }));
        Ok(Outcome::Applied { affected: 1 })
    }

    /// Mark one task completed; a no-op if it already is.
    pub fn mark_task(&mut self, index: usize) -> Result<Outcome> {
        self.set_completed(index, true)
    }

    /// Mark one task pending; a no-op if it already is.
    pub fn unmark_task(&mut self, index: usize) -> Result<Outcome> {
        self.set_completed(index, false)
    }

    /// Complete every pending task as one undoable batch.
    pub fn mark_all(&mut self) -> Outcome {
        self.set_all(true)
    }

    /// Reopen every completed task as one undoable batch.
    pub fn unmark_all(&mut self) -> Outcome {
        self.set_all(false)
    }

    /// Move completed tasks ahead of pending ones (stable partition).
    pub fn sort_by_completed(&mut self) -> Outcome {
        if self.store.is_partitioned() {
            return Outcome::Skipped(Skip::AlreadySorted);
        }
        let previous = self.store.as_slice().to_vec();
        self.store.sort_by_completed();
        let affected = self.store.len();
        self.history.record(Action::Sort { previous });
        Outcome::Applied { affected }
    }

    fn set_completed(&mut self, index: usize, completed: bool) -> Result<Outcome> {
        self.store.check_index(index)?;
        if self.store.as_slice()[index].completed == completed {
            return Ok(Outcome::Skipped(if completed {
                Skip::AlreadyCompleted
            } else {
                Skip::AlreadyPending
            }));
        }
        self.toggle_task(index)
    }

    fn set_all(&mut self, completed: bool) -> Outcome {
        let indices = self.store.set_all(completed);
        if indices.is_empty() {
            return Outcome::Skipped(if completed {
                Skip::AllCompleted
            } else {
                Skip::NoneCompleted
            });
        }
        let affected = indices.len();
        self.history.record(Action::Toggle(ToggleAction::Batch { indices }));
        Outcome::Applied { affected }
    }
}
