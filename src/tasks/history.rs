//! Reversible action records and the LIFO history log.
//!
//! Stored indices are positions in the task store at the time the action was
//! recorded. Undo only ever consumes the newest action, so the positions are
//! still valid when it runs; anything replaying older entries (a redo stack,
//! say) would have to re-validate them.

#![allow(missing_docs)]

use std::fmt;

use serde::Serialize;

use crate::tasks::task::Task;

/// Discriminant of an [`Action`], used for reporting and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Add,
    Delete,
    Edit,
    Toggle,
    Sort,
}

impl ActionKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Delete => "delete",
            Self::Edit => "edit",
            Self::Toggle => "toggle",
            Self::Sort => "sort",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Completion flips recorded by a toggle action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleAction {
    /// One task flipped.
    Single { index: usize },
    /// Mark-all / unmark-all: every listed index flipped, in ascending order.
    Batch { indices: Vec<usize> },
}

/// One recorded mutation, carrying exactly what its inverse needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// The task appended at the end of the store.
    Add { task: Task },
    /// The task removed and where it was.
    Delete { task: Task, index: usize },
    /// The text an edit replaced.
    Edit { index: usize, previous_text: String },
    Toggle(ToggleAction),
    /// Store contents before the partition.
    Sort { previous: Vec<Task> },
}

impl Action {
    #[must_use]
    pub const fn kind(&self) -> ActionKind {
        match self {
            Self::Add { .. } => ActionKind::Add,
            Self::Delete { .. } => ActionKind::Delete,
            Self::Edit { .. } => ActionKind::Edit,
            Self::Toggle(_) => ActionKind::Toggle,
            Self::Sort { .. } => ActionKind::Sort,
        }
    }
}

/// Append-only stack of actions. Unbounded for the lifetime of a session.
#[derive(Debug, Clone, Default)]
pub struct HistoryLog {
    actions: Vec<Action>,
}

impl HistoryLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, action: Action) {
        self.actions.push(action);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Kind of the action the next undo would reverse.
    #[must_use]
    pub fn last_kind(&self) -> Option<ActionKind> {
        self.actions.last().map(Action::kind)
    }

    pub(crate) fn pop(&mut self) -> Option<Action> {
        self.actions.pop()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_is_lifo() {
        let mut log = HistoryLog::new();
        log.record(Action::Add {
            task: Task::new("a"),
        });
        log.record(Action::Toggle(ToggleAction::Single { index: 0 }));
        assert_eq!(log.len(), 2);
        assert_eq!(log.last_kind(), Some(ActionKind::Toggle));

        assert_eq!(
            log.pop(),
            Some(Action::Toggle(ToggleAction::Single { index: 0 }))
        );
        assert_eq!(log.last_kind(), Some(ActionKind::Add));
        assert!(log.pop().is_some());
        assert!(log.is_empty());
        assert_eq!(log.pop(), None);
    }

    #[test]
    fn kinds_map_to_stable_names() {
        let cases = [
            (
                Action::Delete {
                    task: Task::new("x"),
                    index: 2,
                },
                "delete",
            ),
            (
                Action::Edit {
                    index: 0,
                    previous_text: "old".to_string(),
                },
                "edit",
            ),
            (
                Action::Toggle(ToggleAction::Batch {
                    indices: vec![0, 1],
                }),
                "toggle",
            ),
            (Action::Sort { previous: vec![] }, "sort"),
        ];
        for (action, name) in cases {
            assert_eq!(action.kind().to_string(), name);
        }
    }
}
