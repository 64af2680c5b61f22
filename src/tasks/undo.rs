//! Single-step undo: pop the newest action and apply its inverse.
//!
//! A popped action is gone for good (there is no redo). If its inverse cannot
//! be applied the store is left as it was and [`TodoError::UndoFailed`] is
//! returned; that only happens when the store and log have already diverged.

use crate::core::errors::{Result, TodoError};
use crate::tasks::history::{Action, ActionKind, ToggleAction};
use crate::tasks::list::{Outcome, Skip, TodoList};
use crate::tasks::task::TaskStore;

impl TodoList {
    /// Reverse the most recent recorded mutation.
    pub fn undo(&mut self) -> Result<Outcome> {
        let Some(action) = self.history.pop() else {
            return Ok(Outcome::Skipped(Skip::NothingToUndo));
        };
        let kind = action.kind();
        revert(&mut self.store, action)?;
        Ok(Outcome::Undone { kind })
    }
}

fn revert(store: &mut TaskStore, action: Action) -> Result<()> {
    match action {
        Action::Add { .. } => store
            .pop()
            .map(drop)
            .ok_or_else(|| failed(ActionKind::Add, "task store is empty".to_string())),
        Action::Delete { task, index } => {
            let len = store.len();
            store.insert(index, task).map_err(|_| {
                failed(
                    ActionKind::Delete,
                    format!("insertion index {index} out of range for {len} tasks"),
                )
            })
        }
        Action::Edit {
            index,
            previous_text,
        } => {
            let len = store.len();
            store
                .set_text(index, previous_text)
                .map_err(|_| failed(ActionKind::Edit, out_of_range(index, len)))
        }
        Action::Toggle(ToggleAction::Single { index }) => {
            let len = store.len();
            store
                .toggle(index)
                .map(drop)
                .map_err(|_| failed(ActionKind::Toggle, out_of_range(index, len)))
        }
        Action::Toggle(ToggleAction::Batch { indices }) => {
            let len = store.len();
            if let Some(&index) = indices.iter().find(|&&index| index >= len) {
                return Err(failed(ActionKind::Toggle, out_of_range(index, len)));
            }
            for &index in indices.iter().rev() {
                store.toggle(index)?;
            }
            Ok(())
        }
        Action::Sort { previous } => {
            store.replace_all(previous);
            Ok(())
        }
    }
}

fn out_of_range(index: usize, len: usize) -> String {
    format!("index {index} out of range for {len} tasks")
}

fn failed(kind: ActionKind, details: String) -> TodoError {
    TodoError::UndoFailed {
        action: kind.as_str(),
        details,
    }
}
