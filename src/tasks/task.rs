//! Task record and the ordered task store.
//!
//! Tasks have no stable identity: a task is addressed by its position in the
//! store, so every index-taking operation validates `index < len` before it
//! touches anything.

#![allow(missing_docs)]

use serde::{Deserialize, Serialize};

use crate::core::errors::{Result, TodoError};

/// A single to-do item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// User-supplied text. Stored under the `task` key on disk.
    #[serde(rename = "task", alias = "text")]
    pub text: String,
    #[serde(default)]
    pub completed: bool,
}

impl Task {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            completed: false,
        }
    }

    /// Checkbox marker used by the table and the text export.
    #[must_use]
    pub const fn status_marker(&self) -> &'static str {
        if self.completed { "[x]" } else { "[ ]" }
    }
}

/// Ordered, index-addressed collection of tasks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskStore {
    tasks: Vec<Task>,
}

impl TaskStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Task> {
        self.tasks.get(index)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Task] {
        &self.tasks
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Task> {
        self.tasks.iter()
    }

    /// Reject any index outside `0..len`.
    pub fn check_index(&self, index: usize) -> Result<()> {
        if index < self.tasks.len() {
            Ok(())
        } else {
            Err(TodoError::InvalidIndex {
                index,
                len: self.tasks.len(),
            })
        }
    }

    /// Append a new, not-completed task. Empty text is accepted as-is.
    pub fn add(&mut self, text: impl Into<String>) -> &Task {
        self.tasks.push(Task::new(text));
        &self.tasks[self.tasks.len() - 1]
    }

    /// Remove the task at `index`, shifting later tasks down.
    pub fn delete(&mut self, index: usize) -> Result<Task> {
        self.check_index(index)?;
        Ok(self.tasks.remove(index))
    }

    /// Replace the text at `index`, keeping its completion flag.
    /// Returns the text that was replaced.
    pub fn edit(&mut self, index: usize, text: impl Into<String>) -> Result<String> {
        self.check_index(index)?;
        Ok(std::mem::replace(&mut self.tasks[index].text, text.into()))
    }

    /// Flip the completion flag at `index`; returns the new value.
    pub fn toggle(&mut self, index: usize) -> Result<bool> {
        self.check_index(index)?;
        let task = &mut self.tasks[index];
        task.completed = !task.completed;
        Ok(task.completed)
    }

    /// Set every task to `completed`; returns the indices that actually flipped.
    pub fn set_all(&mut self, completed: bool) -> Vec<usize> {
        let mut flipped = Vec::new();
        for (index, task) in self.tasks.iter_mut().enumerate() {
            if task.completed != completed {
                task.completed = completed;
                flipped.push(index);
            }
        }
        flipped
    }

    /// Whether every completed task already precedes every pending one.
    #[must_use]
    pub fn is_partitioned(&self) -> bool {
        !self
            .tasks
            .windows(2)
            .any(|pair| !pair[0].completed && pair[1].completed)
    }

    /// Stable partition: completed tasks first, relative order kept inside
    /// each group. Returns `false` without touching anything when the store
    /// is already partitioned.
    pub fn sort_by_completed(&mut self) -> bool {
        if self.is_partitioned() {
            return false;
        }
        let (mut done, pending): (Vec<Task>, Vec<Task>) =
            self.tasks.drain(..).partition(|task| task.completed);
        done.extend(pending);
        self.tasks = done;
        true
    }

    /// Insert at `index`; `index == len` appends.
    pub(crate) fn insert(&mut self, index: usize, task: Task) -> Result<()> {
        if index > self.tasks.len() {
            return Err(TodoError::InvalidIndex {
                index,
                len: self.tasks.len(),
            });
        }
        self.tasks.insert(index, task);
        Ok(())
    }

    pub(crate) fn pop(&mut self) -> Option<Task> {
        self.tasks.pop()
    }

    pub(crate) fn replace_all(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
    }

    pub(crate) fn set_text(&mut self, index: usize, text: String) -> Result<()> {
        self.check_index(index)?;
        self.tasks[index].text = text;
        Ok(())
    }
}

impl<'a> IntoIterator for &'a TaskStore {
    type Item = &'a Task;
    type IntoIter = std::slice::Iter<'a, Task>;

    fn into_iter(self) -> Self::IntoIter {
        self.tasks.iter()
    }
}
