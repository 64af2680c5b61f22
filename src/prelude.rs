//! Convenience re-exports for library consumers.
//!
//! ```rust,no_run
//! use todolist::prelude::*;
//! ```

// Core
pub use crate::core::config::Config;
pub use crate::core::errors::{ErrorClass, Result, TodoError};

// Tasks
pub use crate::tasks::history::{Action, ActionKind, HistoryLog};
pub use crate::tasks::list::{Outcome, Skip, TodoList};
pub use crate::tasks::progress::{Progress, ProgressLevel};
pub use crate::tasks::task::{Task, TaskStore};

// Storage
pub use crate::storage::file::{TaskFile, TaskSink};

// Session
pub use crate::session::{Commit, SaveStatus, Session};

// Logging
pub use crate::logger::jsonl::{ActivityLog, JsonlConfig};
