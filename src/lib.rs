#![forbid(unsafe_code)]

//! todolist: a console to-do list manager with multi-level undo.
//!
//! The core is an explicit [`tasks::list::TodoList`] value owning the ordered
//! task store and the history log. Every mutation records the information its
//! inverse needs, so [`tasks::list::TodoList::undo`] can step back one action
//! at a time. IO lives at the edges:
//! 1. **Session** applies the autosave policy and records activity
//! 2. **Storage** reads and writes the JSON task file and text exports
//! 3. **CLI** (feature `cli`) drives a session from interactive menus
//!
//! # Library usage
//!
//! ```rust,no_run
//! use todolist::prelude::*;
//!
//! let mut list = TodoList::new();
//! let _ = list.add_task("buy milk");
//! let _ = list.undo();
//! assert!(list.is_empty());
//! ```

pub mod prelude;

#[cfg(feature = "cli")]
pub mod cli;
pub mod core;
pub mod logger;
pub mod session;
pub mod storage;
pub mod tasks;
