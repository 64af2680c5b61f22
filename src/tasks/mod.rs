//! Task store, history log, undoable mutations and the undo engine.

pub mod history;
pub mod list;
pub mod progress;
pub mod task;
mod undo;

#[cfg(test)]
mod test_properties;
