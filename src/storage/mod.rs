//! Persistence: JSON task file, save-as and plain-text export.

pub mod export;
pub mod file;

use std::path::PathBuf;

use crate::core::errors::{Result, TodoError};

/// Turn a user-typed file name into a path, rejecting blank input.
pub fn file_name_path(raw: &str) -> Result<PathBuf> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(TodoError::EmptyFileName);
    }
    Ok(PathBuf::from(trimmed))
}
