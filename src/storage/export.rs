//! Plain-text export of the task list.

use std::fs;
use std::path::Path;

use crate::core::errors::{Result, TodoError};
use crate::tasks::task::Task;

/// Render the export body: a `Status  Task` header and one line per task,
/// joined by newlines with no trailing newline.
#[must_use]
pub fn render_text(tasks: &[Task]) -> String {
    let mut lines = Vec::with_capacity(tasks.len() + 1);
    lines.push(format!("{:<8}{}", "Status", "Task"));
    lines.extend(
        tasks
            .iter()
            .map(|task| format!("{:<8}{}", task.status_marker(), task.text)),
    );
    lines.join("\n")
}

/// Write [`render_text`] output to `path`, replacing any existing file.
pub fn export_text(path: &Path, tasks: &[Task]) -> Result<()> {
    fs::write(path, render_text(tasks)).map_err(|error| TodoError::io(path, error))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_list_exports_header_only() {
        assert_eq!(render_text(&[]), "Status  Task");
    }

    #[test]
    fn rows_are_aligned_under_header() {
        let tasks = vec![
            Task {
                text: "buy milk".to_string(),
                completed: true,
            },
            Task::new("sleep"),
        ];
        assert_eq!(
            render_text(&tasks),
            "Status  Task\n[x]     buy milk\n[ ]     sleep"
        );
    }

    #[test]
    fn export_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.txt");
        export_text(&path, &[Task::new("a")]).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "Status  Task\n[ ]     a");
    }

    #[test]
    fn export_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("tasks.txt");
        let err = export_text(&path, &[]).unwrap_err();
        assert_eq!(err.code(), "TDL-3002");
    }
}
