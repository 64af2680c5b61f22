//! Interactive console menus over a [`Session`].
//!
//! The loop reads one trimmed line per prompt from any [`BufRead`] and writes
//! to any [`Write`], so the whole flow can be driven from a byte buffer in
//! tests. End of input at any prompt ends the session cleanly.

#![allow(missing_docs)]

use std::fmt::Display;
use std::io::{BufRead, Write};

use colored::{ColoredString, Colorize};

use crate::core::errors::{Result, TodoError};
use crate::session::{Commit, SaveStatus, Session};
use crate::storage::file::TaskSink;
use crate::tasks::list::{Outcome, Skip};
use crate::tasks::progress::{Progress, ProgressLevel};
use crate::tasks::task::Task;

/// Default number of cells in the progress bar.
pub const DEFAULT_BAR_WIDTH: usize = 10;

const INVALID_CHOICE: &str = "Invalid choice. Please try again.";
const INVALID_CONFIRM: &str = "Invalid choice, please enter 'y' or 'n'.";
const CHOOSE_ACTION: &str = "\nChoose an action: ";

/// Whether the current menu keeps running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Stay,
    Back,
    /// Exit chosen or input exhausted.
    Quit,
}

/// Answer to a y/n confirmation prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Confirm {
    Yes,
    No,
    Invalid,
}

/// Result of asking for a task number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Answer {
    /// Input ended before a number was typed.
    Eof,
    /// The number was invalid and has already been reported.
    Rejected,
    Index(usize),
}

/// Parse a 1-based task number typed by the user into a 0-based index.
pub fn parse_task_number(input: &str, len: usize) -> Result<usize> {
    let trimmed = input.trim();
    let number = match trimmed.parse::<i64>() {
        Ok(number) => number,
        Err(error) => {
            return Err(TodoError::InvalidNumber {
                input: trimmed.to_string(),
                details: error.to_string(),
            });
        }
    };
    let upper = i64::try_from(len).unwrap_or(i64::MAX);
    if number < 1 || number > upper {
        return Err(TodoError::TaskNumberOutOfRange { number, len });
    }
    usize::try_from(number - 1).map_err(|_| TodoError::TaskNumberOutOfRange { number, len })
}

fn parse_confirm(input: &str) -> Confirm {
    match input.trim().to_ascii_lowercase().as_str() {
        "y" => Confirm::Yes,
        "n" => Confirm::No,
        _ => Confirm::Invalid,
    }
}

/// Task table: a header row then one `N   [x]     text` row per task.
#[must_use]
pub fn render_table(tasks: &[Task]) -> Vec<String> {
    let header = format!("{:<4}{:<8}{}", "#", "Status", "Task");
    let mut lines = Vec::with_capacity(tasks.len() + 1);
    lines.push(header.blue().to_string());
    for (i, task) in tasks.iter().enumerate() {
        let number = format!("{:<4}", i + 1).blue();
        lines.push(format!("{number}{:<8}{}", task.status_marker(), task.text));
    }
    lines
}

/// `[###-------] 33.3%  (1/3)`, the bar coloured by completion level.
#[must_use]
pub fn render_progress(progress: &Progress, width: usize) -> String {
    let bar = progress.bar(width);
    let bar: ColoredString = match progress.level() {
        ProgressLevel::Low => bar.red(),
        ProgressLevel::Medium => bar.yellow(),
        ProgressLevel::High => bar.green(),
    };
    format!("{bar} {}", progress.counts())
}

/// The interactive menu loop.
#[derive(Debug)]
pub struct Menu<R, W, S: TaskSink> {
    session: Session<S>,
    input: R,
    out: W,
    bar_width: usize,
}

impl<R: BufRead, W: Write, S: TaskSink> Menu<R, W, S> {
    pub fn new(session: Session<S>, input: R, out: W) -> Self {
        Self {
            session,
            input,
            out,
            bar_width: DEFAULT_BAR_WIDTH,
        }
    }

    #[must_use]
    pub fn with_bar_width(mut self, width: usize) -> Self {
        self.bar_width = width;
        self
    }

    /// Give back the session, e.g. to finish it.
    pub fn into_session(self) -> Session<S> {
        self.session
    }

    /// Run the main menu until the user exits or input ends.
    pub fn run(&mut self) -> Result<()> {
        loop {
            self.say("\n=== To-Do Menu ===".blue())?;
            self.options(&[
                "Add task",
                "Show tasks",
                "Toggle menu",
                "Delete task",
                "Edit task",
                "Undo action",
                "File menu",
                "Exit",
            ])?;
            let Some(choice) = self.prompt(&CHOOSE_ACTION.blue())? else {
                return self.exit();
            };

            let flow = match choice.as_str() {
                "1" => self.add()?,
                "2" => self.show_menu()?,
                "3" => self.toggle_menu()?,
                "4" => self.delete()?,
                "5" => self.edit()?,
                "6" => self.undo()?,
                "7" => self.file_menu()?,
                "8" => Flow::Quit,
                _ => {
                    self.say(INVALID_CHOICE.red())?;
                    Flow::Stay
                }
            };
            if flow == Flow::Quit {
                return self.exit();
            }
        }
    }

    // ──────────────────────── main menu actions ────────────────────────

    fn add(&mut self) -> Result<Flow> {
        let Some(text) = self.prompt(&"Enter task title: ")? else {
            return Ok(Flow::Quit);
        };
        let commit = self.session.add_task(&text);
        let message = format!("Task #{} added!", self.session.tasks().len());
        self.say(message.green())?;
        self.report_save(&commit)?;
        Ok(Flow::Stay)
    }

    fn delete(&mut self) -> Result<Flow> {
        let index = match self.ask_task_number()? {
            Answer::Index(index) => index,
            Answer::Rejected => return Ok(Flow::Stay),
            Answer::Eof => return Ok(Flow::Quit),
        };

        self.say(format!(
            "{} #{}{}",
            "You are about to delete task".blue(),
            index + 1,
            ".".blue()
        ))?;
        let Some(answer) = self.prompt(&"Are you sure? (y/n): ".yellow())? else {
            return Ok(Flow::Quit);
        };
        match parse_confirm(&answer) {
            Confirm::Yes => match self.session.delete_task(index) {
                Ok(commit) => {
                    self.say("Task deleted.".green())?;
                    self.report_save(&commit)?;
                }
                Err(e) => self.report_error(&e)?,
            },
            Confirm::No => self.say("Action canceled.".red())?,
            Confirm::Invalid => self.say(INVALID_CONFIRM.red())?,
        }
        Ok(Flow::Stay)
    }

    fn edit(&mut self) -> Result<Flow> {
        let index = match self.ask_task_number()? {
            Answer::Index(index) => index,
            Answer::Rejected => return Ok(Flow::Stay),
            Answer::Eof => return Ok(Flow::Quit),
        };
        let Some(text) = self.prompt(&"Enter new task text: ")? else {
            return Ok(Flow::Quit);
        };

        self.say(format!(
            "{} #{} {} \"{text}\"{}",
            "You are about to change task".blue(),
            index + 1,
            "to:".blue(),
            ".".blue()
        ))?;
        let Some(answer) = self.prompt(&"Are you sure? (y/n): ".yellow())? else {
            return Ok(Flow::Quit);
        };
        match parse_confirm(&answer) {
            Confirm::Yes => match self.session.edit_task(index, &text) {
                Ok(commit) => {
                    self.say("Task updated.".green())?;
                    self.report_save(&commit)?;
                }
                Err(e) => self.report_error(&e)?,
            },
            Confirm::No => self.say("Task not changed.".red())?,
            Confirm::Invalid => self.say(INVALID_CONFIRM.red())?,
        }
        Ok(Flow::Stay)
    }

    fn undo(&mut self) -> Result<Flow> {
        match self.session.undo() {
            Ok(commit) if commit.outcome == Outcome::Skipped(Skip::NothingToUndo) => {
                self.say("Nothing to undo.".red())?;
            }
            Ok(commit) => {
                self.say("Undo last action.".green())?;
                self.report_save(&commit)?;
            }
            Err(e) => self.say(format!("Undo failed: {e}").magenta())?,
        }
        Ok(Flow::Stay)
    }

    // ──────────────────────── show menu ────────────────────────

    fn show_menu(&mut self) -> Result<Flow> {
        loop {
            self.say("\n=== Task List ===".blue())?;
            for line in render_table(self.session.tasks()) {
                self.say(line)?;
            }
            self.say("\nProgress:".blue())?;
            let progress = self.session.list().progress();
            self.say(render_progress(&progress, self.bar_width))?;

            self.say("\n--- Show Menu ---".blue())?;
            self.options(&["Sort by completed", "Back to menu"])?;
            let Some(choice) = self.prompt(&CHOOSE_ACTION.blue())? else {
                return Ok(Flow::Quit);
            };
            match choice.as_str() {
                "1" => {
                    let commit = self.session.sort_by_completed();
                    if commit.outcome == Outcome::Skipped(Skip::AlreadySorted) {
                        self.say("List is already sorted.".yellow())?;
                    } else {
                        self.say("List sorted.".green())?;
                        self.report_save(&commit)?;
                    }
                }
                "2" => return Ok(Flow::Back),
                _ => self.say(INVALID_CHOICE.red())?,
            }
        }
    }

    // ──────────────────────── toggle menu ────────────────────────

    fn toggle_menu(&mut self) -> Result<Flow> {
        loop {
            self.say("\n=== Toggle Menu ===".blue())?;
            self.options(&[
                "Mark task",
                "Unmark task",
                "Mark all",
                "Unmark all",
                "Toggle task",
                "Back to menu",
            ])?;
            let Some(choice) = self.prompt(&CHOOSE_ACTION.blue())? else {
                return Ok(Flow::Quit);
            };
            let flow = match choice.as_str() {
                "1" => self.mark_one(true)?,
                "2" => self.mark_one(false)?,
                "3" => {
                    let commit = self.session.mark_all();
                    self.report_batch(&commit, true)?;
                    Flow::Stay
                }
                "4" => {
                    let commit = self.session.unmark_all();
                    self.report_batch(&commit, false)?;
                    Flow::Stay
                }
                "5" => self.flip_one()?,
                "6" => return Ok(Flow::Back),
                _ => {
                    self.say(INVALID_CHOICE.red())?;
                    Flow::Stay
                }
            };
            if flow == Flow::Quit {
                return Ok(Flow::Quit);
            }
        }
    }

    fn mark_one(&mut self, completed: bool) -> Result<Flow> {
        let index = match self.ask_task_number()? {
            Answer::Index(index) => index,
            Answer::Rejected => return Ok(Flow::Stay),
            Answer::Eof => return Ok(Flow::Quit),
        };
        let result = if completed {
            self.session.mark_task(index)
        } else {
            self.session.unmark_task(index)
        };
        let commit = match result {
            Ok(commit) => commit,
            Err(e) => {
                self.report_error(&e)?;
                return Ok(Flow::Stay);
            }
        };

        let message = match (&commit.outcome, completed) {
            (Outcome::Skipped(_), true) => "Task is already marked as completed.".yellow(),
            (Outcome::Skipped(_), false) => "Task is already not marked as completed.".yellow(),
            (_, true) => "Task marked as complete.".green(),
            (_, false) => "Task marked as not complete.".green(),
        };
        self.say(message)?;
        self.report_save(&commit)?;
        Ok(Flow::Stay)
    }

    fn flip_one(&mut self) -> Result<Flow> {
        let index = match self.ask_task_number()? {
            Answer::Index(index) => index,
            Answer::Rejected => return Ok(Flow::Stay),
            Answer::Eof => return Ok(Flow::Quit),
        };
        match self.session.toggle_task(index) {
            Ok(commit) => {
                self.say("Task status toggled.".green())?;
                self.report_save(&commit)?;
            }
            Err(e) => self.report_error(&e)?,
        }
        Ok(Flow::Stay)
    }

    fn report_batch(&mut self, commit: &Commit, completed: bool) -> Result<()> {
        let message = match (&commit.outcome, completed) {
            (Outcome::Applied { affected }, true) => {
                format!("Marked {affected} task(s) as completed.").green()
            }
            (Outcome::Applied { affected }, false) => {
                format!("Marked {affected} task(s) as not completed.").green()
            }
            (_, true) => "All tasks are already completed.".yellow(),
            (_, false) => "All tasks are already not completed.".yellow(),
        };
        self.say(message)?;
        self.report_save(commit)
    }

    // ──────────────────────── file menu ────────────────────────

    fn file_menu(&mut self) -> Result<Flow> {
        loop {
            self.say("\n=== File Menu ===".blue())?;
            self.options(&[
                "Toggle autosave",
                "Save as...",
                "Export to text file",
                "Back to menu",
            ])?;
            let Some(choice) = self.prompt(&CHOOSE_ACTION.blue())? else {
                return Ok(Flow::Quit);
            };
            let flow = match choice.as_str() {
                "1" => self.toggle_autosave()?,
                "2" => self.save_as()?,
                "3" => self.export()?,
                "4" => return Ok(Flow::Back),
                _ => {
                    self.say(INVALID_CHOICE.red())?;
                    Flow::Stay
                }
            };
            if flow == Flow::Quit {
                return Ok(Flow::Quit);
            }
        }
    }

    fn toggle_autosave(&mut self) -> Result<Flow> {
        if self.session.toggle_autosave() {
            self.say("Autosave enabled.".green())?;
        } else {
            self.say("Autosave disabled.".yellow())?;
        }
        Ok(Flow::Stay)
    }

    fn save_as(&mut self) -> Result<Flow> {
        let Some(name) = self.prompt(&"Enter file name to save as: ")? else {
            return Ok(Flow::Quit);
        };
        match self.session.save_as(&name) {
            Ok(path) => {
                let label = "Tasks saved as:".green();
                self.say(format!("{label} {}", path.display()))?;
            }
            Err(e) => {
                let message = format!("[ERROR] Failed to save file: {e}");
                self.say(message.magenta())?;
            }
        }
        Ok(Flow::Stay)
    }

    fn export(&mut self) -> Result<Flow> {
        let Some(name) = self.prompt(&"Enter file name to export: ")? else {
            return Ok(Flow::Quit);
        };
        match self.session.export_text(&name) {
            Ok(path) => {
                let label = "Tasks exported to:".green();
                self.say(format!("{label} {}", path.display()))?;
            }
            Err(e) => {
                let message = format!("[ERROR] Failed to export file: {e}");
                self.say(message.magenta())?;
            }
        }
        Ok(Flow::Stay)
    }

    // ──────────────────────── terminal IO ────────────────────────

    fn exit(&mut self) -> Result<()> {
        self.say("Exiting...".blue())
    }

    fn ask_task_number(&mut self) -> Result<Answer> {
        let Some(raw) = self.prompt(&"Enter the task number: ")? else {
            return Ok(Answer::Eof);
        };
        match parse_task_number(&raw, self.session.tasks().len()) {
            Ok(index) => Ok(Answer::Index(index)),
            Err(e) => {
                self.report_error(&e)?;
                Ok(Answer::Rejected)
            }
        }
    }

    fn report_error(&mut self, error: &TodoError) -> Result<()> {
        match error {
            TodoError::TaskNumberOutOfRange { .. } | TodoError::InvalidIndex { .. } => {
                self.say("Invalid task number.".red())
            }
            other => self.say(format!("Error: {other}").magenta()),
        }
    }

    fn report_save(&mut self, commit: &Commit) -> Result<()> {
        if let SaveStatus::Failed(e) = &commit.save {
            self.say(format!("[ERROR] Autosave failed: {e}").magenta())?;
        }
        Ok(())
    }

    fn options(&mut self, labels: &[&str]) -> Result<()> {
        for (i, label) in labels.iter().enumerate() {
            let number = format!("{}.", i + 1).blue();
            self.say(format!("{number} {label}"))?;
        }
        Ok(())
    }

    fn say(&mut self, line: impl Display) -> Result<()> {
        writeln!(self.out, "{line}").map_err(|source| TodoError::Terminal { source })
    }

    fn prompt(&mut self, label: &dyn Display) -> Result<Option<String>> {
        write!(self.out, "{label}")
            .and_then(|()| self.out.flush())
            .map_err(|source| TodoError::Terminal { source })?;

        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .map_err(|source| TodoError::Terminal { source })?;
        if read == 0 {
            // Keep the transcript readable when input ends mid-prompt.
            writeln!(self.out).map_err(|source| TodoError::Terminal { source })?;
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}
