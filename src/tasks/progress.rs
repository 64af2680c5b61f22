//! Completion summary and text progress bar.

#![allow(missing_docs)]
#![allow(clippy::cast_precision_loss)]

use crate::tasks::task::Task;

/// Coarse completion band, used to pick the bar colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressLevel {
    /// Below 33 %.
    Low,
    /// 33 % up to and including 66 %.
    Medium,
    /// Above 66 %.
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
}

impl Progress {
    #[must_use]
    pub fn of(tasks: &[Task]) -> Self {
        Self {
            completed: tasks.iter().filter(|task| task.completed).count(),
            total: tasks.len(),
        }
    }

    #[must_use]
    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.completed as f64 / self.total as f64
        }
    }

    #[must_use]
    pub fn percent(&self) -> f64 {
        self.ratio() * 100.0
    }

    #[must_use]
    pub fn level(&self) -> ProgressLevel {
        let percent = self.percent();
        if percent < 33.0 {
            ProgressLevel::Low
        } else if percent <= 66.0 {
            ProgressLevel::Medium
        } else {
            ProgressLevel::High
        }
    }

    /// `[###-------]` with `width` cells, filled cells rounded down.
    #[must_use]
    pub fn bar(&self, width: usize) -> String {
        let filled = (self.completed * width)
            .checked_div(self.total)
            .unwrap_or(0)
            .min(width);
        format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
    }

    /// Trailing numbers printed after the bar: `33.3%  (1/3)`.
    #[must_use]
    pub fn counts(&self) -> String {
        format!("{:.1}%  ({}/{})", self.percent(), self.completed, self.total)
    }
}
