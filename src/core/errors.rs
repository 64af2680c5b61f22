//! TDL-prefixed error types with structured error codes.

#![allow(missing_docs)]

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Shared `Result` alias for the project.
pub type Result<T> = std::result::Result<T, TodoError>;

/// Broad failure class, used by the menu loop and the binary to decide how to
/// report an error and which exit code to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Bad input from the user; nothing was mutated.
    User,
    /// A logic bug surfaced at runtime (for example an undo against stale state).
    Internal,
    /// Saving, loading, exporting or terminal IO failed.
    Persistence,
    /// Configuration could not be loaded or is invalid.
    Config,
}

/// Top-level error type for the to-do list manager.
#[derive(Debug, Error)]
pub enum TodoError {
    #[error("[TDL-1001] invalid configuration: {details}")]
    InvalidConfig { details: String },

    #[error("[TDL-1002] missing configuration file: {path}")]
    MissingConfig { path: PathBuf },

    #[error("[TDL-1003] configuration parse failure in {context}: {details}")]
    ConfigParse {
        context: &'static str,
        details: String,
    },

    #[error("[TDL-2001] invalid task index {index} (list has {len} tasks)")]
    InvalidIndex { index: usize, len: usize },

    #[error("[TDL-2002] only a number can be entered: {input:?}: {details}")]
    InvalidNumber { input: String, details: String },

    #[error("[TDL-2003] invalid task number {number} (list has {len} tasks)")]
    TaskNumberOutOfRange { number: i64, len: usize },

    #[error("[TDL-2004] file name cannot be empty")]
    EmptyFileName,

    #[error("[TDL-2101] undo failed for {action} action: {details}")]
    UndoFailed {
        action: &'static str,
        details: String,
    },

    #[error("[TDL-3001] serialization failure in {context}: {details}")]
    Serialization {
        context: &'static str,
        details: String,
    },

    #[error("[TDL-3002] IO failure at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("[TDL-3003] terminal IO failure: {source}")]
    Terminal {
        #[source]
        source: std::io::Error,
    },
}

impl TodoError {
    /// Stable machine-parseable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidConfig { .. } => "TDL-1001",
            Self::MissingConfig { .. } => "TDL-1002",
            Self::ConfigParse { .. } => "TDL-1003",
            Self::InvalidIndex { .. } => "TDL-2001",
            Self::InvalidNumber { .. } => "TDL-2002",
            Self::TaskNumberOutOfRange { .. } => "TDL-2003",
            Self::EmptyFileName => "TDL-2004",
            Self::UndoFailed { .. } => "TDL-2101",
            Self::Serialization { .. } => "TDL-3001",
            Self::Io { .. } => "TDL-3002",
            Self::Terminal { .. } => "TDL-3003",
        }
    }

    /// Which part of the error taxonomy this failure belongs to.
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::InvalidConfig { .. } | Self::MissingConfig { .. } | Self::ConfigParse { .. } => {
                ErrorClass::Config
            }
            Self::InvalidIndex { .. }
            | Self::InvalidNumber { .. }
            | Self::TaskNumberOutOfRange { .. }
            | Self::EmptyFileName => ErrorClass::User,
            Self::UndoFailed { .. } => ErrorClass::Internal,
            Self::Serialization { .. } | Self::Io { .. } | Self::Terminal { .. } => {
                ErrorClass::Persistence
            }
        }
    }

    /// Whether the failure was caused by bad user input.
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        matches!(self.class(), ErrorClass::User)
    }

    /// Convenience constructor for IO errors with a known path.
    #[must_use]
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

impl From<serde_json::Error> for TodoError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization {
            context: "serde_json",
            details: value.to_string(),
        }
    }
}

impl From<toml::de::Error> for TodoError {
    fn from(value: toml::de::Error) -> Self {
        Self::ConfigParse {
            context: "toml",
            details: value.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_variants() -> Vec<TodoError> {
        vec![
            TodoError::InvalidConfig {
                details: String::new(),
            },
            TodoError::MissingConfig {
                path: PathBuf::new(),
            },
            TodoError::ConfigParse {
                context: "",
                details: String::new(),
            },
            TodoError::InvalidIndex { index: 0, len: 0 },
            TodoError::InvalidNumber {
                input: String::new(),
                details: String::new(),
            },
            TodoError::TaskNumberOutOfRange { number: 0, len: 0 },
            TodoError::EmptyFileName,
            TodoError::UndoFailed {
                action: "add",
                details: String::new(),
            },
            TodoError::Serialization {
                context: "",
                details: String::new(),
            },
            TodoError::Io {
                path: PathBuf::new(),
                source: std::io::Error::other("test"),
            },
            TodoError::Terminal {
                source: std::io::Error::other("test"),
            },
        ]
    }

    #[test]
    fn error_codes_are_unique() {
        let errors = all_variants();
        let codes: Vec<&str> = errors.iter().map(TodoError::code).collect();
        let unique: std::collections::HashSet<&&str> = codes.iter().collect();
        assert_eq!(
            codes.len(),
            unique.len(),
            "error codes must be unique: {codes:?}"
        );
    }

    #[test]
    fn display_carries_the_code() {
        for err in all_variants() {
            let msg = err.to_string();
            assert!(
                msg.contains(err.code()),
                "display should contain error code {}: {msg}",
                err.code()
            );
        }
    }

    #[test]
    fn classes_follow_taxonomy() {
        assert_eq!(
            TodoError::InvalidIndex { index: 3, len: 2 }.class(),
            ErrorClass::User
        );
        assert!(TodoError::EmptyFileName.is_user_error());
        assert_eq!(
            TodoError::UndoFailed {
                action: "edit",
                details: "index 4 out of range".to_string(),
            }
            .class(),
            ErrorClass::Internal
        );
        assert_eq!(
            TodoError::io("/tmp/tasks.json", std::io::Error::other("disk full")).class(),
            ErrorClass::Persistence
        );
        assert_eq!(
            TodoError::MissingConfig {
                path: PathBuf::from("/nope.toml")
            }
            .class(),
            ErrorClass::Config
        );
    }

    #[test]
    fn io_convenience_constructor() {
        let err = TodoError::io(
            "/tmp/tasks.json",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert_eq!(err.code(), "TDL-3002");
        assert!(err.to_string().contains("/tmp/tasks.json"));
    }

    #[test]
    fn from_serde_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err: TodoError = json_err.into();
        assert_eq!(err.code(), "TDL-3001");
    }

    #[test]
    fn from_toml_error() {
        let toml_err = toml::from_str::<toml::Value>("= invalid").unwrap_err();
        let err: TodoError = toml_err.into();
        assert_eq!(err.code(), "TDL-1003");
    }
}
