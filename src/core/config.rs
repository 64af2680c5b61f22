//! Configuration system: TOML file + env var overrides + defaults.

#![allow(missing_docs)]

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::errors::{Result, TodoError};
use crate::core::paths::resolve_absolute_path;

/// Full configuration model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Config {
    pub storage: StorageConfig,
    pub display: DisplayConfig,
    pub logging: LoggingConfig,
    /// File this configuration was loaded from (or would be).
    #[serde(skip)]
    pub source: PathBuf,
}

/// Where tasks are persisted and when.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct StorageConfig {
    /// Task file; relative paths resolve against the working directory.
    pub data_file: PathBuf,
    /// Persist after every successful mutation.
    pub autosave: bool,
}

/// Terminal rendering knobs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DisplayConfig {
    pub color: bool,
    pub progress_bar_width: usize,
}

/// Activity log settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingConfig {
    pub enabled: bool,
    pub activity_log: PathBuf,
    pub max_size_bytes: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from("tasks.json"),
            autosave: true,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            color: true,
            progress_bar_width: 10,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            activity_log: home_dir()
                .join(".local")
                .join("share")
                .join("todolist")
                .join("activity.jsonl"),
            max_size_bytes: 5 * 1024 * 1024,
        }
    }
}

fn home_dir() -> PathBuf {
    env::var_os("HOME").map_or_else(
        || {
            eprintln!("[TDL-CONFIG] WARNING: HOME not set, falling back to /tmp for data paths");
            PathBuf::from("/tmp")
        },
        PathBuf::from,
    )
}

impl Config {
    /// Default configuration path.
    #[must_use]
    pub fn default_path() -> PathBuf {
        home_dir()
            .join(".config")
            .join("todolist")
            .join("config.toml")
    }

    /// Load config from default or explicit path, then apply env overrides.
    ///
    /// Missing config file is not an error when loading from default path; defaults are used.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path_buf = path.map_or_else(Self::default_path, Path::to_path_buf);

        let mut cfg = if path_buf.exists() {
            let raw = fs::read_to_string(&path_buf).map_err(|source| TodoError::Io {
                path: path_buf.clone(),
                source,
            })?;
            toml::from_str::<Self>(&raw)?
        } else if path.is_some() {
            return Err(TodoError::MissingConfig { path: path_buf });
        } else {
            Self::default()
        };

        cfg.source = path_buf;
        cfg.apply_env_overrides_from(|name| env::var(name).ok())?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Task file as an absolute, normalized path.
    #[must_use]
    pub fn data_file(&self) -> PathBuf {
        resolve_absolute_path(&self.storage.data_file)
    }

    /// Activity log as an absolute, normalized path.
    #[must_use]
    pub fn activity_log(&self) -> PathBuf {
        resolve_absolute_path(&self.logging.activity_log)
    }

    /// Deterministic hash of the effective config (FNV-1a over canonical JSON).
    pub fn stable_hash(&self) -> Result<String> {
        let canonical = serde_json::to_string(self)?;
        let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
        for byte in canonical.as_bytes() {
            hash ^= u64::from(*byte);
            hash = hash.wrapping_mul(0x0100_0000_01b3);
        }
        Ok(format!("{hash:016x}"))
    }

    /// Apply `TODOLIST_*` overrides (and `NO_COLOR`) read through `lookup`.
    /// Blank values are ignored.
    pub fn apply_env_overrides_from<F>(&mut self, mut lookup: F) -> Result<()>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let mut get = |name: &str| lookup(name).filter(|raw| !raw.trim().is_empty());

        if let Some(raw) = get("TODOLIST_DATA_FILE") {
            self.storage.data_file = PathBuf::from(raw.trim());
        }
        if let Some(raw) = get("TODOLIST_AUTOSAVE") {
            self.storage.autosave = parse_env("TODOLIST_AUTOSAVE", &raw)?;
        }
        if let Some(raw) = get("TODOLIST_COLOR") {
            self.display.color = parse_env("TODOLIST_COLOR", &raw)?;
        }
        if get("NO_COLOR").is_some() {
            self.display.color = false;
        }
        if let Some(raw) = get("TODOLIST_PROGRESS_BAR_WIDTH") {
            self.display.progress_bar_width = parse_env("TODOLIST_PROGRESS_BAR_WIDTH", &raw)?;
        }
        if let Some(raw) = get("TODOLIST_LOG_ENABLED") {
            self.logging.enabled = parse_env("TODOLIST_LOG_ENABLED", &raw)?;
        }
        if let Some(raw) = get("TODOLIST_ACTIVITY_LOG") {
            self.logging.activity_log = PathBuf::from(raw.trim());
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.storage.data_file.as_os_str().is_empty() {
            return Err(TodoError::InvalidConfig {
                details: "storage.data_file must not be empty".to_string(),
            });
        }

        if !(1..=100).contains(&self.display.progress_bar_width) {
            return Err(TodoError::InvalidConfig {
                details: format!(
                    "display.progress_bar_width must be in [1, 100], got {}",
                    self.display.progress_bar_width
                ),
            });
        }

        if self.logging.enabled {
            if self.logging.activity_log.as_os_str().is_empty() {
                return Err(TodoError::InvalidConfig {
                    details: "logging.activity_log must not be empty when logging is enabled"
                        .to_string(),
                });
            }
            if self.logging.max_size_bytes == 0 {
                return Err(TodoError::InvalidConfig {
                    details: "logging.max_size_bytes must be > 0".to_string(),
                });
            }
        }

        Ok(())
    }
}

fn parse_env<T>(name: &str, raw: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|error| TodoError::ConfigParse {
            context: "env",
            details: format!("{name}={raw:?}: {error}"),
        })
}

#[cfg(test)]
mod tests {
    use super::{Config, TodoError};
    use std::collections::HashMap;
    use std::fs;
    use std::path::{Path, PathBuf};

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(name, value)| ((*name).to_string(), (*value).to_string()))
            .collect()
    }

    #[test]
    fn default_config_is_valid() {
        let cfg = Config::default();
        assert!(cfg.validate().is_ok());
        assert!(cfg.storage.autosave);
        assert_eq!(cfg.storage.data_file, PathBuf::from("tasks.json"));
        assert_eq!(cfg.display.progress_bar_width, 10);
    }

    #[test]
    fn zero_bar_width_rejected() {
        let mut cfg = Config::default();
        cfg.display.progress_bar_width = 0;
        let err = cfg.validate().expect_err("expected width error");
        assert!(err.to_string().contains("progress_bar_width"));
    }

    #[test]
    fn empty_data_file_rejected() {
        let mut cfg = Config::default();
        cfg.storage.data_file = PathBuf::new();
        let err = cfg.validate().expect_err("expected data_file error");
        match err {
            TodoError::InvalidConfig { details } => assert!(details.contains("data_file")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn zero_log_size_only_matters_when_enabled() {
        let mut cfg = Config::default();
        cfg.logging.max_size_bytes = 0;
        assert!(cfg.validate().is_err());
        cfg.logging.enabled = false;
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn env_overrides_apply() {
        let mut cfg = Config::default();
        let overrides = vars(&[
            ("TODOLIST_DATA_FILE", "/tmp/todo/custom.json"),
            ("TODOLIST_AUTOSAVE", "false"),
            ("TODOLIST_PROGRESS_BAR_WIDTH", "20"),
            ("TODOLIST_LOG_ENABLED", "false"),
            ("TODOLIST_ACTIVITY_LOG", "  "),
        ]);
        cfg.apply_env_overrides_from(|name| overrides.get(name).cloned())
            .expect("overrides should parse");

        assert_eq!(cfg.storage.data_file, PathBuf::from("/tmp/todo/custom.json"));
        assert!(!cfg.storage.autosave);
        assert_eq!(cfg.display.progress_bar_width, 20);
        assert!(!cfg.logging.enabled);
        assert_eq!(
            cfg.logging.activity_log,
            Config::default().logging.activity_log,
            "blank values are ignored"
        );
    }

    #[test]
    fn no_color_wins_over_default() {
        let mut cfg = Config::default();
        let overrides = vars(&[("NO_COLOR", "1")]);
        cfg.apply_env_overrides_from(|name| overrides.get(name).cloned())
            .unwrap();
        assert!(!cfg.display.color);
    }

    #[test]
    fn invalid_env_boolean_rejected() {
        let mut cfg = Config::default();
        let overrides = vars(&[("TODOLIST_AUTOSAVE", "yes-please")]);
        let err = cfg
            .apply_env_overrides_from(|name| overrides.get(name).cloned())
            .expect_err("invalid bool should fail");
        match err {
            TodoError::ConfigParse { context, details } => {
                assert_eq!(context, "env");
                assert!(details.contains("TODOLIST_AUTOSAVE"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn load_returns_error_for_explicit_missing_path() {
        let result = Config::load(Some(Path::new("/nonexistent/todolist/config.toml")));
        assert!(matches!(result, Err(TodoError::MissingConfig { .. })));
    }

    #[test]
    fn partial_toml_keeps_defaults_for_missing_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "[storage]\nautosave = false\n\n[display]\nprogress_bar_width = 25\n",
        )
        .unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        let cfg: Config = toml::from_str(&raw).unwrap();
        assert!(!cfg.storage.autosave);
        assert_eq!(cfg.storage.data_file, PathBuf::from("tasks.json"));
        assert_eq!(cfg.display.progress_bar_width, 25);
        assert!(cfg.display.color);
    }

    #[test]
    fn malformed_toml_is_parse_error() {
        let err: TodoError = toml::from_str::<Config>("[storage\nautosave = ")
            .unwrap_err()
            .into();
        assert_eq!(err.code(), "TDL-1003");
    }

    #[test]
    fn resolved_paths_are_absolute() {
        let cfg = Config::default();
        assert!(cfg.data_file().is_absolute());
        assert!(cfg.data_file().ends_with("tasks.json"));
        assert!(cfg.activity_log().ends_with("todolist/activity.jsonl"));
    }

    #[test]
    fn stable_hash_changes_when_config_changes() {
        let cfg = Config::default();
        let before = cfg.stable_hash().expect("hash should compute");
        assert_eq!(before, cfg.stable_hash().expect("hash should compute"));

        let mut modified = Config::default();
        modified.display.progress_bar_width += 1;
        assert_ne!(before, modified.stable_hash().expect("hash should compute"));
    }
}
