//! Path helpers for configured file locations.

use std::env;
use std::path::{Component, Path, PathBuf};

/// Expand a leading `~` or `~/` to `$HOME`. Other paths are returned as-is.
#[must_use]
pub fn expand_home(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    let Some(home) = env::var_os("HOME") else {
        return path.to_path_buf();
    };
    PathBuf::from(home).join(rest)
}

/// Resolve a configured path to an absolute, normalized path.
///
/// `~` is expanded first. Relative paths are anchored at the working
/// directory, and `.`/`..` components are folded syntactically so the file
/// does not have to exist yet.
#[must_use]
pub fn resolve_absolute_path(path: &Path) -> PathBuf {
    let expanded = expand_home(path);
    let absolute = if expanded.is_absolute() {
        expanded
    } else {
        env::current_dir().map_or_else(|_| expanded.clone(), |cwd| cwd.join(&expanded))
    };
    normalize_syntactic(&absolute)
}

fn normalize_syntactic(path: &Path) -> PathBuf {
    let mut components = Vec::new();
    for component in path.components() {
        match component {
            Component::Prefix(..) | Component::RootDir | Component::Normal(_) => {
                components.push(component);
            }
            Component::CurDir => {}
            Component::ParentDir => {
                if let Some(Component::Normal(_)) = components.last() {
                    components.pop();
                }
            }
        }
    }
    components.into_iter().collect()
}
