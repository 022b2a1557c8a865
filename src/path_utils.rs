//! Cross-platform path utilities for agentkit
//!
//! This module provides utilities for handling paths across different platforms
//! (Windows, macOS, Linux) with consistent behavior.

use std::path::{Component, Path, PathBuf};

use normpath::PathExt;

/// Convert a path to a string with forward slashes
///
/// Lock file entries and placeholder values always use forward slashes so
/// the group matching in the lock file works on every platform.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use agentkit::path_utils::to_forward_slashes;
///
/// assert_eq!(to_forward_slashes(Path::new("a/b")), "a/b");
/// ```
pub fn to_forward_slashes(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Expand a leading `~` to the user's home directory
///
/// Only `~` on its own or followed by a separator is expanded; `~user` is left
/// alone. If no home directory can be determined the path is returned as-is.
pub fn expand_tilde(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    let rest = if raw == "~" {
        Some("")
    } else {
        raw.strip_prefix("~/").or_else(|| raw.strip_prefix("~\\"))
    };

    match (rest, dirs::home_dir()) {
        (Some(""), Some(home)) => home,
        (Some(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}

/// Drop `.` components and resolve `..` lexically
fn clean(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    out
}

/// Normalize a path that may not exist yet
///
/// The longest existing ancestor is normalized (resolving symlinks such as
/// `/var -> /private/var` on macOS) and the missing tail is appended back.
fn normalize_existing_prefix(path: &Path) -> PathBuf {
    if let Ok(norm) = path.normalize() {
        return norm.into_path_buf();
    }

    let mut current = path;
    let mut tail = Vec::new();
    while !current.exists() {
        let (Some(name), Some(parent)) = (current.file_name(), current.parent()) else {
            return path.to_path_buf();
        };
        tail.push(name);
        current = parent;
    }

    let mut result = current
        .normalize()
        .map(normpath::BasePathBuf::into_path_buf)
        .unwrap_or_else(|_| current.to_path_buf());
    for name in tail.iter().rev() {
        result.push(name);
    }
    result
}

/// Turn a user supplied target root into an absolute, normalized path
///
/// Expands `~`, resolves relative paths against `cwd` and removes `.`/`..`.
pub fn normalize_root(path: &Path, cwd: &Path) -> PathBuf {
    let expanded = expand_tilde(path);
    let absolute = if expanded.is_absolute() {
        expanded
    } else {
        cwd.join(expanded)
    };
    normalize_existing_prefix(&clean(&absolute))
}
