//! Path resolution helpers

use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use crate::{Error, Result};

/// Resolve `path` against `base`.
///
/// Absolute paths are returned as-is (normalized); relative paths are joined
/// onto `base` first.
pub fn resolve_path(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        normalize_lexically(path)
    } else {
        normalize_lexically(&base.join(path))
    }
}

/// Remove `.` and `..` components without touching the filesystem.
///
/// `..` at the root is dropped rather than escaping it.
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let after_parent =
                    matches!(out.components().next_back(), Some(Component::ParentDir));
                if after_parent || (!out.pop() && !path.is_absolute()) {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}

/// Directory containing the running executable.
///
/// Used as the anchor for relative install-root and state-file paths.
pub fn executable_dir() -> Result<PathBuf> {
    let exe = std::env::current_exe().map_err(|source| Error::ExecutableLocation { source })?;
    let exe = dunce::canonicalize(&exe).map_err(|e| Error::io(&exe, e))?;
    Ok(exe
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(".")))
}

/// Remove `dir` if it exists and has no entries.
///
/// Returns `true` when the directory was removed.
pub fn remove_dir_if_empty(dir: &Path) -> Result<bool> {
    let mut entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(Error::io(dir, e)),
    };
    if entries.next().is_some() {
        return Ok(false);
    }
    fs::remove_dir(dir).map_err(|e| Error::io(dir, e))?;
    Ok(true)
}
