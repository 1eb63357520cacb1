//! Per-add-on declaration files
//!
//! Each add-on may carry, at the root of its directory:
//!
//! * `.dependencies`: one add-on identifier per line
//! * `.dependencies-python`: one external package specifier per line
//! * `.remote`: `<archive_url> <target_subpath>` on the first line

use std::path::{Component, Path};

use crate::state::RemoteAsset;
use crate::{Error, Result};

pub const DEPENDENCIES_FILE: &str = ".dependencies";
pub const EXTERNAL_DEPENDENCIES_FILE: &str = ".dependencies-python";
pub const REMOTE_FILE: &str = ".remote";

const GIT_DIR: &str = ".git";

/// Declared add-on dependencies, in file order.
pub fn read_dependencies(addon_dir: &Path) -> Result<Vec<String>> {
    Ok(addon_fs::io::read_lines(&addon_dir.join(DEPENDENCIES_FILE))?)
}

/// Declared external packages, in file order.
pub fn read_external_packages(addon_dir: &Path) -> Result<Vec<String>> {
    Ok(addon_fs::io::read_lines(&addon_dir.join(EXTERNAL_DEPENDENCIES_FILE))?)
}

/// Declared remote asset, if the add-on has a `.remote` file.
///
/// # Errors
///
/// Returns [`Error::InvalidDeclaration`] when the first line is not exactly
/// two fields, or when the target is not a subdirectory of the add-on that
/// leaves the working copy and its `.git` metadata alone.
pub fn read_remote(addon_dir: &Path) -> Result<Option<RemoteAsset>> {
    let path = addon_dir.join(REMOTE_FILE);
    let Some(first) = addon_fs::io::read_lines(&path)?.into_iter().next() else {
        return Ok(None);
    };

    let invalid = |reason: String| Error::InvalidDeclaration {
        path: path.clone(),
        reason,
    };

    let fields: Vec<&str> = first.split_whitespace().collect();
    let [url, target] = fields.as_slice() else {
        return Err(invalid(format!(
            "expected '<url> <target>', found {} field(s)",
            fields.len()
        )));
    };

    let mut components = Vec::new();
    for component in Path::new(target).components() {
        match component {
            Component::CurDir => {}
            Component::Normal(part) => components.push(part),
            _ => {
                return Err(invalid(format!(
                    "target '{target}' must be a relative path inside the add-on"
                )));
            }
        }
    }
    match components.first() {
        None => {
            return Err(invalid(format!(
                "target '{target}' would replace the whole add-on directory"
            )));
        }
        Some(first) if *first == GIT_DIR => {
            return Err(invalid(format!(
                "target '{target}' would overwrite the add-on's git metadata"
            )));
        }
        Some(_) => {}
    }

    Ok(Some(RemoteAsset::new(*url, *target)))
}
