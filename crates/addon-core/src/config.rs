//! Manager configuration
//!
//! All paths the manager touches come from a [`ManagerConfig`] passed in at
//! construction; nothing here reads the process environment.

use std::path::{Path, PathBuf};

use crate::Result;

/// Install root used when none is configured.
pub const DEFAULT_INSTALL_ROOT: &str = ".";

/// State file location used when none is configured.
pub const DEFAULT_STATE_PATH: &str = ".state";

/// Locations of the add-on tree and the persisted state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagerConfig {
    /// Directory add-ons are cloned under, as `<owner>/<name>/`.
    pub install_root: PathBuf,
    /// JSON file holding the installed-add-on state.
    pub state_path: PathBuf,
}

impl ManagerConfig {
    /// Build a configuration from already-absolute paths.
    pub fn new(install_root: impl Into<PathBuf>, state_path: impl Into<PathBuf>) -> Self {
        Self {
            install_root: install_root.into(),
            state_path: state_path.into(),
        }
    }

    /// Resolve optional overrides against `base`.
    ///
    /// Missing values fall back to [`DEFAULT_INSTALL_ROOT`] and
    /// [`DEFAULT_STATE_PATH`]. Relative paths are taken relative to `base`.
    pub fn resolve(base: &Path, install_root: Option<&Path>, state_path: Option<&Path>) -> Self {
        let install_root = install_root.unwrap_or(Path::new(DEFAULT_INSTALL_ROOT));
        let state_path = state_path.unwrap_or(Path::new(DEFAULT_STATE_PATH));
        Self {
            install_root: addon_fs::resolve_path(base, install_root),
            state_path: addon_fs::resolve_path(base, state_path),
        }
    }

    /// Resolve overrides relative to the directory of the running executable.
    pub fn relative_to_executable(
        install_root: Option<&Path>,
        state_path: Option<&Path>,
    ) -> Result<Self> {
        let base = addon_fs::executable_dir()?;
        Ok(Self::resolve(&base, install_root, state_path))
    }
}
