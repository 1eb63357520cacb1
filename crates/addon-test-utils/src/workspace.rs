//! [`TestWorkspace`] builder for add-on manager scenarios.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary directory holding an install root and a state file path.
///
/// # Example
///
/// ```rust,no_run
/// use addon_test_utils::workspace::TestWorkspace;
///
/// let ws = TestWorkspace::new();
/// ws.write_addon_file("acme/widgets", ".dependencies", "acme/base\n");
/// ws.assert_addon_installed("acme/widgets");
/// ```
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl Default for TestWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

impl TestWorkspace {
    /// Create an empty temporary workspace.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    /// Root of the temporary directory.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Directory add-ons are installed under.
    pub fn install_root(&self) -> PathBuf {
        self.root().join("addons")
    }

    /// Location of the persisted state file.
    pub fn state_path(&self) -> PathBuf {
        self.root().join(".state")
    }

    /// Directory reserved for fake upstream repositories.
    pub fn upstream_root(&self) -> PathBuf {
        self.root().join("upstream")
    }

    /// Install path of `identity` (`owner/name`).
    pub fn addon_path(&self, identity: &str) -> PathBuf {
        self.install_root().join(identity)
    }

    /// Write `content` to `file` inside the add-on directory of `identity`.
    pub fn write_addon_file(&self, identity: &str, file: &str, content: &str) {
        let path = self.addon_path(identity).join(file);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    /// Raw contents of the state file.
    ///
    /// # Panics
    /// Panics if the state file cannot be read.
    pub fn read_state(&self) -> String {
        fs::read_to_string(self.state_path())
            .unwrap_or_else(|_| panic!("Could not read state: {}", self.state_path().display()))
    }

    /// Assert that the install directory of `identity` exists.
    pub fn assert_addon_installed(&self, identity: &str) {
        let path = self.addon_path(identity);
        assert!(path.exists(), "Expected add-on directory: {}", path.display());
    }

    /// Assert that the install directory of `identity` does **not** exist.
    pub fn assert_addon_absent(&self, identity: &str) {
        let path = self.addon_path(identity);
        assert!(
            !path.exists(),
            "Expected add-on directory NOT to exist: {}",
            path.display()
        );
    }
}
