//! The [`AddonManager`] facade
//!
//! Owns the configuration, the state store and the capability backends, and
//! hosts the install, removal and query operations implemented in sibling
//! modules.

use std::path::{Path, PathBuf};

use addon_fs::LockGuard;
use addon_git::{GitSync, SourceSync};

use crate::asset::{AssetFetcher, HttpArchiveFetcher};
use crate::config::ManagerConfig;
use crate::external::{PackageInstaller, PipInstaller};
use crate::identity::{AddonId, AddonRef};
use crate::resources::ResourceQuery;
use crate::state::{State, StateStore};
use crate::Result;

/// Directory under the install root holding per-add-on lock files.
const LOCK_DIR: &str = ".locks";

/// Entry point for every add-on lifecycle operation.
pub struct AddonManager {
    pub(crate) config: ManagerConfig,
    pub(crate) state: StateStore,
    pub(crate) source: Box<dyn SourceSync>,
    pub(crate) assets: Box<dyn AssetFetcher>,
    pub(crate) packages: Box<dyn PackageInstaller>,
}

impl AddonManager {
    /// Create a manager using git, HTTP and pip backends.
    pub fn new(config: ManagerConfig) -> Self {
        Self::with_backends(
            config,
            Box::new(GitSync::new()),
            Box::new(HttpArchiveFetcher::new()),
            Box::new(PipInstaller::default()),
        )
    }

    /// Create a manager with explicit backends.
    pub fn with_backends(
        config: ManagerConfig,
        source: Box<dyn SourceSync>,
        assets: Box<dyn AssetFetcher>,
        packages: Box<dyn PackageInstaller>,
    ) -> Self {
        let state = StateStore::new(&config.state_path);
        Self {
            config,
            state,
            source,
            assets,
            packages,
        }
    }

    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    /// Current persisted state.
    pub fn installed(&self) -> Result<State> {
        self.state.load()
    }

    /// Install directory of an add-on: `<install_root>/<owner>/<name>`.
    pub fn addon_path(&self, id: &AddonId) -> PathBuf {
        self.config.install_root.join(id.relative_path())
    }

    /// Install directory of the reserved local add-on.
    pub fn local_addon_path(&self) -> PathBuf {
        self.addon_path(&AddonId::local())
    }

    /// Resolve an identifier and return its install directory.
    pub fn path_of(&self, name: &str) -> Result<PathBuf> {
        Ok(self.addon_path(&AddonRef::parse(name)?.id))
    }

    /// Read-only query surface over resource files in the install tree.
    pub fn resources(&self) -> ResourceQuery {
        ResourceQuery::new(&self.config.install_root)
    }

    /// Installed add-ons whose HEAD differs from the remote default branch.
    ///
    /// Uses remote-tracking refs as they are; no fetch is performed.
    pub fn outdated(&self) -> Result<Vec<String>> {
        self.probe_installed(|source, path| source.is_outdated(path))
    }

    /// Installed add-ons whose working copy has uncommitted changes.
    pub fn dirty(&self) -> Result<Vec<String>> {
        self.probe_installed(|source, path| source.is_dirty(path))
    }

    fn probe_installed(
        &self,
        probe: impl Fn(&dyn SourceSync, &Path) -> addon_git::Result<bool>,
    ) -> Result<Vec<String>> {
        let state = self.state.load()?;
        let mut matched = Vec::new();
        for identity in state.identities() {
            let id = AddonRef::parse(identity)?.id;
            let path = self.addon_path(&id);
            if !self.source.is_working_copy(&path) {
                tracing::debug!(identity = %identity, path = %path.display(), "Skipping add-on without working copy");
                continue;
            }
            if probe(self.source.as_ref(), &path)? {
                matched.push(identity.to_string());
            }
        }
        Ok(matched)
    }

    /// Exclusive lock serializing work on a single add-on's directory.
    pub(crate) fn lock_addon(&self, id: &AddonId) -> Result<LockGuard> {
        let path = addon_lock_path(&self.config.install_root, id);
        Ok(LockGuard::exclusive(&path)?)
    }
}

/// `<install_root>/.locks/<owner>/<name>.lock`; one file per identity.
fn addon_lock_path(install_root: &Path, id: &AddonId) -> PathBuf {
    install_root
        .join(LOCK_DIR)
        .join(id.owner())
        .join(format!("{}.lock", id.name()))
}

impl std::fmt::Debug for AddonManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AddonManager")
            .field("config", &self.config)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::{assert_eq, assert_ne};

    #[test]
    fn lock_path_nests_owner_directory() {
        let root = Path::new("/srv/addons");
        assert_eq!(
            addon_lock_path(root, &AddonId::new("acme", "widgets")),
            PathBuf::from("/srv/addons/.locks/acme/widgets.lock")
        );
    }

    #[test]
    fn dotted_identities_do_not_share_a_lock() {
        let root = Path::new("/srv/addons");
        assert_ne!(
            addon_lock_path(root, &AddonId::new("a.b", "c")),
            addon_lock_path(root, &AddonId::new("a", "b.c"))
        );
    }
}
