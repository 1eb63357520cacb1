//! Persisted installation state
//!
//! The [`State`] maps each installed add-on's canonical identity to its
//! [`InstalledAddon`] record. It is the single source of truth for what is
//! installed and is persisted as pretty-printed JSON by a [`StateStore`].

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use addon_fs::LockGuard;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A fetched remote asset bundle: where it came from and where it went.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteAsset {
    /// Archive URL.
    pub url: String,
    /// Extraction target, relative to the add-on directory.
    pub target: String,
}

impl RemoteAsset {
    pub fn new(url: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            target: target.into(),
        }
    }
}

/// Installation record for a single add-on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstalledAddon {
    /// Commit checked out at install time.
    #[serde(alias = "hash")]
    pub revision: String,

    /// Declared dependencies, in declaration order.
    #[serde(default, alias = "deps")]
    pub dependencies: Vec<String>,

    /// Last successfully fetched asset bundle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote: Option<RemoteAsset>,
}

impl InstalledAddon {
    pub fn new(revision: impl Into<String>, dependencies: Vec<String>) -> Self {
        Self {
            revision: revision.into(),
            dependencies,
            remote: None,
        }
    }

    pub fn with_remote(mut self, remote: Option<RemoteAsset>) -> Self {
        self.remote = remote;
        self
    }
}

/// Mapping from canonical identity to installation record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct State {
    addons: BTreeMap<String, InstalledAddon>,
}

impl State {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, identity: &str) -> Option<&InstalledAddon> {
        self.addons.get(identity)
    }

    pub fn contains(&self, identity: &str) -> bool {
        self.addons.contains_key(identity)
    }

    /// Insert or replace a record, returning the previous one.
    pub fn insert(&mut self, identity: impl Into<String>, record: InstalledAddon) -> Option<InstalledAddon> {
        self.addons.insert(identity.into(), record)
    }

    pub fn remove(&mut self, identity: &str) -> Option<InstalledAddon> {
        self.addons.remove(identity)
    }

    /// Identities in sorted order.
    pub fn identities(&self) -> impl Iterator<Item = &str> {
        self.addons.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &InstalledAddon)> {
        self.addons.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.addons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addons.is_empty()
    }

    /// Installed add-ons that declare any of `targets` as a dependency.
    ///
    /// Single pass: dependents of dependents are not included.
    pub fn dependents_of<'a>(&'a self, targets: &'a [String]) -> impl Iterator<Item = &'a str> {
        self.addons
            .iter()
            .filter(|(_, record)| record.dependencies.iter().any(|d| targets.contains(d)))
            .map(|(identity, _)| identity.as_str())
    }
}

/// Loads and persists [`State`] at a fixed path.
///
/// Every write replaces the whole file atomically while an exclusive lock on
/// a sibling `<state>.lock` file is held.
#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
    lock_path: PathBuf,
}

impl StateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mut lock_name = path.file_name().unwrap_or_default().to_os_string();
        lock_name.push(".lock");
        let lock_path = path.with_file_name(lock_name);
        Self { path, lock_path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the current state. A missing file is an empty state.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StateParse`] if the file exists but is not a valid
    /// state document.
    pub fn load(&self) -> Result<State> {
        let Some(content) = addon_fs::io::read_text_if_exists(&self.path)? else {
            return Ok(State::new());
        };
        if content.trim().is_empty() {
            return Ok(State::new());
        }
        serde_json::from_str(&content).map_err(|e| Error::StateParse {
            path: self.path.clone(),
            message: e.to_string(),
        })
    }

    /// Read-modify-write under the state lock.
    ///
    /// The lock is held across load, `mutate` and the write, so concurrent
    /// updaters never lose each other's changes.
    pub fn update<T>(&self, mutate: impl FnOnce(&mut State) -> T) -> Result<T> {
        let _lock = LockGuard::exclusive(&self.lock_path)?;
        let mut state = self.load()?;
        let out = mutate(&mut state);
        self.write(&state)?;
        Ok(out)
    }

    fn write(&self, state: &State) -> Result<()> {
        let mut content = serde_json::to_string_pretty(state)?;
        content.push('\n');
        addon_fs::io::write_atomic(&self.path, content.as_bytes())?;
        tracing::debug!(path = %self.path.display(), addons = state.len(), "Saved state");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn missing_file_is_empty_state() {
        let temp = TempDir::new().unwrap();
        let store = StateStore::new(temp.path().join(".state"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn lock_file_sits_beside_state() {
        let store = StateStore::new("/opt/addons/.state");
        assert_eq!(store.lock_path, PathBuf::from("/opt/addons/.state.lock"));
    }

    #[test]
    fn legacy_field_names_are_accepted() {
        let json = r#"{"acme/widgets": {"hash": "abc123", "deps": ["acme/base"]}}"#;
        let state: State = serde_json::from_str(json).unwrap();
        let record = state.get("acme/widgets").unwrap();
        assert_eq!(record.revision, "abc123");
        assert_eq!(record.dependencies, vec!["acme/base"]);
        assert_eq!(record.remote, None);
    }

    #[test]
    fn remote_is_omitted_when_absent() {
        let mut state = State::new();
        state.insert("acme/widgets", InstalledAddon::new("abc123", vec![]));
        let json = serde_json::to_string(&state).unwrap();
        assert_eq!(
            json,
            r#"{"acme/widgets":{"revision":"abc123","dependencies":[]}}"#
        );
    }

    #[test]
    fn dependents_is_single_pass() {
        let mut state = State::new();
        state.insert("acme/a", InstalledAddon::new("1", vec![]));
        state.insert("acme/b", InstalledAddon::new("2", vec!["acme/a".into()]));
        state.insert("acme/c", InstalledAddon::new("3", vec!["acme/b".into()]));

        let targets = vec!["acme/a".to_string()];
        let dependents: Vec<_> = state.dependents_of(&targets).collect();
        assert_eq!(dependents, vec!["acme/b"]);
    }

    #[test]
    fn corrupt_file_is_a_parse_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(".state");
        std::fs::write(&path, "not json").unwrap();

        let err = StateStore::new(&path).load().unwrap_err();
        assert!(matches!(err, Error::StateParse { .. }), "got: {err:?}");
    }
}
