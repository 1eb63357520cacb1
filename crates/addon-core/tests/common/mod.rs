//! Fake backends and a manager harness for lifecycle tests

#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

use addon_core::{AddonManager, AssetFetcher, ManagerConfig, PackageInstaller};
use addon_git::{SourceSync, SyncOutcome};
use addon_test_utils::workspace::TestWorkspace;

/// Files inside a fake working copy holding the checked-out revision and the
/// identity it was cloned from.
const FAKE_HEAD: &str = ".git/HEAD";
const FAKE_ORIGIN: &str = ".git/ORIGIN";
/// Marker file that makes a fake working copy report itself dirty.
pub const DIRTY_MARKER: &str = "uncommitted.txt";

#[derive(Debug, Clone)]
struct FakeRepo {
    revision: String,
    files: BTreeMap<String, String>,
}

#[derive(Debug, Default)]
struct Remotes {
    repos: HashMap<String, FakeRepo>,
    clones: usize,
    syncs: usize,
}

/// In-memory stand-in for remote repositories.
///
/// Working copies are plain directories containing the published files and a
/// `.git/HEAD` file with the checked-out revision.
#[derive(Debug, Clone, Default)]
pub struct FakeSync {
    inner: Arc<Mutex<Remotes>>,
}

impl FakeSync {
    /// Publish (or replace) the tip of `identity`.
    pub fn publish(&self, identity: &str, revision: &str, files: &[(&str, &str)]) {
        let repo = FakeRepo {
            revision: revision.to_string(),
            files: files
                .iter()
                .map(|(name, content)| (name.to_string(), content.to_string()))
                .collect(),
        };
        self.inner.lock().unwrap().repos.insert(identity.to_string(), repo);
    }

    pub fn clones(&self) -> usize {
        self.inner.lock().unwrap().clones
    }

    pub fn syncs(&self) -> usize {
        self.inner.lock().unwrap().syncs
    }

    fn identity_of(url: &str) -> String {
        let trimmed = url.trim_end_matches('/');
        let trimmed = trimmed.strip_suffix(".git").unwrap_or(trimmed);
        let mut parts = trimmed.rsplit('/');
        let name = parts.next().unwrap_or_default();
        let owner = parts.next().unwrap_or_default();
        format!("{owner}/{name}")
    }

    fn checkout(path: &Path, identity: &str, repo: &FakeRepo) {
        for (name, content) in &repo.files {
            let file = path.join(name);
            if let Some(parent) = file.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(file, content).unwrap();
        }
        fs::create_dir_all(path.join(".git")).unwrap();
        fs::write(path.join(FAKE_HEAD), &repo.revision).unwrap();
        fs::write(path.join(FAKE_ORIGIN), identity).unwrap();
    }

    fn local_head(path: &Path) -> String {
        fs::read_to_string(path.join(FAKE_HEAD)).unwrap()
    }
}

impl SourceSync for FakeSync {
    fn sync(&self, url: &str, path: &Path) -> addon_git::Result<SyncOutcome> {
        let mut remotes = self.inner.lock().unwrap();
        remotes.syncs += 1;

        let identity = Self::identity_of(url);
        let Some(repo) = remotes.repos.get(&identity).cloned() else {
            return Err(addon_git::Error::CloneFailed {
                url: url.to_string(),
                path: path.to_path_buf(),
                message: "repository not found".to_string(),
            });
        };

        if !self.is_working_copy(path) {
            remotes.clones += 1;
            fs::create_dir_all(path).unwrap();
            Self::checkout(path, &identity, &repo);
            return Ok(SyncOutcome::Cloned {
                revision: repo.revision,
            });
        }

        let current = Self::local_head(path);
        if current == repo.revision {
            return Ok(SyncOutcome::Current { revision: current });
        }

        Self::checkout(path, &identity, &repo);
        Ok(SyncOutcome::Upgraded {
            from: current,
            to: repo.revision,
        })
    }

    fn is_dirty(&self, path: &Path) -> addon_git::Result<bool> {
        Ok(path.join(DIRTY_MARKER).exists())
    }

    fn is_outdated(&self, path: &Path) -> addon_git::Result<bool> {
        let identity = fs::read_to_string(path.join(FAKE_ORIGIN)).unwrap();
        let remotes = self.inner.lock().unwrap();
        Ok(remotes
            .repos
            .get(&identity)
            .is_some_and(|repo| repo.revision != Self::local_head(path)))
    }
}

#[derive(Debug, Default)]
struct Fetches {
    downloads: Vec<String>,
    extracts: usize,
    fail_downloads: bool,
}

/// Asset fetcher writing the URL into the "archive" and a `content.txt`
/// holding that text into the extraction target.
#[derive(Debug, Clone, Default)]
pub struct FakeFetcher {
    inner: Arc<Mutex<Fetches>>,
}

pub const EXTRACTED_FILE: &str = "content.txt";

impl FakeFetcher {
    pub fn downloads(&self) -> Vec<String> {
        self.inner.lock().unwrap().downloads.clone()
    }

    pub fn extracts(&self) -> usize {
        self.inner.lock().unwrap().extracts
    }

    pub fn fail_downloads(&self, fail: bool) {
        self.inner.lock().unwrap().fail_downloads = fail;
    }
}

impl AssetFetcher for FakeFetcher {
    fn download(&self, url: &str, dest: &Path) -> addon_core::Result<()> {
        let mut fetches = self.inner.lock().unwrap();
        fetches.downloads.push(url.to_string());
        if fetches.fail_downloads {
            return Err(addon_core::Error::Download {
                url: url.to_string(),
                message: "connection refused".to_string(),
            });
        }
        fs::write(dest, url).unwrap();
        Ok(())
    }

    fn extract(&self, archive: &Path, target: &Path) -> addon_core::Result<()> {
        self.inner.lock().unwrap().extracts += 1;
        fs::create_dir_all(target).unwrap();
        fs::copy(archive, target.join(EXTRACTED_FILE)).unwrap();
        Ok(())
    }
}

/// Package installer recording each batch it is asked to install.
#[derive(Debug, Clone, Default)]
pub struct FakeInstaller {
    batches: Arc<Mutex<Vec<Vec<String>>>>,
}

impl FakeInstaller {
    pub fn batches(&self) -> Vec<Vec<String>> {
        self.batches.lock().unwrap().clone()
    }
}

impl PackageInstaller for FakeInstaller {
    fn command(&self, packages: &[String]) -> String {
        format!("pip3 install {}", packages.join(" "))
    }

    fn install(&self, packages: &[String]) -> addon_core::Result<()> {
        self.batches.lock().unwrap().push(packages.to_vec());
        Ok(())
    }
}

/// A manager wired to fakes inside a temporary workspace.
pub struct Harness {
    pub ws: TestWorkspace,
    pub remotes: FakeSync,
    pub fetcher: FakeFetcher,
    pub installer: FakeInstaller,
    pub manager: AddonManager,
}

impl Harness {
    pub fn new() -> Self {
        let ws = TestWorkspace::new();
        let remotes = FakeSync::default();
        let fetcher = FakeFetcher::default();
        let installer = FakeInstaller::default();
        let manager = AddonManager::with_backends(
            ManagerConfig::new(ws.install_root(), ws.state_path()),
            Box::new(remotes.clone()),
            Box::new(fetcher.clone()),
            Box::new(installer.clone()),
        );
        Self {
            ws,
            remotes,
            fetcher,
            installer,
            manager,
        }
    }

    /// Persisted state as JSON.
    pub fn state_json(&self) -> serde_json::Value {
        serde_json::from_str(&self.ws.read_state()).unwrap()
    }

    /// Identities currently recorded in the state.
    pub fn recorded(&self) -> Vec<String> {
        self.manager
            .installed()
            .unwrap()
            .identities()
            .map(str::to_string)
            .collect()
    }
}
