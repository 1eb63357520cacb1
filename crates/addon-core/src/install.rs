//! Transitive add-on installation
//!
//! Installing an add-on synchronizes its working copy, refreshes its asset
//! bundle, installs each declared dependency depth-first and finally records
//! the add-on in the state. Each step is idempotent, so an interrupted install
//! is completed by running it again.

use std::path::PathBuf;

use addon_git::SyncOutcome;

use crate::asset::{AssetOutcome, refresh_asset};
use crate::declaration;
use crate::identity::{AddonId, AddonRef};
use crate::manager::AddonManager;
use crate::state::InstalledAddon;
use crate::Result;

/// Separator between identifiers in a batch install request.
pub const NAME_SEPARATOR: char = ',';

/// Work done for one add-on during an install.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddonInstall {
    pub id: AddonId,
    pub path: PathBuf,
    /// The install directory did not exist beforehand.
    pub created: bool,
    pub sync: SyncOutcome,
    pub asset: AssetOutcome,
    /// Canonical identities declared in `.dependencies`.
    pub dependencies: Vec<String>,
}

/// Result of an install request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallReport {
    /// Identities in install order: each add-on before its dependencies.
    /// An add-on reached through several parents appears once per parent.
    pub installed: Vec<String>,
    /// Per-add-on details, in the order the add-ons were synchronized.
    pub steps: Vec<AddonInstall>,
    /// Dependencies skipped because they were already being installed
    /// further up the same chain.
    pub cycles: Vec<String>,
}

/// Progress notification emitted while an install runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallEvent<'a> {
    /// An add-on was synchronized and its asset refreshed; its dependencies
    /// are installed next.
    Synced(&'a AddonInstall),
    /// A dependency was skipped because it is already being installed
    /// further up the chain.
    CycleSkipped(&'a str),
    /// An add-on and all its dependencies were recorded in the state.
    Recorded(&'a str),
}

impl InstallReport {
    fn extend(&mut self, other: InstallReport) {
        self.installed.extend(other.installed);
        self.steps.extend(other.steps);
        self.cycles.extend(other.cycles);
    }
}

struct InstallRun<'o> {
    chain: Vec<AddonId>,
    report: InstallReport,
    observer: &'o mut dyn FnMut(InstallEvent<'_>),
}

impl AddonManager {
    /// Install an add-on and, recursively, everything it depends on.
    ///
    /// # Errors
    ///
    /// Fails if the name is invalid, a clone or fetch fails, or a declaration
    /// file is malformed. Dependencies installed before the failure keep
    /// their state records; the failing add-on and its ancestors do not get
    /// one.
    pub fn install(&self, name: &str) -> Result<InstallReport> {
        self.install_with(name, |_| {})
    }

    /// [`install`](Self::install), reporting each step to `observer` as it
    /// happens.
    ///
    /// Events already emitted stay valid when the install later fails.
    pub fn install_with(
        &self,
        name: &str,
        mut observer: impl FnMut(InstallEvent<'_>),
    ) -> Result<InstallReport> {
        let mut run = InstallRun {
            chain: Vec::new(),
            report: InstallReport::default(),
            observer: &mut observer,
        };
        let installed = self.install_ref(name, &mut run)?;
        run.report.installed = installed;
        Ok(run.report)
    }

    /// Install every add-on in a comma separated list, in order.
    ///
    /// Results are concatenated without deduplication.
    pub fn install_many(&self, names: &str) -> Result<InstallReport> {
        self.install_many_with(names, |_| {})
    }

    /// [`install_many`](Self::install_many) with a progress observer.
    pub fn install_many_with(
        &self,
        names: &str,
        mut observer: impl FnMut(InstallEvent<'_>),
    ) -> Result<InstallReport> {
        let mut report = InstallReport::default();
        for name in names.split(NAME_SEPARATOR) {
            report.extend(self.install_with(name, &mut observer)?);
        }
        Ok(report)
    }

    fn install_ref(&self, name: &str, run: &mut InstallRun<'_>) -> Result<Vec<String>> {
        let addon = AddonRef::parse(name)?;
        let key = addon.id.key();

        if run.chain.contains(&addon.id) {
            let path: Vec<String> = run.chain.iter().map(AddonId::key).collect();
            tracing::warn!(identity = %key, chain = %path.join(" -> "), "Dependency cycle, skipping");
            (run.observer)(InstallEvent::CycleSkipped(&key));
            run.report.cycles.push(key);
            return Ok(Vec::new());
        }

        let path = self.addon_path(&addon.id);
        let (step, remote) = {
            let _lock = self.lock_addon(&addon.id)?;
            let created = !path.exists();
            tracing::info!(identity = %key, path = %path.display(), created, "Installing add-on");

            let sync = self.source.sync(&addon.url, &path)?;

            let previous = self
                .state
                .load()?
                .get(&key)
                .and_then(|record| record.remote.clone());
            let declared = declaration::read_remote(&path)?;
            let asset = refresh_asset(self.assets.as_ref(), &path, declared, previous.as_ref());
            let remote = asset.recorded(previous.as_ref());

            let dependencies = declaration::read_dependencies(&path)?
                .iter()
                .map(|dep| AddonRef::parse(dep).map(|r| r.id.key()))
                .collect::<Result<Vec<_>>>()?;

            (
                AddonInstall {
                    id: addon.id.clone(),
                    path,
                    created,
                    sync,
                    asset,
                    dependencies,
                },
                remote,
            )
        };
        let revision = step.sync.revision().to_string();
        let dependencies = step.dependencies.clone();
        (run.observer)(InstallEvent::Synced(&step));
        run.report.steps.push(step);

        let mut installed = vec![key.clone()];
        run.chain.push(addon.id);
        for dependency in &dependencies {
            installed.extend(self.install_ref(dependency, run)?);
        }
        run.chain.pop();

        let record = InstalledAddon::new(revision, dependencies).with_remote(remote);
        self.state.update(|state| state.insert(key.clone(), record))?;
        tracing::debug!(identity = %key, "Recorded add-on in state");
        (run.observer)(InstallEvent::Recorded(&key));

        Ok(installed)
    }
}
