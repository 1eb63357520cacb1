//! Dependent-aware add-on removal

use std::fs;
use std::path::PathBuf;

use crate::identity::{AddonId, AddonRef};
use crate::manager::AddonManager;
use crate::{Error, Result};

/// The add-ons a removal request will delete.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemovalPlan {
    /// Add-ons named in the request.
    pub requested: Vec<AddonId>,
    /// Installed add-ons declaring a requested add-on as a dependency.
    pub dependents: Vec<AddonId>,
}

impl RemovalPlan {
    /// Every add-on to remove, requested ones first.
    pub fn all(&self) -> impl Iterator<Item = &AddonId> {
        self.requested.iter().chain(self.dependents.iter())
    }

    pub fn is_empty(&self) -> bool {
        self.requested.is_empty() && self.dependents.is_empty()
    }
}

/// One deleted add-on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovedAddon {
    pub id: AddonId,
    pub path: PathBuf,
    /// The owner directory was left empty and removed as well.
    pub pruned_parent: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemovalReport {
    pub removed: Vec<RemovedAddon>,
}

impl AddonManager {
    /// Work out which add-ons removing `names` would delete.
    ///
    /// An empty `names` selects every installed add-on. With `cascade`, every
    /// installed add-on that directly depends on a requested one is added;
    /// dependents of those dependents are not.
    pub fn plan_removal(&self, names: &[String], cascade: bool) -> Result<RemovalPlan> {
        let state = self.state.load()?;

        let names: Vec<String> = if names.is_empty() {
            state.identities().map(str::to_string).collect()
        } else {
            names.to_vec()
        };

        let mut plan = RemovalPlan::default();
        for name in &names {
            let id = AddonRef::parse(name)?.id;
            if !plan.requested.contains(&id) {
                plan.requested.push(id);
            }
        }

        if cascade {
            let targets: Vec<String> = plan.requested.iter().map(AddonId::key).collect();
            for identity in state.dependents_of(&targets) {
                let id = AddonRef::parse(identity)?.id;
                if !plan.requested.contains(&id) && !plan.dependents.contains(&id) {
                    plan.dependents.push(id);
                }
            }
        }

        Ok(plan)
    }

    /// Delete every add-on in `plan`.
    ///
    /// All install directories are checked before anything is deleted. Each
    /// deletion is followed by its own state write, so an interruption leaves
    /// the state matching the filesystem up to the last completed removal.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotInstalled`] without touching anything if any add-on
    /// in the plan has no install directory.
    pub fn execute_removal(&self, plan: &RemovalPlan) -> Result<RemovalReport> {
        for id in plan.all() {
            let path = self.addon_path(id);
            if !path.exists() {
                return Err(Error::NotInstalled {
                    identity: id.key(),
                    path,
                });
            }
        }

        let mut report = RemovalReport::default();
        for id in plan.all() {
            let key = id.key();
            let path = self.addon_path(id);
            let _lock = self.lock_addon(id)?;

            fs::remove_dir_all(&path).map_err(|e| addon_fs::Error::io(&path, e))?;
            tracing::info!(identity = %key, path = %path.display(), "Removed installed directory");

            let pruned_parent = match path.parent() {
                Some(parent) if addon_fs::remove_dir_if_empty(parent)? => {
                    tracing::debug!(path = %parent.display(), "Removed empty parent directory");
                    Some(parent.to_path_buf())
                }
                _ => None,
            };

            self.state.update(|state| state.remove(&key))?;

            report.removed.push(RemovedAddon {
                id: id.clone(),
                path,
                pruned_parent,
            });
        }

        Ok(report)
    }

    /// Plan a removal, ask `confirm` about it and carry it out.
    ///
    /// Returns `None` when there is nothing to remove or `confirm` declines.
    pub fn remove(
        &self,
        names: &[String],
        cascade: bool,
        confirm: impl FnOnce(&RemovalPlan) -> bool,
    ) -> Result<Option<RemovalReport>> {
        let plan = self.plan_removal(names, cascade)?;
        if plan.is_empty() {
            tracing::debug!("Nothing to remove");
            return Ok(None);
        }
        if !confirm(&plan) {
            tracing::info!("Removal declined");
            return Ok(None);
        }
        self.execute_removal(&plan).map(Some)
    }
}
