//! `git2`-backed working-copy synchronization

use std::fs;
use std::path::Path;

use git2::build::RepoBuilder;
use git2::{Oid, Repository, ResetType, StatusOptions};

use crate::provider::{SourceSync, SyncOutcome, short_revision};
use crate::{Error, Result};

/// Remote that clones are made from and whose default branch is tracked.
const ORIGIN: &str = "origin";

/// [`SourceSync`] implementation using libgit2.
#[derive(Debug, Clone, Copy, Default)]
pub struct GitSync;

impl GitSync {
    pub fn new() -> Self {
        Self
    }

    fn clone_fresh(&self, url: &str, path: &Path) -> Result<SyncOutcome> {
        fs::create_dir_all(path).map_err(|e| addon_fs::Error::io(path, e))?;

        let repo = match RepoBuilder::new().clone(url, path) {
            Ok(repo) => repo,
            Err(e) => {
                // Leave no empty install directory behind a failed clone
                if let Err(cleanup) = addon_fs::remove_dir_if_empty(path) {
                    tracing::warn!(path = %path.display(), error = %cleanup, "Cleanup after failed clone");
                }
                return Err(Error::CloneFailed {
                    url: url.to_string(),
                    path: path.to_path_buf(),
                    message: e.message().to_string(),
                });
            }
        };

        let revision = head_oid(&repo)?.to_string();
        tracing::info!(url = %url, revision = %revision, "Cloned working copy");
        Ok(SyncOutcome::Cloned { revision })
    }

    fn upgrade(&self, path: &Path) -> Result<SyncOutcome> {
        let repo = open(path)?;
        fetch_all(&repo, path)?;

        let current = head_oid(&repo)?;
        let latest = remote_head_oid(&repo, path)?;

        if current == latest {
            tracing::debug!(path = %path.display(), revision = %current, "Already current");
            return Ok(SyncOutcome::Current {
                revision: current.to_string(),
            });
        }

        let target = repo.find_object(latest, None)?;
        repo.reset(&target, ResetType::Hard, None)?;

        let from = current.to_string();
        let to = latest.to_string();
        tracing::info!(
            path = %path.display(),
            from = %short_revision(&from),
            to = %short_revision(&to),
            "Hard-reset working copy to remote tip"
        );
        Ok(SyncOutcome::Upgraded { from, to })
    }
}

impl SourceSync for GitSync {
    fn sync(&self, url: &str, path: &Path) -> Result<SyncOutcome> {
        if self.is_working_copy(path) {
            self.upgrade(path)
        } else {
            self.clone_fresh(url, path)
        }
    }

    fn is_dirty(&self, path: &Path) -> Result<bool> {
        let repo = open(path)?;
        let mut opts = StatusOptions::new();
        opts.include_untracked(true).include_ignored(false);
        let statuses = repo.statuses(Some(&mut opts))?;
        Ok(!statuses.is_empty())
    }

    fn is_outdated(&self, path: &Path) -> Result<bool> {
        let repo = open(path)?;
        Ok(head_oid(&repo)? != remote_head_oid(&repo, path)?)
    }
}

fn open(path: &Path) -> Result<Repository> {
    Repository::open(path).map_err(|_| Error::NotARepository {
        path: path.to_path_buf(),
    })
}

fn head_oid(repo: &Repository) -> Result<Oid> {
    Ok(repo.head()?.peel_to_commit()?.id())
}

/// Fetch every configured remote using its configured refspecs.
fn fetch_all(repo: &Repository, path: &Path) -> Result<()> {
    let remotes = repo.remotes()?;
    for name in remotes.iter().flatten() {
        let mut remote = repo.find_remote(name)?;
        remote
            .fetch(&[] as &[&str], None, None)
            .map_err(|e| Error::FetchFailed {
                remote: name.to_string(),
                path: path.to_path_buf(),
                message: e.message().to_string(),
            })?;
    }
    Ok(())
}

/// Resolve the tip of the remote default branch.
///
/// Prefers `refs/remotes/origin/HEAD`; falls back to the remote-tracking ref
/// of the currently checked-out branch when the symbolic ref is absent.
fn remote_head_oid(repo: &Repository, path: &Path) -> Result<Oid> {
    if let Ok(reference) = repo.find_reference(&format!("refs/remotes/{ORIGIN}/HEAD"))
        && let Ok(commit) = reference.resolve().and_then(|r| r.peel_to_commit())
    {
        return Ok(commit.id());
    }

    let head = repo.head()?;
    if head.is_branch()
        && let Some(branch) = head.shorthand()
        && let Ok(reference) = repo.find_reference(&format!("refs/remotes/{ORIGIN}/{branch}"))
    {
        return Ok(reference.peel_to_commit()?.id());
    }

    Err(Error::RemoteHeadNotFound {
        path: path.to_path_buf(),
    })
}
