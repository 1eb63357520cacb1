//! Source synchronization capability

use std::path::Path;

use crate::Result;

/// Number of characters shown for abbreviated revisions.
pub const SHORT_REVISION_LEN: usize = 8;

/// Abbreviate a full revision hash for display.
pub fn short_revision(revision: &str) -> &str {
    match revision.char_indices().nth(SHORT_REVISION_LEN) {
        Some((idx, _)) => &revision[..idx],
        None => revision,
    }
}

/// What a [`SourceSync::sync`] call did to the working copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// No working copy existed; a fresh clone was made.
    Cloned { revision: String },
    /// Local HEAD already matched the remote default branch.
    Current { revision: String },
    /// The working copy was hard-reset from `from` to `to`.
    Upgraded { from: String, to: String },
}

impl SyncOutcome {
    /// Full revision checked out after the sync.
    pub fn revision(&self) -> &str {
        match self {
            Self::Cloned { revision } | Self::Current { revision } => revision,
            Self::Upgraded { to, .. } => to,
        }
    }
}

/// Keeps a local working copy in step with its remote.
///
/// Implementations mutate only the tree under `path`; they never touch the
/// persisted add-on state.
pub trait SourceSync {
    /// Clone `url` into `path` if no working copy exists there, otherwise
    /// fetch and hard-reset to the remote default-branch tip.
    ///
    /// Local modifications are discarded when an upgrade happens.
    fn sync(&self, url: &str, path: &Path) -> Result<SyncOutcome>;

    /// Whether a working copy exists at `path`.
    fn is_working_copy(&self, path: &Path) -> bool {
        path.join(".git").exists()
    }

    /// Whether the working copy has uncommitted or untracked changes.
    fn is_dirty(&self, path: &Path) -> Result<bool>;

    /// Whether local HEAD differs from the last fetched remote default branch.
    ///
    /// Performs no network access.
    fn is_outdated(&self, path: &Path) -> Result<bool>;
}
