//! Advisory lock guards
//!
//! A [`LockGuard`] holds an exclusive `fs2` lock on a dedicated lock file for
//! as long as it is alive. Locks are advisory: they serialize cooperating
//! processes and threads that use the same lock path.

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use fs2::FileExt;

use crate::{Error, Result};

/// Exclusive lock held on a lock file until dropped.
#[derive(Debug)]
pub struct LockGuard {
    file: File,
    path: PathBuf,
}

impl LockGuard {
    /// Block until an exclusive lock on `path` is acquired.
    ///
    /// The lock file and its parent directories are created if needed. The
    /// file is never removed, so concurrent holders always agree on the inode.
    pub fn exclusive(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .map_err(|e| Error::io(path, e))?;

        file.lock_exclusive().map_err(|_| Error::LockFailed {
            path: path.to_path_buf(),
        })?;

        tracing::trace!(path = %path.display(), "Acquired exclusive lock");

        Ok(Self {
            file,
            path: path.to_path_buf(),
        })
    }

    /// Path of the underlying lock file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        if let Err(e) = FileExt::unlock(&self.file) {
            tracing::warn!(path = %self.path.display(), error = %e, "Failed to release lock");
        }
    }
}
