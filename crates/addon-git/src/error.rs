//! Error types for addon-git

use std::path::PathBuf;

/// Result type for addon-git operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in addon-git operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("Filesystem error: {0}")]
    Fs(#[from] addon_fs::Error),

    #[error("Failed to clone '{url}' into {path}: {message}. Are you sure the repository exists?")]
    CloneFailed {
        url: String,
        path: PathBuf,
        message: String,
    },

    #[error("Failed to fetch remote '{remote}' in {path}: {message}")]
    FetchFailed {
        remote: String,
        path: PathBuf,
        message: String,
    },

    #[error("No remote default branch found for working copy at {path}")]
    RemoteHeadNotFound { path: PathBuf },

    #[error("Not a git working copy: {path}")]
    NotARepository { path: PathBuf },
}
