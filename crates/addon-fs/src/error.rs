//! Error types for addon-fs

use std::path::PathBuf;

/// Result type for addon-fs operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in addon-fs operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Lock acquisition failed for {path}")]
    LockFailed { path: PathBuf },

    #[error("Could not determine the location of the running executable: {source}")]
    ExecutableLocation {
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
