//! Error types for addon-core

use std::path::PathBuf;

/// Result type for addon-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in addon-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Identifier could not be parsed into `owner/name` form
    #[error("Invalid add-on name '{input}': {reason}")]
    InvalidName { input: String, reason: String },

    /// Removal requested for an add-on with no install directory
    #[error("Are you sure add-on '{identity}' is installed? It was not found at: {path}")]
    NotInstalled { identity: String, path: PathBuf },

    /// A declaration file inside an add-on is malformed
    #[error("Invalid declaration in {path}: {reason}")]
    InvalidDeclaration { path: PathBuf, reason: String },

    /// The persisted state file could not be parsed
    #[error("Failed to parse state file {path}: {message}")]
    StateParse { path: PathBuf, message: String },

    /// Downloading a remote asset bundle failed
    #[error("Download of '{url}' failed: {message}")]
    Download { url: String, message: String },

    /// Extracting a downloaded archive failed
    #[error("Extraction of {archive} failed: {message}")]
    Extract { archive: PathBuf, message: String },

    /// Resource category outside the supported set
    #[error("Resource type '{name}' is not one of the supported types: {supported}")]
    UnknownCategory { name: String, supported: String },

    /// File extension pattern is not a valid regular expression
    #[error("Invalid extension pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// Resource file could not be parsed as a YAML mapping
    #[error("Failed to parse resource file {path}: {message}")]
    ResourceParse { path: PathBuf, message: String },

    /// Remote catalog query failed
    #[error("Catalog query failed: {message}")]
    Catalog { message: String },

    /// External package manager invocation failed
    #[error("External install command '{command}' failed (exit code: {exit_code:?})")]
    ExternalInstall {
        command: String,
        exit_code: Option<i32>,
    },

    // Transparent wrappers for underlying crate errors
    /// Filesystem error from addon-fs
    #[error(transparent)]
    Fs(#[from] addon_fs::Error),

    /// Git error from addon-git
    #[error(transparent)]
    Git(#[from] addon_git::Error),

    /// JSON serialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
