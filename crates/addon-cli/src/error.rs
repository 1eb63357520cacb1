//! Error types for the `addons` binary

/// Result type for command handlers
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors surfaced to the user by `addons`
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Install, removal or query failure from the add-on manager
    #[error(transparent)]
    Core(#[from] addon_core::Error),

    /// Removal confirmation could not be read from the terminal
    #[error("Could not read confirmation: {0}")]
    Dialoguer(#[from] dialoguer::Error),

    /// Message for conditions that are not library errors, e.g. an empty match
    #[error("{message}")]
    User { message: String },
}

impl CliError {
    pub fn user(message: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
        }
    }
}
