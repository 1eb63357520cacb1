//! Git abstraction for the add-on manager
//!
//! Exposes working-copy synchronization through the narrow [`SourceSync`]
//! capability so that higher layers can be exercised against fakes.

pub mod error;
pub mod provider;
pub mod repository;

pub use error::{Error, Result};
pub use provider::{SourceSync, SyncOutcome, short_revision};
pub use repository::GitSync;
