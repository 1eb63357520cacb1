//! Add-on lifecycle and dependency state management
//!
//! An add-on is a git repository cloned to `<install_root>/<owner>/<name>`.
//! It may declare other add-ons it depends on, external packages it needs and
//! a remote asset bundle to unpack into its directory. [`AddonManager`]
//! installs add-ons together with their dependencies, records what is
//! installed in a persisted [`State`], and removes add-ons along with the
//! add-ons that depend on them.
//!
//! Version control, downloads and package installation sit behind the
//! [`SourceSync`], [`AssetFetcher`] and [`PackageInstaller`] traits.

pub mod asset;
pub mod catalog;
pub mod config;
pub mod declaration;
pub mod error;
pub mod external;
pub mod identity;
pub mod install;
pub mod manager;
pub mod remove;
pub mod resources;
pub mod state;

pub use addon_git::{SourceSync, SyncOutcome, short_revision};
pub use asset::{AssetFetcher, AssetOutcome, HttpArchiveFetcher};
pub use catalog::CatalogClient;
pub use config::ManagerConfig;
pub use error::{Error, Result};
pub use external::{PackageInstaller, PipInstaller};
pub use identity::{AddonId, AddonRef, LOCAL_ADDON};
pub use install::{AddonInstall, InstallEvent, InstallReport};
pub use manager::AddonManager;
pub use remove::{RemovalPlan, RemovalReport, RemovedAddon};
pub use resources::{ResourceCategory, ResourceQuery};
pub use state::{InstalledAddon, RemoteAsset, State, StateStore};
