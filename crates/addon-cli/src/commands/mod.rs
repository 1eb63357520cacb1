//! Command implementations for addon-cli

pub mod external;
pub mod find;
pub mod install;
pub mod list;
pub mod remove;

pub use external::run_install_external;
pub use find::{run_find, run_path};
pub use install::run_install;
pub use list::{run_dirty, run_list, run_outdated};
pub use remove::run_remove;
