//! Filesystem primitives for the add-on manager
//!
//! Provides atomic writes, declaration-file readers, path resolution and
//! advisory lock guards shared by the higher layers.

pub mod error;
pub mod io;
pub mod lock;
pub mod path;

pub use error::{Error, Result};
pub use lock::LockGuard;
pub use path::{executable_dir, normalize_lexically, remove_dir_if_empty, resolve_path};
