use addon_fs::{remove_dir_if_empty, resolve_path};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

#[test]
fn test_remove_dir_if_empty_removes_empty() {
    let temp = TempDir::new().unwrap();
    let owner = temp.path().join("acme");
    fs::create_dir(&owner).unwrap();

    assert!(remove_dir_if_empty(&owner).unwrap());
    assert!(!owner.exists());
}

#[test]
fn test_remove_dir_if_empty_keeps_populated() {
    let temp = TempDir::new().unwrap();
    let owner = temp.path().join("acme");
    fs::create_dir_all(owner.join("other")).unwrap();

    assert!(!remove_dir_if_empty(&owner).unwrap());
    assert!(owner.exists());
}

#[test]
fn test_remove_dir_if_empty_missing_is_noop() {
    let temp = TempDir::new().unwrap();
    assert!(!remove_dir_if_empty(&temp.path().join("ghost")).unwrap());
}

#[test]
fn test_resolve_default_locations() {
    let base = Path::new("/usr/local/lib/addons");
    assert_eq!(resolve_path(base, Path::new(".")), PathBuf::from("/usr/local/lib/addons"));
    assert_eq!(
        resolve_path(base, Path::new(".state")),
        PathBuf::from("/usr/local/lib/addons/.state")
    );
}
