//! Tests for the exclusive lock guard
//!
//! Verifies that holders of the same lock path never overlap.

use addon_fs::LockGuard;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;
use tempfile::tempdir;

#[test]
fn test_lock_creates_missing_parents() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("acme/.widgets.lock");

    let guard = LockGuard::exclusive(&path).unwrap();
    assert!(path.exists());
    assert_eq!(guard.path(), path.as_path());
}

#[test]
fn test_lock_is_reacquirable_after_drop() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(".state.lock");

    drop(LockGuard::exclusive(&path).unwrap());
    let _again = LockGuard::exclusive(&path).unwrap();
}

#[test]
fn test_concurrent_holders_are_serialized() {
    let dir = tempdir().unwrap();
    let path = Arc::new(dir.path().join(".state.lock"));
    let inside = Arc::new(AtomicUsize::new(0));
    let max_inside = Arc::new(AtomicUsize::new(0));

    let num_threads = 6;
    let barrier = Arc::new(Barrier::new(num_threads));

    let handles: Vec<_> = (0..num_threads)
        .map(|_| {
            let path = Arc::clone(&path);
            let inside = Arc::clone(&inside);
            let max_inside = Arc::clone(&max_inside);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                let _guard = LockGuard::exclusive(&path).unwrap();
                let now = inside.fetch_add(1, Ordering::SeqCst) + 1;
                max_inside.fetch_max(now, Ordering::SeqCst);
                thread::sleep(Duration::from_millis(5));
                inside.fetch_sub(1, Ordering::SeqCst);
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("Thread should not panic");
    }

    assert_eq!(max_inside.load(Ordering::SeqCst), 1);
}
