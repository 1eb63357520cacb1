//! Upstream git repositories for synchronization tests.
//!
//! The fixtures shell out to the `git` CLI so that the code under test (which
//! uses libgit2) is checked against repositories produced by a different
//! implementation.

use std::fs;
use std::path::Path;
use std::process::Command;

/// Run `git` with `args` inside `path`, returning trimmed stdout.
///
/// # Panics
/// Panics if the command cannot be spawned or exits unsuccessfully.
pub fn git(path: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(path)
        .output()
        .unwrap_or_else(|e| panic!("failed to run `git {args:?}`: {e}"));
    if !output.status.success() {
        panic!(
            "`git {args:?}` failed in {}:\n{}",
            path.display(),
            String::from_utf8_lossy(&output.stderr)
        );
    }
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// Initialise an upstream repository with a single commit on `main`.
///
/// Specifically:
/// - Runs `git init`
/// - Configures `user.email`, `user.name`, and `commit.gpgsign = false`
/// - Creates `README.md` and makes an initial commit
/// - Renames the default branch to `main`
///
/// Returns the full hash of the initial commit.
///
/// # Panics
/// Panics if any git operation fails.
pub fn upstream_repo(path: &Path) -> String {
    fs::create_dir_all(path)
        .unwrap_or_else(|e| panic!("upstream_repo: failed to create {}: {e}", path.display()));

    git(path, &["init"]);
    git(path, &["config", "user.email", "test@test.com"]);
    git(path, &["config", "user.name", "Test User"]);
    git(path, &["config", "commit.gpgsign", "false"]);

    fs::write(path.join("README.md"), "# Test")
        .unwrap_or_else(|e| panic!("upstream_repo: failed to write README.md: {e}"));

    git(path, &["add", "."]);
    git(path, &["commit", "-m", "Initial commit"]);
    git(path, &["branch", "-M", "main"]);

    head(path)
}

/// Write `content` to `file` in the upstream repository and commit it.
///
/// Returns the full hash of the new commit.
///
/// # Panics
/// Panics if the write or any git operation fails.
pub fn commit_file(path: &Path, file: &str, content: &str) -> String {
    let target = path.join(file);
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)
            .unwrap_or_else(|e| panic!("commit_file: failed to create {}: {e}", parent.display()));
    }
    fs::write(&target, content)
        .unwrap_or_else(|e| panic!("commit_file: failed to write {file}: {e}"));

    git(path, &["add", file]);
    git(path, &["commit", "-m", &format!("Update {file}")]);
    head(path)
}

/// Full hash of `HEAD` in the repository at `path`.
pub fn head(path: &Path) -> String {
    git(path, &["rev-parse", "HEAD"])
}
