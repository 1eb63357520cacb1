//! Shared test utilities for the add-on manager workspace.
//!
//! This crate provides standardised test fixtures to eliminate duplication
//! across crate test suites. It is a dev-dependency only and is never published.
//!
//! # Modules
//!
//! - [`git`]: upstream repositories with history, driven through the `git` CLI
//! - [`workspace`]: [`TestWorkspace`](workspace::TestWorkspace) with an install root and state path

pub mod git;
pub mod workspace;
