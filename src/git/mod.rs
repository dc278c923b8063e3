//! Git operations for cci
//!
//! This module provides:
//! - A git command runner with timeouts
//! - Repository binding and worktree lifecycle management

pub mod runner;
pub mod worktree;

pub use worktree::{CreateOptions, Repository, WorktreeManager};
