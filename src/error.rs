//! Error taxonomy for worktree management
//!
//! Tool-failure variants carry git's own diagnostic text so the caller can
//! show it verbatim.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorktreeError {
    #[error("git executable not found on PATH")]
    GitUnavailable,

    #[error("Invalid git repository: {}", .0.display())]
    InvalidRepository(PathBuf),

    #[error("Cannot manage worktrees for a bare repository: {}", .0.display())]
    UnsupportedRepository(PathBuf),

    #[error("Path already exists: {}", .0.display())]
    PathAlreadyExists(PathBuf),

    #[error("Worktree not found: {0}")]
    WorktreeNotFound(String),

    #[error("Cannot remove the main worktree")]
    CannotRemoveMain,

    #[error("Worktree path does not exist: {}", .0.display())]
    WorktreePathMissing(PathBuf),

    #[error("Failed to create worktree: {0}")]
    WorktreeCreationFailed(String),

    #[error("Failed to list worktrees: {0}")]
    WorktreeListingFailed(String),

    #[error("Failed to remove worktree: {0}")]
    WorktreeRemovalFailed(String),

    #[error("Failed to prune worktrees: {0}")]
    PruneFailed(String),

    #[error("Failed to lock worktree: {0}")]
    LockOperationFailed(String),

    #[error("Failed to unlock worktree: {0}")]
    UnlockOperationFailed(String),

    #[error("Failed to repair worktree: {0}")]
    RepairFailed(String),

    #[error("git {command} timed out after {seconds}s")]
    Timeout { command: String, seconds: u64 },

    #[error("Invalid worktree configuration: {0}")]
    InvalidConfig(String),

    #[error("Worktree limit reached ({limit})")]
    WorktreeLimitReached { limit: usize },
}

impl WorktreeError {
    /// True for errors caused by the caller's input rather than by git.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            WorktreeError::InvalidRepository(_)
                | WorktreeError::UnsupportedRepository(_)
                | WorktreeError::PathAlreadyExists(_)
                | WorktreeError::WorktreeNotFound(_)
                | WorktreeError::CannotRemoveMain
                | WorktreeError::WorktreePathMissing(_)
                | WorktreeError::InvalidConfig(_)
                | WorktreeError::WorktreeLimitReached { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, WorktreeError>;
