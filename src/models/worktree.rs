use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// Status of a worktree as reported by the latest listing.
///
/// Derived from the porcelain flags on every read; never stored.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum WorktreeStatus {
    /// Checked out on a branch with no special flags
    Active,
    /// Protected from pruning and removal
    Locked,
    /// Checkout directory is gone; administrative entry is stale
    Prunable,
    /// HEAD is not attached to a branch
    Detached,
}

impl WorktreeStatus {
    /// Derive the status from the raw listing flags.
    ///
    /// Priority is Locked > Prunable > Detached > Active; only the first
    /// matching flag counts.
    pub fn from_flags(locked: bool, prunable: bool, detached: bool) -> Self {
        if locked {
            WorktreeStatus::Locked
        } else if prunable {
            WorktreeStatus::Prunable
        } else if detached {
            WorktreeStatus::Detached
        } else {
            WorktreeStatus::Active
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WorktreeStatus::Active => "active",
            WorktreeStatus::Locked => "locked",
            WorktreeStatus::Prunable => "prunable",
            WorktreeStatus::Detached => "detached",
        }
    }
}

impl fmt::Display for WorktreeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One worktree as seen in `git worktree list --porcelain`.
///
/// Records are recomputed from git on every query; there is no way to
/// mutate one into a new state.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct WorktreeInfo {
    /// Absolute checkout location, the identity key
    pub path: PathBuf,
    /// Branch name without `refs/heads/`, `None` when detached
    pub branch: Option<String>,
    /// Full hash of the checked-out commit
    pub commit: String,
    pub status: WorktreeStatus,
    pub is_bare: bool,
    /// True for the repository's main checkout
    pub is_main: bool,
}

impl WorktreeInfo {
    /// Short commit hash for display
    pub fn short_commit(&self) -> &str {
        let end = self
            .commit
            .char_indices()
            .nth(8)
            .map(|(idx, _)| idx)
            .unwrap_or(self.commit.len());
        &self.commit[..end]
    }

    /// Branch name, or a placeholder for detached worktrees
    pub fn branch_label(&self) -> &str {
        self.branch.as_deref().unwrap_or("(detached)")
    }
}
