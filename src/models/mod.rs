pub mod worktree;

pub use worktree::{WorktreeInfo, WorktreeStatus};
