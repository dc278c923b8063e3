pub mod worktree_cmd;
