//! Git worktree management
//!
//! ## Module structure
//!
//! - `repository`: Binding to a non-bare repository (git dir, common dir, main root)
//! - `parser`: `git worktree list --porcelain` parsing
//! - `manager`: Lifecycle operations (create, list, get, remove, switch, prune, lock, repair)
//! - `prune`: Recovery of pruned paths from verbose prune output
//! - `paths`: Path resolution for identity comparison

mod manager;
mod parser;
mod paths;
mod prune;
mod repository;

pub use manager::{CreateOptions, WorktreeManager};
pub use parser::{parse_entries, parse_worktree_list, PorcelainEntry};
pub use paths::{normalize_lexically, resolve_path};
pub use prune::{scrape_pruned_paths, snapshot_admin_paths};
pub use repository::{
    main_root_from_common_dir, main_root_from_listing, resolve_common_dir, Repository,
};
