//! Worktree output parsing
//!
//! Parses `git worktree list --porcelain` output into structured data.
//!
//! Recognized keys are a closed set looked up in [`PORCELAIN_KEYS`]. Keys
//! git may add in future versions are skipped rather than rejected, so a
//! newer git never breaks listing.

use std::path::{Path, PathBuf};

use super::paths::resolve_path;
use crate::models::worktree::{WorktreeInfo, WorktreeStatus};

/// Attribute keys understood by the parser
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PorcelainKey {
    Worktree,
    Head,
    Branch,
    Bare,
    Locked,
    Prunable,
    Detached,
}

const PORCELAIN_KEYS: &[(&str, PorcelainKey)] = &[
    ("worktree", PorcelainKey::Worktree),
    ("HEAD", PorcelainKey::Head),
    ("branch", PorcelainKey::Branch),
    ("bare", PorcelainKey::Bare),
    ("locked", PorcelainKey::Locked),
    ("prunable", PorcelainKey::Prunable),
    ("detached", PorcelainKey::Detached),
];

const BRANCH_REF_PREFIX: &str = "refs/heads/";

fn lookup_key(key: &str) -> Option<PorcelainKey> {
    PORCELAIN_KEYS
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, k)| *k)
}

/// One raw entry block, before main-worktree classification
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PorcelainEntry {
    pub worktree: Option<String>,
    pub head: Option<String>,
    pub branch: Option<String>,
    pub bare: bool,
    pub locked: bool,
    pub prunable: bool,
    pub detached: bool,
}

impl PorcelainEntry {
    fn set(&mut self, key: PorcelainKey, value: &str) {
        match key {
            PorcelainKey::Worktree => self.worktree = Some(value.to_string()),
            PorcelainKey::Head => self.head = Some(value.to_string()),
            PorcelainKey::Branch => self.branch = Some(value.to_string()),
            PorcelainKey::Bare => self.bare = true,
            // Lock and prune reasons are informational only
            PorcelainKey::Locked => self.locked = true,
            PorcelainKey::Prunable => self.prunable = true,
            PorcelainKey::Detached => self.detached = true,
        }
    }

    /// Build the record; `main_root` must already be resolved.
    pub fn into_info(self, main_root: &Path) -> WorktreeInfo {
        let raw_path = self.worktree.unwrap_or_default();
        let path = PathBuf::from(&raw_path);
        let is_main = !raw_path.is_empty() && resolve_path(&path, main_root) == main_root;

        let branch = self.branch.map(|b| {
            b.strip_prefix(BRANCH_REF_PREFIX)
                .map(str::to_string)
                .unwrap_or(b)
        });

        WorktreeInfo {
            path,
            branch,
            commit: self.head.unwrap_or_default(),
            status: WorktreeStatus::from_flags(self.locked, self.prunable, self.detached),
            is_bare: self.bare,
            is_main,
        }
    }
}

/// Split porcelain output into raw entries.
///
/// Example input:
/// ```text
/// worktree /home/user/repo
/// HEAD abc123def456
/// branch refs/heads/main
///
/// worktree /home/user/wt1
/// HEAD def789abc012
/// detached
/// locked reason text
/// ```
pub fn parse_entries(output: &str) -> Vec<PorcelainEntry> {
    let mut entries = Vec::new();
    let mut current: Option<PorcelainEntry> = None;

    for line in output.lines() {
        let line = line.trim_end_matches('\r');
        if line.is_empty() {
            if let Some(entry) = current.take() {
                entries.push(entry);
            }
            continue;
        }

        let (key, value) = line.split_once(' ').unwrap_or((line, ""));
        let entry = current.get_or_insert_with(PorcelainEntry::default);
        if let Some(key) = lookup_key(key) {
            entry.set(key, value);
        }
    }

    // Final entry may lack the trailing blank line
    if let Some(entry) = current {
        entries.push(entry);
    }

    entries
}

/// Parse porcelain output into records, in git's listing order.
pub fn parse_worktree_list(output: &str, main_root: &Path) -> Vec<WorktreeInfo> {
    parse_entries(output)
        .into_iter()
        .map(|entry| entry.into_info(main_root))
        .collect()
}
