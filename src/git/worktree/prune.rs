//! Prune result recovery
//!
//! `git worktree prune --verbose` only reports what it did as human-readable
//! text on stderr, naming administrative ids (`Removing worktrees/<id>: ...`)
//! rather than checkout paths. The id to path mapping is read from the
//! administrative directory before pruning, because a real prune deletes it.
//! The result is best-effort: a change in git's wording yields fewer paths,
//! never an error.

use regex::Regex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static ADMIN_ID_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(?:would\s+)?remov(?:e|ing)\s+worktrees/([^:\s]+)")
        .expect("valid admin id pattern")
});

static QUOTED_PATH_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)(?:removing|would remove)[^"]*"([^"]+)""#).expect("valid quoted pattern")
});

/// Map each administrative id under `<common_dir>/worktrees` to its
/// checkout path, as recorded in the id's `gitdir` file.
pub fn snapshot_admin_paths(common_dir: &Path) -> HashMap<String, PathBuf> {
    let mut paths = HashMap::new();
    let Ok(entries) = std::fs::read_dir(common_dir.join("worktrees")) else {
        return paths;
    };

    for entry in entries.flatten() {
        let id = entry.file_name().to_string_lossy().into_owned();
        let Ok(content) = std::fs::read_to_string(entry.path().join("gitdir")) else {
            continue;
        };
        // gitdir holds "<checkout>/.git"
        let gitfile = PathBuf::from(content.trim());
        let checkout = match gitfile.file_name() {
            Some(name) if name == ".git" => gitfile.parent().map(Path::to_path_buf),
            _ => Some(gitfile.clone()),
        };
        if let Some(checkout) = checkout {
            paths.insert(id, checkout);
        }
    }

    paths
}

/// Extract the affected checkout paths from prune output.
///
/// Ids missing from `admin_paths` fall back to the administrative
/// directory itself so the caller still learns something was pruned.
pub fn scrape_pruned_paths(
    output: &str,
    admin_paths: &HashMap<String, PathBuf>,
    common_dir: &Path,
) -> Vec<PathBuf> {
    let mut pruned: Vec<PathBuf> = Vec::new();

    for line in output.lines() {
        let path = if let Some(caps) = QUOTED_PATH_LINE.captures(line) {
            PathBuf::from(&caps[1])
        } else if let Some(caps) = ADMIN_ID_LINE.captures(line) {
            let id = &caps[1];
            admin_paths
                .get(id)
                .cloned()
                .unwrap_or_else(|| common_dir.join("worktrees").join(id))
        } else {
            continue;
        };

        if !pruned.contains(&path) {
            pruned.push(path);
        }
    }

    pruned
}
