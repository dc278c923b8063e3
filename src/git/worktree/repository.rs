//! Repository binding
//!
//! Binds worktree management to one non-bare repository and resolves the
//! directories every later operation needs. The binding path may be the
//! main checkout, a subdirectory of it, or a secondary worktree.

use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use super::parser::parse_entries;
use super::paths::normalize_lexically;
use crate::error::{Result, WorktreeError};
use crate::git::runner::{run_git, run_git_checked, GitRunError, DEFAULT_GIT_TIMEOUT};

/// Marker file inside a per-worktree git dir pointing at the common dir
const COMMONDIR_FILE: &str = "commondir";

/// A validated, non-bare repository checkout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    /// Canonical form of the path the binding was opened with
    path: PathBuf,
    /// Top level of the checkout containing `path`
    work_tree: PathBuf,
    /// Administrative directory of that checkout
    git_dir: PathBuf,
    /// Administrative directory shared by all worktrees
    common_dir: PathBuf,
    /// Root of the main checkout
    main_root: PathBuf,
}

impl Repository {
    /// Open the repository containing `path` with the default git timeout
    pub fn open(path: &Path) -> Result<Self> {
        Self::open_with_timeout(path, DEFAULT_GIT_TIMEOUT)
    }

    pub fn open_with_timeout(path: &Path, timeout: Duration) -> Result<Self> {
        which::which("git").map_err(|_| WorktreeError::GitUnavailable)?;

        let canonical = path
            .canonicalize()
            .map_err(|_| WorktreeError::InvalidRepository(path.to_path_buf()))?;
        let cwd = if canonical.is_file() {
            canonical
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| canonical.clone())
        } else {
            canonical.clone()
        };

        let probe = rev_parse(
            &["--is-bare-repository", "--absolute-git-dir"],
            &cwd,
            &canonical,
            timeout,
        )?;
        let mut lines = probe.lines();
        let is_bare = lines.next().map(str::trim) == Some("true");
        if is_bare {
            return Err(WorktreeError::UnsupportedRepository(canonical));
        }
        let git_dir = lines
            .next()
            .map(|l| PathBuf::from(l.trim()))
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or_else(|| WorktreeError::InvalidRepository(canonical.clone()))?;
        let git_dir = git_dir.canonicalize().unwrap_or(git_dir);

        let work_tree = rev_parse(&["--show-toplevel"], &cwd, &canonical, timeout)?;
        let work_tree = PathBuf::from(work_tree.trim());
        let work_tree = work_tree.canonicalize().unwrap_or(work_tree);

        let common_dir = resolve_common_dir(&git_dir)
            .map_err(|_| WorktreeError::InvalidRepository(canonical.clone()))?;
        let main_root = match main_root_from_common_dir(&common_dir) {
            Some(root) => root,
            None => first_listed_worktree(&cwd, timeout)?.unwrap_or_else(|| work_tree.clone()),
        };

        debug!(
            path = %canonical.display(),
            git_dir = %git_dir.display(),
            common_dir = %common_dir.display(),
            main_root = %main_root.display(),
            "bound repository"
        );

        Ok(Self {
            path: canonical,
            work_tree,
            git_dir,
            common_dir,
            main_root,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn work_tree(&self) -> &Path {
        &self.work_tree
    }

    pub fn git_dir(&self) -> &Path {
        &self.git_dir
    }

    pub fn common_dir(&self) -> &Path {
        &self.common_dir
    }

    pub fn main_root(&self) -> &Path {
        &self.main_root
    }

    /// True when the binding path lives in a secondary worktree
    pub fn is_linked_worktree(&self) -> bool {
        self.git_dir != self.common_dir
    }
}

fn rev_parse(args: &[&str], cwd: &Path, bound: &Path, timeout: Duration) -> Result<String> {
    let mut full = vec!["rev-parse"];
    full.extend_from_slice(args);
    match run_git(&full, cwd, timeout) {
        Ok(output) if output.success() => Ok(output.stdout),
        Ok(output) => {
            debug!(diagnostic = %output.diagnostic(), "rev-parse rejected path");
            Err(WorktreeError::InvalidRepository(bound.to_path_buf()))
        }
        Err(GitRunError::TimedOut { command, timeout }) => Err(WorktreeError::Timeout {
            command,
            seconds: timeout.as_secs(),
        }),
        Err(_) => Err(WorktreeError::InvalidRepository(bound.to_path_buf())),
    }
}

/// Main checkout for layouts where the common dir is not a `.git` inside it
/// (`--separate-git-dir`); git always lists the main worktree first.
fn first_listed_worktree(cwd: &Path, timeout: Duration) -> Result<Option<PathBuf>> {
    let output = run_git_checked(
        &["worktree", "list", "--porcelain"],
        cwd,
        timeout,
        WorktreeError::WorktreeListingFailed,
    )?;
    Ok(main_root_from_listing(&output.stdout))
}

/// Path of the first non-bare entry of `git worktree list --porcelain`
pub fn main_root_from_listing(porcelain: &str) -> Option<PathBuf> {
    let first = parse_entries(porcelain).into_iter().next()?;
    if first.bare {
        return None;
    }
    let path = PathBuf::from(first.worktree.filter(|p| !p.is_empty())?);
    Some(path.canonicalize().unwrap_or(path))
}

/// Resolve the common git directory for a checkout's `git_dir`.
///
/// A secondary worktree's git dir contains a `commondir` file whose content
/// is a path, possibly relative to the git dir. Without that file the git
/// dir is itself the common dir.
pub fn resolve_common_dir(git_dir: &Path) -> std::io::Result<PathBuf> {
    let marker = git_dir.join(COMMONDIR_FILE);
    if !marker.exists() {
        return Ok(git_dir.to_path_buf());
    }

    let content = std::fs::read_to_string(&marker)?;
    let target = PathBuf::from(content.trim());
    let joined = if target.is_absolute() {
        target
    } else {
        git_dir.join(target)
    };
    Ok(joined
        .canonicalize()
        .unwrap_or_else(|_| normalize_lexically(&joined)))
}

/// Root of the main checkout when the common dir is a conventional `.git`
pub fn main_root_from_common_dir(common_dir: &Path) -> Option<PathBuf> {
    if common_dir.file_name()? != ".git" {
        return None;
    }
    common_dir.parent().map(Path::to_path_buf)
}
