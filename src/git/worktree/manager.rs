//! Worktree lifecycle operations
//!
//! `WorktreeManager` wraps the `git worktree` subcommands. Worktree state is
//! never cached: every query re-reads `git worktree list --porcelain`, so a
//! successful mutation is always visible to the next call.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use super::parser::parse_worktree_list;
use super::paths::resolve_path;
use super::prune::{scrape_pruned_paths, snapshot_admin_paths};
use super::repository::Repository;
use crate::error::{Result, WorktreeError};
use crate::git::runner::{run_git_checked, GitOutput, DEFAULT_GIT_TIMEOUT};
use crate::models::worktree::WorktreeInfo;

/// Options for [`WorktreeManager::create`]
#[derive(Debug, Clone)]
pub struct CreateOptions {
    /// Existing branch (or other commit-ish) to check out
    pub branch: Option<String>,
    /// Branch to create and check out; `branch`, if also set, is its start point
    pub new_branch: Option<String>,
    /// Let git decide whether an existing path may be reused
    pub force: bool,
    /// Populate the working files
    pub checkout: bool,
}

impl Default for CreateOptions {
    fn default() -> Self {
        Self {
            branch: None,
            new_branch: None,
            force: false,
            checkout: true,
        }
    }
}

impl CreateOptions {
    /// Detached HEAD at the current commit
    pub fn detached() -> Self {
        Self::default()
    }

    /// Check out an existing branch
    pub fn existing_branch(branch: impl Into<String>) -> Self {
        Self {
            branch: Some(branch.into()),
            ..Self::default()
        }
    }

    /// Create and check out a new branch
    pub fn new_branch(branch: impl Into<String>) -> Self {
        Self {
            new_branch: Some(branch.into()),
            ..Self::default()
        }
    }

    pub fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    pub fn checkout(mut self, checkout: bool) -> Self {
        self.checkout = checkout;
        self
    }
}

/// Manages the worktrees of one repository
#[derive(Debug, Clone)]
pub struct WorktreeManager {
    repo: Repository,
    timeout: Duration,
}

impl WorktreeManager {
    /// Bind to the repository containing `path`
    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self::from_repository(Repository::open(path)?))
    }

    pub fn from_repository(repo: Repository) -> Self {
        Self {
            repo,
            timeout: DEFAULT_GIT_TIMEOUT,
        }
    }

    /// Override the per-invocation git timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn repository(&self) -> &Repository {
        &self.repo
    }

    /// Create a worktree at `path` and return its fresh listing record.
    ///
    /// Runs: `git worktree add [--force] [--no-checkout] [-b <new> | --detach] <path> [<branch>]`
    pub fn create(&self, path: &Path, options: &CreateOptions) -> Result<WorktreeInfo> {
        let target = self.resolve(path);

        if target.exists() && !options.force {
            return Err(WorktreeError::PathAlreadyExists(target));
        }

        let mut args: Vec<OsString> = vec!["worktree".into(), "add".into()];
        if options.force {
            args.push("--force".into());
        }
        if !options.checkout {
            args.push("--no-checkout".into());
        }
        if let Some(new_branch) = &options.new_branch {
            args.push("-b".into());
            args.push(new_branch.into());
        } else if options.branch.is_none() {
            // Otherwise git invents a branch named after the directory
            args.push("--detach".into());
        }
        args.push(target.clone().into_os_string());
        if let Some(branch) = &options.branch {
            args.push(branch.into());
        }

        self.git(&args, WorktreeError::WorktreeCreationFailed)?;

        self.list(true)?
            .into_iter()
            .find(|wt| self.resolve(&wt.path) == target)
            .ok_or_else(|| {
                WorktreeError::WorktreeCreationFailed(format!(
                    "{} was created but is missing from the worktree list",
                    target.display()
                ))
            })
    }

    /// List worktrees in git's order (main checkout first).
    ///
    /// Runs: `git worktree list --porcelain`
    pub fn list(&self, include_main: bool) -> Result<Vec<WorktreeInfo>> {
        let output = self.git(
            &["worktree", "list", "--porcelain"],
            WorktreeError::WorktreeListingFailed,
        )?;

        let mut worktrees = parse_worktree_list(&output.stdout, self.repo.main_root());
        if !include_main {
            worktrees.retain(|wt| !wt.is_main);
        }
        Ok(worktrees)
    }

    /// Find a worktree by path, falling back to branch name.
    ///
    /// A path match always wins over a branch match. `Ok(None)` means
    /// nothing matched; `Err` means git could not be queried.
    pub fn get(&self, identifier: &str) -> Result<Option<WorktreeInfo>> {
        let worktrees = self.list(true)?;

        let wanted = self.resolve(Path::new(identifier));
        if let Some(found) = worktrees
            .iter()
            .find(|wt| !wt.path.as_os_str().is_empty() && self.resolve(&wt.path) == wanted)
        {
            return Ok(Some(found.clone()));
        }

        Ok(worktrees
            .into_iter()
            .find(|wt| wt.branch.as_deref() == Some(identifier)))
    }

    /// Remove a secondary worktree. The main worktree is never removable.
    ///
    /// Runs: `git worktree remove [--force] <path>`
    pub fn remove(&self, identifier: &str, force: bool) -> Result<()> {
        let worktree = self.require(identifier)?;
        if worktree.is_main {
            return Err(WorktreeError::CannotRemoveMain);
        }

        let mut args: Vec<OsString> = vec!["worktree".into(), "remove".into()];
        if force {
            args.push("--force".into());
        }
        args.push(worktree.path.into_os_string());

        self.git(&args, WorktreeError::WorktreeRemovalFailed)?;
        Ok(())
    }

    /// Resolve the checkout directory for a worktree.
    ///
    /// Does not change the process working directory.
    pub fn switch(&self, identifier: &str) -> Result<PathBuf> {
        let worktree = self.require(identifier)?;
        if !worktree.path.exists() {
            return Err(WorktreeError::WorktreePathMissing(worktree.path));
        }
        Ok(worktree.path)
    }

    /// Prune stale administrative entries, returning the affected paths.
    ///
    /// Runs: `git worktree prune [--dry-run] --verbose`
    pub fn prune(&self, dry_run: bool) -> Result<Vec<PathBuf>> {
        let admin_paths = snapshot_admin_paths(self.repo.common_dir());

        let mut args = vec!["worktree", "prune"];
        if dry_run {
            args.push("--dry-run");
        }
        args.push("--verbose");

        let output = self.git(&args, WorktreeError::PruneFailed)?;
        let text = format!("{}\n{}", output.stdout, output.stderr);
        let pruned = scrape_pruned_paths(&text, &admin_paths, self.repo.common_dir());
        debug!(dry_run, count = pruned.len(), "prune finished");
        Ok(pruned)
    }

    /// Lock a worktree against pruning and removal.
    ///
    /// Runs: `git worktree lock [--reason <reason>] <path>`
    pub fn lock(&self, identifier: &str, reason: Option<&str>) -> Result<()> {
        let worktree = self.require(identifier)?;

        let mut args: Vec<OsString> = vec!["worktree".into(), "lock".into()];
        if let Some(reason) = reason {
            args.push("--reason".into());
            args.push(reason.into());
        }
        args.push(worktree.path.into_os_string());

        self.git(&args, WorktreeError::LockOperationFailed)?;
        Ok(())
    }

    /// Runs: `git worktree unlock <path>`
    pub fn unlock(&self, identifier: &str) -> Result<()> {
        let worktree = self.require(identifier)?;
        let args: Vec<OsString> = vec![
            "worktree".into(),
            "unlock".into(),
            worktree.path.into_os_string(),
        ];
        self.git(&args, WorktreeError::UnlockOperationFailed)?;
        Ok(())
    }

    /// Repair administrative links for one worktree, or all when `None`.
    ///
    /// Runs: `git worktree repair [<path>]`
    pub fn repair(&self, identifier: Option<&str>) -> Result<()> {
        let mut args: Vec<OsString> = vec!["worktree".into(), "repair".into()];
        if let Some(identifier) = identifier {
            args.push(self.require(identifier)?.path.into_os_string());
        }
        self.git(&args, WorktreeError::RepairFailed)?;
        Ok(())
    }

    fn require(&self, identifier: &str) -> Result<WorktreeInfo> {
        self.get(identifier)?
            .ok_or_else(|| WorktreeError::WorktreeNotFound(identifier.to_string()))
    }

    /// Relative paths are taken from the bound checkout, not the process cwd
    fn resolve(&self, path: &Path) -> PathBuf {
        resolve_path(path, self.repo.work_tree())
    }

    fn git<S, F>(&self, args: &[S], on_failure: F) -> Result<GitOutput>
    where
        S: AsRef<std::ffi::OsStr>,
        F: FnOnce(String) -> WorktreeError,
    {
        let cwd = if self.repo.main_root().is_dir() {
            self.repo.main_root()
        } else {
            self.repo.work_tree()
        };
        run_git_checked(args, cwd, self.timeout, on_failure)
    }
}
