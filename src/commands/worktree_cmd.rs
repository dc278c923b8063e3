//! Worktree management commands
//! Usage: cci worktree [list|show|add|new|remove|switch|lock|unlock|prune|repair]

use anyhow::{bail, Context, Result};
use colored::Colorize;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use crate::config::WorktreeConfig;
use crate::error::WorktreeError;
use crate::git::worktree::{CreateOptions, WorktreeManager};
use crate::models::worktree::{WorktreeInfo, WorktreeStatus};

/// Bind to the repository at `repo` and apply its worktree config
fn open(repo: &Path) -> Result<(WorktreeManager, WorktreeConfig)> {
    let manager = WorktreeManager::open(repo)?;
    let config = WorktreeConfig::load(manager.repository().main_root())?;
    let manager = manager.with_timeout(config.command_timeout());
    Ok((manager, config))
}

/// CLI paths are relative to where the user is, not to the repository
fn absolutize(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    Ok(cwd.join(path))
}

/// Interpret an identifier relative to the user's cwd when that names a
/// worktree; otherwise pass it through (branch names, repo-relative paths).
fn resolve_identifier(manager: &WorktreeManager, identifier: &str) -> Result<String> {
    if Path::new(identifier).is_absolute() {
        return Ok(identifier.to_string());
    }
    let candidate = absolutize(Path::new(identifier))?
        .to_string_lossy()
        .into_owned();
    if manager.get(&candidate)?.is_some() {
        return Ok(candidate);
    }
    Ok(identifier.to_string())
}

/// Look up a worktree the same way as [`resolve_identifier`], keeping the
/// record so callers can address it by path afterwards
fn require(manager: &WorktreeManager, identifier: &str) -> Result<WorktreeInfo> {
    let path = Path::new(identifier);
    if !path.is_absolute() {
        let candidate = absolutize(path)?;
        if let Some(worktree) = manager.get(&candidate.to_string_lossy())? {
            return Ok(worktree);
        }
    }
    let worktree = manager
        .get(identifier)?
        .ok_or_else(|| WorktreeError::WorktreeNotFound(identifier.to_string()))?;
    Ok(worktree)
}

fn status_label(status: WorktreeStatus) -> colored::ColoredString {
    match status {
        WorktreeStatus::Active => status.as_str().green(),
        WorktreeStatus::Locked => status.as_str().yellow(),
        WorktreeStatus::Prunable => status.as_str().red(),
        WorktreeStatus::Detached => status.as_str().cyan(),
    }
}

/// Render worktrees as an aligned table
pub fn render_table(worktrees: &[WorktreeInfo]) -> Vec<String> {
    let path_width = worktrees
        .iter()
        .map(|wt| wt.path.display().to_string().chars().count())
        .max()
        .unwrap_or(0)
        .max("PATH".len());
    let branch_width = worktrees
        .iter()
        .map(|wt| wt.branch_label().chars().count())
        .max()
        .unwrap_or(0)
        .max("BRANCH".len());

    let mut lines = Vec::with_capacity(worktrees.len() + 1);
    lines.push(format!(
        "  {:<path_width$}  {:<branch_width$}  {:<8}  STATUS",
        "PATH", "BRANCH", "COMMIT"
    ));
    for wt in worktrees {
        let marker = if wt.is_main { "*" } else { " " };
        lines.push(format!(
            "{marker} {:<path_width$}  {:<branch_width$}  {:<8}  {}",
            wt.path.display().to_string(),
            wt.branch_label(),
            wt.short_commit(),
            status_label(wt.status)
        ));
    }
    lines
}

/// List all worktrees
pub fn list(repo: &Path, include_main: bool, json: bool) -> Result<()> {
    let (manager, _) = open(repo)?;
    let worktrees = manager.list(include_main)?;

    if json {
        let out = serde_json::to_string_pretty(&worktrees)
            .context("Failed to serialize worktree list")?;
        println!("{out}");
        return Ok(());
    }

    println!("Git worktrees:");
    println!("{}", "─".repeat(57).dimmed());
    if worktrees.is_empty() {
        println!("(no worktrees found)");
        return Ok(());
    }
    for line in render_table(&worktrees) {
        println!("{line}");
    }
    Ok(())
}

/// Show a single worktree
pub fn show(repo: &Path, identifier: String) -> Result<()> {
    let (manager, _) = open(repo)?;
    let worktree = require(&manager, &identifier)?;

    println!("{} {}", "Path:".dimmed(), worktree.path.display());
    println!("{} {}", "Branch:".dimmed(), worktree.branch_label());
    println!("{} {}", "Commit:".dimmed(), worktree.commit);
    println!("{} {}", "Status:".dimmed(), status_label(worktree.status));
    if worktree.is_main {
        println!("{} yes", "Main:".dimmed());
    }
    Ok(())
}

/// Create a worktree at an explicit path
pub fn add(
    repo: &Path,
    path: PathBuf,
    branch: Option<String>,
    new_branch: Option<String>,
    force: bool,
    no_checkout: bool,
) -> Result<()> {
    let (manager, _) = open(repo)?;
    let options = CreateOptions {
        branch,
        new_branch,
        force,
        checkout: !no_checkout,
    };
    let worktree = manager.create(&absolutize(&path)?, &options)?;
    print_created(&worktree);
    Ok(())
}

fn validate_worktree_name(name: &str) -> Result<()> {
    if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
        bail!("Invalid worktree name '{name}': must be a single path component");
    }
    Ok(())
}

/// Create a named worktree under the configured base path on a new
/// prefixed branch
pub fn new(repo: &Path, name: String) -> Result<()> {
    validate_worktree_name(&name)?;
    let (manager, config) = open(repo)?;

    if config.auto_prune {
        for path in manager.prune(false)? {
            println!("  {} Pruned {}", "─".dimmed(), path.display());
        }
    }

    let existing = manager.list(false)?.len();
    if existing >= config.max_worktrees {
        return Err(WorktreeError::WorktreeLimitReached {
            limit: config.max_worktrees,
        }
        .into());
    }

    let path = config.worktree_path(manager.repository().main_root(), &name);
    let options = CreateOptions::new_branch(config.branch_name(&name));
    let worktree = manager.create(&path, &options)?;
    print_created(&worktree);
    Ok(())
}

fn print_created(worktree: &WorktreeInfo) {
    println!(
        "{} Created worktree {} ({})",
        "✓".green().bold(),
        worktree.path.display().to_string().cyan(),
        worktree.branch_label()
    );
}

/// Ask a yes/no question; anything but `y`/`yes` is no
pub fn confirm<R: BufRead, W: Write>(input: &mut R, output: &mut W, prompt: &str) -> Result<bool> {
    write!(output, "{prompt} [y/N] ").context("Failed to write prompt")?;
    output.flush().context("Failed to flush prompt")?;

    let mut answer = String::new();
    input
        .read_line(&mut answer)
        .context("Failed to read confirmation")?;
    Ok(matches!(
        answer.trim().to_ascii_lowercase().as_str(),
        "y" | "yes"
    ))
}

/// Remove a worktree after confirmation
pub fn remove(repo: &Path, identifier: String, force: bool, yes: bool) -> Result<()> {
    let (manager, _) = open(repo)?;
    let worktree = require(&manager, &identifier)?;
    if worktree.is_main {
        return Err(WorktreeError::CannotRemoveMain.into());
    }

    if !yes {
        let prompt = format!("Remove worktree {}?", worktree.path.display());
        let stdin = std::io::stdin();
        let confirmed = confirm(&mut stdin.lock(), &mut std::io::stdout(), &prompt)?;
        if !confirmed {
            println!("Aborted");
            return Ok(());
        }
    }

    manager.remove(&worktree.path.to_string_lossy(), force)?;
    println!(
        "{} Removed worktree: {}",
        "✓".green().bold(),
        worktree.path.display().to_string().dimmed()
    );
    Ok(())
}

/// Print the worktree's path for the caller to `cd` into
pub fn switch(repo: &Path, identifier: String) -> Result<()> {
    let (manager, _) = open(repo)?;
    let path = manager.switch(&resolve_identifier(&manager, &identifier)?)?;
    println!("{}", path.display());
    Ok(())
}

pub fn lock(repo: &Path, identifier: String, reason: Option<String>) -> Result<()> {
    let (manager, _) = open(repo)?;
    let worktree = require(&manager, &identifier)?;
    manager.lock(&worktree.path.to_string_lossy(), reason.as_deref())?;
    println!(
        "{} Locked {}",
        "✓".green().bold(),
        worktree.path.display().to_string().dimmed()
    );
    Ok(())
}

pub fn unlock(repo: &Path, identifier: String) -> Result<()> {
    let (manager, _) = open(repo)?;
    let worktree = require(&manager, &identifier)?;
    manager.unlock(&worktree.path.to_string_lossy())?;
    println!(
        "{} Unlocked {}",
        "✓".green().bold(),
        worktree.path.display().to_string().dimmed()
    );
    Ok(())
}

/// Prune stale worktree entries
pub fn prune(repo: &Path, dry_run: bool) -> Result<()> {
    let (manager, _) = open(repo)?;
    let pruned = manager.prune(dry_run)?;

    if pruned.is_empty() {
        println!("{} Nothing to prune", "✓".green().bold());
        return Ok(());
    }

    let verb = if dry_run { "Would prune" } else { "Pruned" };
    for path in &pruned {
        println!("  {} {}", verb.yellow(), path.display());
    }
    Ok(())
}

/// Repair one worktree's administrative links, or all of them
pub fn repair(repo: &Path, identifier: Option<String>) -> Result<()> {
    let (manager, _) = open(repo)?;
    let identifier = identifier
        .map(|id| resolve_identifier(&manager, &id))
        .transpose()?;
    manager.repair(identifier.as_deref())?;
    println!("{} Repaired worktree links", "✓".green().bold());
    Ok(())
}
