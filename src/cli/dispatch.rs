use anyhow::{Context, Result};
use cci::commands::worktree_cmd;
use std::path::PathBuf;

use super::types::{Commands, WorktreeCommands};

pub fn dispatch(repo: Option<PathBuf>, command: Commands) -> Result<()> {
    let repo = match repo {
        Some(path) => path,
        None => std::env::current_dir().context("Failed to read current directory")?,
    };

    match command {
        Commands::Worktree { command } => match command {
            WorktreeCommands::List { no_main, json } => worktree_cmd::list(&repo, !no_main, json),
            WorktreeCommands::Show { identifier } => worktree_cmd::show(&repo, identifier),
            WorktreeCommands::Add {
                path,
                branch,
                new_branch,
                force,
                no_checkout,
            } => worktree_cmd::add(&repo, path, branch, new_branch, force, no_checkout),
            WorktreeCommands::New { name } => worktree_cmd::new(&repo, name),
            WorktreeCommands::Remove {
                identifier,
                force,
                yes,
            } => worktree_cmd::remove(&repo, identifier, force, yes),
            WorktreeCommands::Switch { identifier } => worktree_cmd::switch(&repo, identifier),
            WorktreeCommands::Lock { identifier, reason } => {
                worktree_cmd::lock(&repo, identifier, reason)
            }
            WorktreeCommands::Unlock { identifier } => worktree_cmd::unlock(&repo, identifier),
            WorktreeCommands::Prune { dry_run } => worktree_cmd::prune(&repo, dry_run),
            WorktreeCommands::Repair { identifier } => worktree_cmd::repair(&repo, identifier),
        },
    }
}
