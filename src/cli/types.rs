use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cci")]
#[command(about = "Git worktree-first project browser", long_about = None)]
#[command(version)]
#[command(subcommand_help_heading = "Commands")]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Repository to operate on (defaults to the current directory)
    #[arg(short = 'C', long = "repo", global = true, value_name = "PATH")]
    pub repo: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage git worktrees
    Worktree {
        #[command(subcommand)]
        command: WorktreeCommands,
    },
}

#[derive(Subcommand)]
pub enum WorktreeCommands {
    /// List all worktrees
    List {
        /// Leave the main worktree out
        #[arg(long)]
        no_main: bool,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show one worktree by path or branch
    Show {
        identifier: String,
    },

    /// Create a worktree at a path
    ///
    /// Without --branch or --new-branch the worktree starts in detached HEAD
    /// at the current commit.
    Add {
        path: PathBuf,

        /// Existing branch to check out (start point when used with --new-branch)
        #[arg(long)]
        branch: Option<String>,

        /// Create and check out a new branch
        #[arg(short = 'b', long)]
        new_branch: Option<String>,

        /// Let git reuse an existing path
        #[arg(short, long)]
        force: bool,

        /// Create the worktree without checking out files
        #[arg(long)]
        no_checkout: bool,
    },

    /// Create a named worktree under the configured base path
    New {
        name: String,
    },

    /// Remove a worktree (never the main one)
    Remove {
        identifier: String,

        /// Remove even with uncommitted changes
        #[arg(short, long)]
        force: bool,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Print the path of a worktree
    Switch {
        identifier: String,
    },

    /// Lock a worktree against pruning
    Lock {
        identifier: String,

        /// Why the worktree is locked
        #[arg(long)]
        reason: Option<String>,
    },

    /// Unlock a worktree
    Unlock {
        identifier: String,
    },

    /// Prune stale worktree entries
    Prune {
        /// Only report what would be pruned
        #[arg(short = 'n', long)]
        dry_run: bool,
    },

    /// Repair worktree administrative links after moves
    Repair {
        /// Worktree to repair (all when omitted)
        identifier: Option<String>,
    },
}
