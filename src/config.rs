//! Worktree policy configuration
//!
//! Read from the `[worktree]` table of `<repo>/.cci/config.toml`. A missing
//! file or table means defaults; other tables in the file belong to other
//! parts of the application and are ignored here.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Result, WorktreeError};

pub const CONFIG_DIR: &str = ".cci";
pub const CONFIG_FILE: &str = "config.toml";

/// Policy for where and how new worktrees are created
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct WorktreeConfig {
    /// Directory for new worktrees: relative to the repo, `~`-rooted, or
    /// absolute under the home directory
    pub base_path: PathBuf,
    /// Prune stale entries before config-driven creation
    pub auto_prune: bool,
    /// Prefix for branches created by `cci worktree new`
    pub default_branch_prefix: String,
    /// Cap on secondary worktrees for config-driven creation
    pub max_worktrees: usize,
    /// Limit for a single git invocation
    pub command_timeout_secs: u64,
}

impl Default for WorktreeConfig {
    fn default() -> Self {
        Self {
            base_path: PathBuf::from(".cci/worktrees"),
            auto_prune: true,
            default_branch_prefix: "cci/".to_string(),
            max_worktrees: 10,
            command_timeout_secs: 60,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ProjectConfigFile {
    #[serde(default)]
    worktree: WorktreeConfig,
}

impl WorktreeConfig {
    /// Build a validated config
    pub fn new(
        base_path: impl Into<PathBuf>,
        auto_prune: bool,
        default_branch_prefix: impl Into<String>,
        max_worktrees: usize,
    ) -> Result<Self> {
        let config = Self {
            base_path: base_path.into(),
            auto_prune,
            default_branch_prefix: default_branch_prefix.into(),
            max_worktrees,
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Path of the project config file for a repository root
    pub fn config_path(repo_root: &Path) -> PathBuf {
        repo_root.join(CONFIG_DIR).join(CONFIG_FILE)
    }

    /// Load and validate the `[worktree]` table for a repository
    pub fn load(repo_root: &Path) -> Result<Self> {
        let path = Self::config_path(repo_root);
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path).map_err(|e| {
            WorktreeError::InvalidConfig(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate config file content
    pub fn from_toml(content: &str) -> Result<Self> {
        let file: ProjectConfigFile = toml::from_str(content)
            .map_err(|e| WorktreeError::InvalidConfig(format!("failed to parse config: {e}")))?;
        file.worktree.validate()?;
        Ok(file.worktree)
    }

    pub fn validate(&self) -> Result<()> {
        self.validate_with_home(dirs::home_dir().as_deref())
    }

    fn validate_with_home(&self, home: Option<&Path>) -> Result<()> {
        if self.base_path.is_absolute() && !home.is_some_and(|h| self.base_path.starts_with(h)) {
            return Err(WorktreeError::InvalidConfig(format!(
                "base_path must be relative or under home directory: {}",
                self.base_path.display()
            )));
        }
        if self.max_worktrees == 0 {
            return Err(WorktreeError::InvalidConfig(
                "max_worktrees must be at least 1".to_string(),
            ));
        }
        if self.command_timeout_secs == 0 {
            return Err(WorktreeError::InvalidConfig(
                "command_timeout_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.command_timeout_secs)
    }

    /// Absolute directory for new worktrees
    pub fn resolve_base_path(&self, repo_root: &Path) -> PathBuf {
        self.resolve_base_path_with_home(repo_root, dirs::home_dir().as_deref())
    }

    fn resolve_base_path_with_home(&self, repo_root: &Path, home: Option<&Path>) -> PathBuf {
        if let (Ok(rest), Some(home)) = (self.base_path.strip_prefix("~"), home) {
            return home.join(rest);
        }
        if self.base_path.is_absolute() {
            self.base_path.clone()
        } else {
            repo_root.join(&self.base_path)
        }
    }

    /// Location for a named worktree
    pub fn worktree_path(&self, repo_root: &Path, name: &str) -> PathBuf {
        self.resolve_base_path(repo_root).join(name)
    }

    /// Branch for a named worktree
    pub fn branch_name(&self, name: &str) -> String {
        format!("{}{name}", self.default_branch_prefix)
    }
}
