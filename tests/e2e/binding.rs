//! Repository binding against real repositories

use cci::git::worktree::{CreateOptions, Repository, WorktreeManager};
use cci::WorktreeError;

use super::helpers::{create_bare_repo, create_temp_git_repo, git};

#[test]
fn test_bind_main_checkout() {
    let repo = create_temp_git_repo().unwrap();
    let bound = Repository::open(&repo.root).unwrap();

    assert_eq!(bound.path(), repo.root);
    assert_eq!(bound.work_tree(), repo.root);
    assert_eq!(bound.git_dir(), repo.root.join(".git"));
    assert_eq!(bound.common_dir(), bound.git_dir());
    assert_eq!(bound.main_root(), repo.root);
    assert!(!bound.is_linked_worktree());
}

#[test]
fn test_bind_from_subdirectory() {
    let repo = create_temp_git_repo().unwrap();
    let sub = repo.root.join("src/deep");
    std::fs::create_dir_all(&sub).unwrap();

    let bound = Repository::open(&sub).unwrap();
    assert_eq!(bound.path(), sub);
    assert_eq!(bound.work_tree(), repo.root);
    assert_eq!(bound.main_root(), repo.root);
}

#[test]
fn test_bind_from_secondary_worktree_sees_common_dir() {
    let repo = create_temp_git_repo().unwrap();
    let manager = WorktreeManager::open(&repo.root).unwrap();
    let wt = manager
        .create(&repo.sibling("wt1"), &CreateOptions::new_branch("feature"))
        .unwrap();

    let bound = Repository::open(&wt.path).unwrap();
    assert!(bound.is_linked_worktree());
    assert_eq!(bound.common_dir(), repo.root.join(".git"));
    assert_ne!(bound.git_dir(), bound.common_dir());
    assert_eq!(bound.main_root(), repo.root);

    // Listing from the secondary binding still sees every worktree and
    // still flags the real main checkout.
    let from_wt = WorktreeManager::from_repository(bound);
    let worktrees = from_wt.list(true).unwrap();
    assert_eq!(worktrees.len(), 2);
    let mains: Vec<_> = worktrees.iter().filter(|w| w.is_main).collect();
    assert_eq!(mains.len(), 1);
    assert_eq!(mains[0].branch.as_deref(), Some("main"));
}

#[test]
fn test_separate_git_dir_flags_real_main_from_secondary() {
    let temp = tempfile::TempDir::new().unwrap();
    let base = temp.path().canonicalize().unwrap();
    let root = base.join("repo");
    let store = base.join("store.git");
    git(
        &base,
        &[
            "init",
            "--quiet",
            "--separate-git-dir",
            store.to_str().unwrap(),
            "repo",
        ],
    )
    .unwrap();
    git(&root, &["symbolic-ref", "HEAD", "refs/heads/main"]).unwrap();
    git(&root, &["config", "user.email", "test@test.com"]).unwrap();
    git(&root, &["config", "user.name", "Test User"]).unwrap();
    git(&root, &["config", "commit.gpgsign", "false"]).unwrap();
    std::fs::write(root.join("README.md"), "# Separate\n").unwrap();
    git(&root, &["add", "."]).unwrap();
    git(&root, &["commit", "--quiet", "-m", "Initial commit"]).unwrap();

    let manager = WorktreeManager::open(&root).unwrap();
    assert_eq!(manager.repository().main_root(), root);
    let wt = manager
        .create(&base.join("wt1"), &CreateOptions::new_branch("feature"))
        .unwrap();
    assert!(!wt.is_main);

    let bound = Repository::open(&wt.path).unwrap();
    assert_eq!(bound.common_dir(), store);
    assert_eq!(bound.main_root(), root);

    let worktrees = WorktreeManager::from_repository(bound).list(true).unwrap();
    let mains: Vec<_> = worktrees.iter().filter(|w| w.is_main).collect();
    assert_eq!(mains.len(), 1);
    assert_eq!(mains[0].path, root);
}

#[test]
fn test_bare_repository_is_unsupported() {
    let (_temp, bare) = create_bare_repo().unwrap();
    let err = Repository::open(&bare).unwrap_err();
    assert!(
        matches!(err, WorktreeError::UnsupportedRepository(_)),
        "unexpected error: {err:?}"
    );
}

#[test]
fn test_plain_directory_is_invalid() {
    let temp = tempfile::TempDir::new().unwrap();
    let err = WorktreeManager::open(temp.path()).unwrap_err();
    assert!(matches!(err, WorktreeError::InvalidRepository(_)));
    assert!(err.is_validation());
}
