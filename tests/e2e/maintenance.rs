//! Lock, unlock, prune and repair

use cci::git::worktree::{CreateOptions, WorktreeManager};
use cci::models::WorktreeStatus;
use cci::WorktreeError;
use std::time::Duration;

use super::helpers::{create_temp_git_repo, git};

#[test]
fn test_lock_and_unlock() {
    let repo = create_temp_git_repo().unwrap();
    let manager = WorktreeManager::open(&repo.root).unwrap();
    manager
        .create(&repo.sibling("usb"), &CreateOptions::new_branch("usb"))
        .unwrap();

    manager.lock("usb", Some("on a usb stick")).unwrap();
    let wt = manager.get("usb").unwrap().unwrap();
    assert_eq!(wt.status, WorktreeStatus::Locked);

    let porcelain = git(&repo.root, &["worktree", "list", "--porcelain"]).unwrap();
    assert!(porcelain.contains("locked on a usb stick"));

    manager.unlock("usb").unwrap();
    let wt = manager.get("usb").unwrap().unwrap();
    assert_eq!(wt.status, WorktreeStatus::Active);
}

#[test]
fn test_lock_errors() {
    let repo = create_temp_git_repo().unwrap();
    let manager = WorktreeManager::open(&repo.root).unwrap();
    manager
        .create(&repo.sibling("twice"), &CreateOptions::new_branch("twice"))
        .unwrap();

    let err = manager.lock("missing", None).unwrap_err();
    assert!(matches!(err, WorktreeError::WorktreeNotFound(_)));
    let err = manager.unlock("missing").unwrap_err();
    assert!(matches!(err, WorktreeError::WorktreeNotFound(_)));

    let err = manager.unlock("twice").unwrap_err();
    assert!(matches!(err, WorktreeError::UnlockOperationFailed(_)), "{err:?}");

    manager.lock("twice", None).unwrap();
    let err = manager.lock("twice", None).unwrap_err();
    assert!(matches!(err, WorktreeError::LockOperationFailed(_)), "{err:?}");
}

#[test]
fn test_locking_main_is_left_to_git() {
    let repo = create_temp_git_repo().unwrap();
    let manager = WorktreeManager::open(&repo.root).unwrap();

    // No guard of our own: git's refusal surfaces as a tool failure
    let err = manager.lock("main", None).unwrap_err();
    assert!(matches!(err, WorktreeError::LockOperationFailed(_)), "{err:?}");
}

#[test]
fn test_prune_dry_run_is_non_destructive() {
    let repo = create_temp_git_repo().unwrap();
    let manager = WorktreeManager::open(&repo.root).unwrap();
    let wt = manager
        .create(&repo.sibling("wt1"), &CreateOptions::new_branch("stale"))
        .unwrap();
    std::fs::remove_dir_all(&wt.path).unwrap();

    let stale = manager.get("stale").unwrap().unwrap();
    assert_eq!(stale.status, WorktreeStatus::Prunable);

    let would = manager.prune(true).unwrap();
    assert!(would.iter().any(|p| p.ends_with("wt1")), "{would:?}");
    assert_eq!(manager.list(true).unwrap().len(), 2);

    let pruned = manager.prune(false).unwrap();
    assert!(pruned.iter().any(|p| p.ends_with("wt1")), "{pruned:?}");
    let remaining = manager.list(true).unwrap();
    assert_eq!(remaining.len(), 1);
    assert!(remaining[0].is_main);
}

#[test]
fn test_prune_with_nothing_stale() {
    let repo = create_temp_git_repo().unwrap();
    let manager = WorktreeManager::open(&repo.root).unwrap();
    manager
        .create(&repo.sibling("alive"), &CreateOptions::new_branch("alive"))
        .unwrap();

    assert!(manager.prune(false).unwrap().is_empty());
    assert_eq!(manager.list(true).unwrap().len(), 2);
}

#[test]
fn test_locked_worktree_survives_prune() {
    let repo = create_temp_git_repo().unwrap();
    let manager = WorktreeManager::open(&repo.root).unwrap();
    let wt = manager
        .create(&repo.sibling("kept"), &CreateOptions::new_branch("kept"))
        .unwrap();
    manager.lock("kept", None).unwrap();
    std::fs::remove_dir_all(&wt.path).unwrap();

    assert!(manager.prune(false).unwrap().is_empty());
    let kept = manager.get("kept").unwrap().unwrap();
    assert_eq!(kept.status, WorktreeStatus::Locked);
}

#[test]
fn test_repair_all_and_one() {
    let repo = create_temp_git_repo().unwrap();
    let manager = WorktreeManager::open(&repo.root).unwrap();
    manager
        .create(&repo.sibling("fixme"), &CreateOptions::new_branch("fixme"))
        .unwrap();

    manager.repair(None).unwrap();
    manager.repair(Some("fixme")).unwrap();

    let err = manager.repair(Some("unknown")).unwrap_err();
    assert!(matches!(err, WorktreeError::WorktreeNotFound(_)));
}

#[test]
fn test_repair_after_moving_worktree() {
    let repo = create_temp_git_repo().unwrap();
    let manager = WorktreeManager::open(&repo.root).unwrap();
    let wt = manager
        .create(&repo.sibling("before"), &CreateOptions::new_branch("moved"))
        .unwrap();
    let moved_to = repo.sibling("after");
    std::fs::rename(&wt.path, &moved_to).unwrap();

    // The old entry is stale until repaired from the new location
    assert_eq!(
        manager.get("moved").unwrap().unwrap().status,
        WorktreeStatus::Prunable
    );
    git(&repo.root, &["worktree", "repair", moved_to.to_str().unwrap()]).unwrap();

    let repaired = manager.get("moved").unwrap().unwrap();
    assert!(repaired.path.ends_with("after"));
    assert_eq!(repaired.status, WorktreeStatus::Active);
}

#[test]
fn test_git_timeout_is_reported() {
    let repo = create_temp_git_repo().unwrap();
    let manager = WorktreeManager::open(&repo.root)
        .unwrap()
        .with_timeout(Duration::ZERO);

    let err = manager.list(true).unwrap_err();
    assert!(matches!(err, WorktreeError::Timeout { .. }), "{err:?}");
}
