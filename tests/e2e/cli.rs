//! The `cci` binary end to end

use std::path::Path;
use std::process::{Command, Output};

use super::helpers::create_temp_git_repo;

fn cci(repo: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_cci"))
        .arg("-C")
        .arg(repo)
        .args(args)
        .env("NO_COLOR", "1")
        .output()
        .expect("failed to run cci")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_list_json() {
    let repo = create_temp_git_repo().unwrap();
    let output = cci(&repo.root, &["worktree", "list", "--json"]);
    assert!(output.status.success(), "{}", stderr(&output));

    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    let entries = value.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["is_main"], true);
    assert_eq!(entries[0]["branch"], "main");
    assert_eq!(entries[0]["status"], "active");
}

#[test]
fn test_remove_main_exits_with_validation_error() {
    let repo = create_temp_git_repo().unwrap();
    let output = cci(&repo.root, &["worktree", "remove", "main", "--force", "--yes"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Cannot remove the main worktree"));
}

#[test]
fn test_new_uses_config_and_switch_prints_path() {
    let repo = create_temp_git_repo().unwrap();
    let output = cci(&repo.root, &["worktree", "new", "login"]);
    assert!(output.status.success(), "{}", stderr(&output));

    let expected = repo.root.join(".cci/worktrees/login");
    assert!(expected.join("README.md").exists());

    let output = cci(&repo.root, &["worktree", "switch", "cci/login"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(stdout(&output).trim(), expected.display().to_string());
}

#[test]
fn test_new_respects_max_worktrees() {
    let repo = create_temp_git_repo().unwrap();
    std::fs::create_dir_all(repo.root.join(".cci")).unwrap();
    std::fs::write(
        repo.root.join(".cci/config.toml"),
        "[worktree]\nbase_path = \"../trees\"\nmax_worktrees = 1\n",
    )
    .unwrap();

    let output = cci(&repo.root, &["worktree", "new", "one"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(repo.sibling("trees/one").exists());

    let output = cci(&repo.root, &["worktree", "new", "two"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("limit"), "{}", stderr(&output));
}

#[test]
fn test_show_unknown_fails() {
    let repo = create_temp_git_repo().unwrap();
    let output = cci(&repo.root, &["worktree", "show", "nope"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Worktree not found: nope"));
}

#[test]
fn test_lock_unlock_remove_report_resolved_path() {
    let repo = create_temp_git_repo().unwrap();
    let target = repo.root.parent().unwrap().join("feature-wt");
    let output = cci(
        &repo.root,
        &["worktree", "add", target.to_str().unwrap(), "-b", "feature"],
    );
    assert!(output.status.success(), "{}", stderr(&output));
    let shown = target.display().to_string();

    let output = cci(&repo.root, &["worktree", "lock", "feature"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stdout(&output).contains(&format!("Locked {shown}")));

    let output = cci(&repo.root, &["worktree", "unlock", "feature"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stdout(&output).contains(&format!("Unlocked {shown}")));

    let output = cci(&repo.root, &["worktree", "remove", "feature", "--yes"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stdout(&output).contains(&shown));
    assert!(!target.exists());
}
