//! End-to-end tests for the non-interactive CLI paths.
//!
//! Interactive workflows (`setup`, `repo` prompts) are covered by the
//! workflow unit tests with a scripted prompter; here we only exercise
//! paths that complete without a terminal.

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn hubgate(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("hubgate").unwrap();
    cmd.env("HOME", home.path());
    cmd
}

#[test]
fn list_on_empty_registry_succeeds() {
    let home = TempDir::new().unwrap();
    hubgate(&home)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("no accounts configured"));
}

#[test]
fn list_shows_seeded_accounts() {
    let home = TempDir::new().unwrap();
    let github_dir = home.path().join(".ssh/github");
    fs::create_dir_all(&github_dir).unwrap();
    fs::write(
        github_dir.join("accounts.json"),
        r#"[{
            "account": "work",
            "email": "dev@example.com",
            "private_key": "/keys/github_work",
            "public_key": "/keys/github_work.pub",
            "created_at": "2026-01-05",
            "last_used": "2026-01-05"
        }]"#,
    )
    .unwrap();

    hubgate(&home)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("work"))
        .stdout(predicate::str::contains("dev@example.com"));
}

#[test]
fn remove_unknown_alias_exits_nonzero() {
    let home = TempDir::new().unwrap();
    hubgate(&home)
        .args(["remove", "ghost"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn corrupt_registry_is_fatal() {
    let home = TempDir::new().unwrap();
    let github_dir = home.path().join(".ssh/github");
    fs::create_dir_all(&github_dir).unwrap();
    fs::write(github_dir.join("accounts.json"), "{definitely not json").unwrap();

    hubgate(&home)
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("corrupt"));
}

#[test]
fn repo_against_missing_directory_exits_nonzero() {
    let home = TempDir::new().unwrap();
    hubgate(&home)
        .args(["repo", "/definitely/not/a/dir"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("directory not found"));
}

#[test]
fn help_and_version_succeed() {
    let home = TempDir::new().unwrap();
    hubgate(&home).arg("--help").assert().success();
    hubgate(&home).arg("--version").assert().success();
}
