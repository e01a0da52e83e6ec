#![allow(dead_code)]

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use assert_fs::TempDir;
use rstest::fixture;
use std::path::{Path, PathBuf};

#[fixture]
pub fn workspace() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

pub fn redate() -> Command {
    let mut cmd = cargo_bin_cmd!("redate");
    cmd.env_remove("RUST_LOG");
    cmd
}

/// Run git in `dir` with a fixed identity, panicking on failure.
pub fn git(dir: &Path, args: &[&str], date: Option<&str>) -> String {
    let mut cmd = std::process::Command::new("git");
    cmd.args(["-c", "user.name=Test", "-c", "user.email=test@example.com"])
        .args(args)
        .current_dir(dir);
    if let Some(date) = date {
        cmd.env("GIT_AUTHOR_DATE", date).env("GIT_COMMITTER_DATE", date);
    }
    let output = cmd.output().expect("Failed to run git");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Create a repository at `root/name` with `count` empty commits on `branch`.
pub fn repo_with_commits(root: &Path, name: &str, branch: &str, count: usize) -> PathBuf {
    let dir = root.join(name);
    std::fs::create_dir_all(&dir).expect("Failed to create repo dir");
    git(&dir, &["init", "-q"], None);
    git(&dir, &["symbolic-ref", "HEAD", &format!("refs/heads/{branch}")], None);
    for i in 0..count {
        let date = format!("2025-11-{:02}T10:00:00+00:00", i + 1);
        git(
            &dir,
            &["commit", "-q", "--allow-empty", "-m", &format!("{name} change {i} | part")],
            Some(&date),
        );
    }
    dir
}

/// All commit hashes on `branch`, oldest first.
pub fn shas(dir: &Path, branch: &str) -> Vec<String> {
    git(dir, &["rev-list", "--reverse", branch], None)
        .lines()
        .map(str::to_string)
        .collect()
}

pub fn write_plan(dir: &Path, body: &str) -> PathBuf {
    let path = dir.join("plan.toml");
    std::fs::write(&path, body).expect("Failed to write plan");
    path
}
