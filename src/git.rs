//! Git repository operations.

use std::path::{Path, PathBuf};

use chrono::{DateTime, FixedOffset};
use tokio::process::Command;
use tracing::debug;

/// `git log` format: full hash, strict ISO 8601 author date, subject.
const LOG_FORMAT: &str = "--format=%H|%aI|%s";

/// A commit as read from `git log`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    pub sha: String,
    pub authored: DateTime<FixedOffset>,
    pub subject: String,
}

impl Commit {
    /// Abbreviated hash for display.
    pub fn short_sha(&self) -> &str {
        &self.sha[..8.min(self.sha.len())]
    }
}

/// A git repository handle that provides common operations.
pub struct Git {
    root: PathBuf,
}

impl Git {
    /// Open the repository containing `path`.
    pub async fn open(path: &Path) -> Result<Self, Error> {
        let output = Command::new("git")
            .args(["rev-parse", "--show-toplevel"])
            .current_dir(path)
            .output()
            .await
            .map_err(|e| Error::Exec(format!("git rev-parse in '{}': {e}", path.display())))?;

        if !output.status.success() {
            return Err(Error::NotARepo(path.display().to_string()));
        }

        let root = String::from_utf8_lossy(&output.stdout).trim().to_string();
        Ok(Self {
            root: PathBuf::from(root),
        })
    }

    /// Get the repository root path.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Check if a branch or ref exists.
    pub async fn ref_exists(&self, refname: &str) -> bool {
        Command::new("git")
            .args(["rev-parse", "--verify", "--quiet", refname])
            .current_dir(&self.root)
            .output()
            .await
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    /// All commits reachable from `branch`, oldest first.
    pub async fn log(&self, branch: &str) -> Result<Vec<Commit>, Error> {
        if !self.ref_exists(branch).await {
            return Err(Error::UnknownRef {
                refname: branch.to_string(),
                repo: self.root.display().to_string(),
            });
        }
        let stdout = self.run_output(&["log", LOG_FORMAT, "--reverse", branch]).await?;
        parse_log(&stdout)
    }

    /// Run a git command and capture its stdout.
    async fn run_output(&self, args: &[&str]) -> Result<String, Error> {
        debug!(repo = %self.root.display(), ?args, "running git");
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.root)
            .output()
            .await
            .map_err(|e| Error::Exec(format!("git {}: {e}", args.first().unwrap_or(&""))))?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).to_string())
        } else {
            Err(Error::Failed {
                command: format!("git {}", args.join(" ")),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }
}

/// Parse the output of `git log --format=%H|%aI|%s`.
///
/// Empty lines are skipped. The subject is everything after the second `|`.
pub fn parse_log(stdout: &str) -> Result<Vec<Commit>, Error> {
    stdout
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(parse_log_line)
        .collect()
}

fn parse_log_line(line: &str) -> Result<Commit, Error> {
    let malformed = |reason: String| Error::MalformedLine {
        line: line.to_string(),
        reason,
    };

    let mut fields = line.splitn(3, '|');
    let (Some(sha), Some(date), Some(subject)) = (fields.next(), fields.next(), fields.next())
    else {
        return Err(malformed("expected `hash|date|subject`".to_string()));
    };

    let authored = DateTime::parse_from_rfc3339(date.trim())
        .map_err(|e| malformed(format!("bad date '{date}': {e}")))?;

    Ok(Commit {
        sha: sha.trim().to_string(),
        authored,
        subject: subject.to_string(),
    })
}

/// Errors from git operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to execute: {0}")]
    Exec(String),

    #[error("not a git repository: '{0}'")]
    NotARepo(String),

    #[error("unknown branch or ref '{refname}' in {repo}")]
    UnknownRef { refname: String, repo: String },

    #[error("{command} failed: {stderr}")]
    Failed { command: String, stderr: String },

    #[error("malformed log line '{line}': {reason}")]
    MalformedLine { line: String, reason: String },
}
