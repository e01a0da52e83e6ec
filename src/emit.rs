//! Output artifacts: the plain mapping and the `git filter-repo` callback.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use chrono::FixedOffset;
use tracing::info;

use crate::redistribute::Assignment;

pub const MAPPING_FILE: &str = "commit-date-mapping.txt";
pub const FILTER_SCRIPT: &str = "rewrite-dates.py";

/// Paths of the files written by [`write_outputs`].
#[derive(Debug, Clone)]
pub struct Outputs {
    pub mapping: PathBuf,
    pub filter_script: PathBuf,
}

/// Git's raw date form: unix seconds and `±hhmm`.
pub fn raw_date(a: &Assignment) -> String {
    format!("{} {}", a.redated.timestamp(), git_offset(*a.redated.offset()))
}

/// `±hhmm` as git writes it.
pub fn git_offset(offset: FixedOffset) -> String {
    let secs = offset.local_minus_utc();
    let sign = if secs < 0 { '-' } else { '+' };
    let secs = secs.abs();
    format!("{sign}{:02}{:02}", secs / 3600, (secs % 3600) / 60)
}

/// One `<sha> <unix-seconds> <±hhmm>` line per assignment.
pub fn mapping_text(assignments: &[Assignment]) -> String {
    let mut out = String::new();
    for a in assignments {
        let _ = writeln!(out, "{} {}", a.commit.sha, raw_date(a));
    }
    out
}

/// Python callback for `git filter-repo` that sets author and committer
/// dates of every mapped commit.
pub fn filter_script(assignments: &[Assignment]) -> String {
    let mut out = String::from(SCRIPT_HEADER);
    for a in assignments {
        let date = raw_date(a);
        let _ = writeln!(
            out,
            "    b\"{}\": (b\"{date}\", b\"{date}\"),",
            a.commit.sha
        );
    }
    out.push_str(SCRIPT_FOOTER);
    out
}

/// Write both artifacts into `dir`, creating it if needed.
///
/// The returned paths are absolute.
pub async fn write_outputs(dir: &Path, assignments: &[Assignment]) -> Result<Outputs, Error> {
    let to_error = |e| Error::Write {
        path: dir.display().to_string(),
        source: e,
    };
    tokio::fs::create_dir_all(dir).await.map_err(to_error)?;
    let dir = tokio::fs::canonicalize(dir).await.map_err(to_error)?;

    let outputs = Outputs {
        mapping: dir.join(MAPPING_FILE),
        filter_script: dir.join(FILTER_SCRIPT),
    };
    write(&outputs.mapping, &mapping_text(assignments)).await?;
    write(&outputs.filter_script, &filter_script(assignments)).await?;
    Ok(outputs)
}

async fn write(path: &Path, content: &str) -> Result<(), Error> {
    tokio::fs::write(path, content)
        .await
        .map_err(|e| Error::Write {
            path: path.display().to_string(),
            source: e,
        })?;
    info!(path = %path.display(), bytes = content.len(), "wrote");
    Ok(())
}

const SCRIPT_HEADER: &str = r#"#!/usr/bin/env python3
"""
git-filter-repo callback to rewrite commit dates.
Generated by redate.

Usage:
  git filter-repo --commit-callback "
  exec(open('scripts/rewrite-dates.py').read())
  process(commit)
  "
"""

# original commit id -> (author date, committer date)
DATE_MAP = {
"#;

const SCRIPT_FOOTER: &str = r#"}

def process(commit):
    sha = commit.original_id
    if sha in DATE_MAP:
        author_date, committer_date = DATE_MAP[sha]
        commit.author_date = author_date
        commit.committer_date = committer_date
"#;

/// Errors writing artifacts.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to write '{path}'")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::Commit;
    use chrono::{DateTime, TimeZone};
    use pretty_assertions::assert_eq;

    fn assignment(sha: &str, redated: &str) -> Assignment {
        Assignment {
            commit: Commit {
                sha: sha.to_string(),
                authored: DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z").unwrap(),
                subject: "s".to_string(),
            },
            redated: DateTime::parse_from_rfc3339(redated).unwrap(),
        }
    }

    #[test]
    fn formats_git_offsets() {
        assert_eq!(git_offset(FixedOffset::west_opt(8 * 3600).unwrap()), "-0800");
        assert_eq!(git_offset(FixedOffset::east_opt(5 * 3600 + 1800).unwrap()), "+0530");
        assert_eq!(git_offset(FixedOffset::east_opt(0).unwrap()), "+0000");
    }

    #[test]
    fn timestamp_and_offset_agree() {
        let pst = FixedOffset::west_opt(8 * 3600).unwrap();
        let local = pst.with_ymd_and_hms(2026, 1, 1, 9, 0, 0).unwrap();
        let a = Assignment {
            redated: local,
            ..assignment("abc", "2026-01-01T00:00:00Z")
        };
        assert_eq!(raw_date(&a), "1767286800 -0800");
    }

    #[test]
    fn mapping_has_one_line_per_commit() {
        let text = mapping_text(&[
            assignment("aaa", "2026-01-01T09:00:00-08:00"),
            assignment("bbb", "2026-01-01T16:07:00-08:00"),
        ]);
        assert_eq!(text, "aaa 1767286800 -0800\nbbb 1767312420 -0800\n");
    }

    #[test]
    fn script_maps_author_and_committer_dates() {
        let script = filter_script(&[assignment("aaa", "2026-01-01T09:00:00-08:00")]);
        assert!(script.starts_with("#!/usr/bin/env python3\n"));
        assert!(script.contains("DATE_MAP = {\n    b\"aaa\": (b\"1767286800 -0800\", b\"1767286800 -0800\"),\n}\n"));
        assert!(script.contains("def process(commit):"));
        assert!(script.contains("commit.committer_date = committer_date"));
    }

    #[tokio::test]
    async fn writes_both_files_into_a_new_directory() {
        let tmp = assert_fs::TempDir::new().unwrap();
        let dir = tmp.path().join("nested").join("scripts");
        let outputs = write_outputs(&dir, &[assignment("aaa", "2026-01-01T09:00:00-08:00")])
            .await
            .unwrap();

        let mapping = std::fs::read_to_string(&outputs.mapping).unwrap();
        assert_eq!(mapping, "aaa 1767286800 -0800\n");
        assert!(outputs.filter_script.ends_with(FILTER_SCRIPT));
        assert!(outputs.filter_script.exists());
        assert!(outputs.mapping.is_absolute());
    }
}
