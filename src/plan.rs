//! Redistribution plan.
//!
//! A plan is a TOML file naming the branches whose commits should be spread
//! out, the inclusive date range to spread them over, and where to write the
//! generated files.

use std::path::{Path, PathBuf};

use chrono::{FixedOffset, NaiveDate};
use serde::Deserialize;

use crate::redistribute::days_inclusive;

/// Offset used when the plan does not name one.
pub const DEFAULT_TIMEZONE: &str = "-08:00";

/// The complete redistribution plan.
#[derive(Debug, Clone, Deserialize)]
pub struct Plan {
    /// First day of the range (inclusive)
    pub start: NaiveDate,

    /// Last day of the range (inclusive)
    pub end: NaiveDate,

    /// UTC offset the new dates are expressed in, e.g. `-08:00`
    #[serde(default = "default_timezone")]
    pub timezone: String,

    /// Directory receiving the mapping and the filter script
    #[serde(default)]
    pub output_dir: Option<PathBuf>,

    /// Branches to read, in the order their commits are laid out
    #[serde(rename = "source", default)]
    pub sources: Vec<Source>,
}

/// One branch of one repository.
#[derive(Debug, Clone, Deserialize)]
pub struct Source {
    /// Display name; defaults to the repository directory name
    #[serde(default)]
    pub name: Option<String>,

    /// Path to the repository (or any directory inside it)
    pub path: PathBuf,

    /// Branch or ref whose history is read
    pub branch: String,
}

fn default_timezone() -> String {
    DEFAULT_TIMEZONE.to_string()
}

impl Plan {
    /// Parse a plan from TOML content.
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Read, validate and anchor a plan file.
    ///
    /// Relative source paths and a relative `output_dir` are resolved against
    /// the absolute directory containing the plan file.
    pub async fn load(path: &Path) -> Result<Self, Error> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| Error::Read {
                path: path.display().to_string(),
                source: e,
            })?;
        let mut plan = Self::from_toml(&content)?;
        plan.validate()?;

        let base = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        let base = tokio::fs::canonicalize(base)
            .await
            .map_err(|e| Error::Read {
                path: base.display().to_string(),
                source: e,
            })?;
        plan.anchor(&base);
        Ok(plan)
    }

    /// Check the plan for problems that would make a run meaningless.
    pub fn validate(&self) -> Result<(), Error> {
        if self.sources.is_empty() {
            return Err(Error::NoSources);
        }
        if self.end < self.start {
            return Err(Error::InvertedRange {
                start: self.start,
                end: self.end,
            });
        }
        self.offset()?;
        Ok(())
    }

    /// Resolve relative paths against `base`.
    pub fn anchor(&mut self, base: &Path) {
        for source in &mut self.sources {
            if source.path.is_relative() {
                source.path = base.join(&source.path);
            }
        }
        if let Some(dir) = &mut self.output_dir {
            if dir.is_relative() {
                *dir = base.join(&*dir);
            }
        }
    }

    /// The configured UTC offset.
    pub fn offset(&self) -> Result<FixedOffset, Error> {
        parse_offset(&self.timezone)
    }

    /// Every day in the range, in order.
    pub fn days(&self) -> Vec<NaiveDate> {
        days_inclusive(self.start, self.end)
    }

    /// Where output goes when no override is given: `output_dir`, or the
    /// `scripts` directory of the last source.
    pub fn default_output_dir(&self) -> PathBuf {
        match (&self.output_dir, self.sources.last()) {
            (Some(dir), _) => dir.clone(),
            (None, Some(last)) => last.path.join("scripts"),
            (None, None) => PathBuf::from("scripts"),
        }
    }
}

impl Source {
    /// Name used in progress output.
    pub fn display_name(&self) -> String {
        if let Some(name) = &self.name {
            return name.clone();
        }
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// Parse `±HH:MM` or `±HHMM` into an offset.
pub fn parse_offset(text: &str) -> Result<FixedOffset, Error> {
    let invalid = || Error::InvalidTimezone(text.to_string());

    let text = text.trim();
    let (sign, rest) = match text.as_bytes().first() {
        Some(b'+') => (1, &text[1..]),
        Some(b'-') => (-1, &text[1..]),
        _ => return Err(invalid()),
    };
    let digits = match rest.len() {
        4 => rest.to_string(),
        5 if rest.as_bytes()[2] == b':' => format!("{}{}", &rest[..2], &rest[3..]),
        _ => return Err(invalid()),
    };
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }

    let hours: i32 = digits[..2].parse().map_err(|_| invalid())?;
    let minutes: i32 = digits[2..].parse().map_err(|_| invalid())?;
    if minutes >= 60 {
        return Err(invalid());
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(invalid)
}

/// An annotated example plan.
#[must_use]
pub fn template() -> &'static str {
    include_str!("plan.toml")
}

/// Errors from loading a plan.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read plan file '{path}'")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse plan file")]
    Parse(#[from] toml::de::Error),

    #[error("plan names no sources; add at least one [[source]] table")]
    NoSources,

    #[error("date range ends ({end}) before it starts ({start})")]
    InvertedRange { start: NaiveDate, end: NaiveDate },

    #[error("invalid timezone '{0}', expected an offset like -08:00")]
    InvalidTimezone(String),
}
