//! Summaries printed after redistributing.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as _;

use chrono::NaiveDate;

use crate::redistribute::Assignment;

/// Assignments shown at each end of the sample.
const SAMPLE_EDGE: usize = 10;

/// Subject characters shown per sample line.
const SUBJECT_WIDTH: usize = 40;

/// Coverage and spread of one redistribution.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub commits: usize,
    pub days: usize,
    /// Days in the range that received no commit, in order.
    pub missing: Vec<NaiveDate>,
    /// Fewest commits on a used day.
    pub min_per_day: Option<usize>,
    /// Most commits on a used day.
    pub max_per_day: Option<usize>,
}

impl Summary {
    pub fn new(assignments: &[Assignment], days: &[NaiveDate]) -> Self {
        let mut per_day: BTreeMap<NaiveDate, usize> = BTreeMap::new();
        for a in assignments {
            *per_day.entry(a.redated.date_naive()).or_default() += 1;
        }

        let range: BTreeSet<NaiveDate> = days.iter().copied().collect();
        let missing = range
            .into_iter()
            .filter(|day| !per_day.contains_key(day))
            .collect();

        Self {
            commits: assignments.len(),
            days: days.len(),
            missing,
            min_per_day: per_day.values().copied().min(),
            max_per_day: per_day.values().copied().max(),
        }
    }

    pub fn average_per_day(&self) -> f64 {
        if self.days == 0 {
            0.0
        } else {
            self.commits as f64 / self.days as f64
        }
    }

    /// `✓ All N days covered!` or the list of missing days.
    pub fn coverage_line(&self) -> String {
        if self.missing.is_empty() {
            format!("✓ All {} days covered!", self.days)
        } else {
            let days: Vec<String> = self.missing.iter().map(|d| d.to_string()).collect();
            format!("WARNING: Missing days: [{}]", days.join(", "))
        }
    }

    /// `Commits per day: min=.., max=..`, if any commit was placed.
    pub fn spread_line(&self) -> Option<String> {
        match (self.min_per_day, self.max_per_day) {
            (Some(min), Some(max)) => Some(format!("Commits per day: min={min}, max={max}")),
            _ => None,
        }
    }
}

/// One sample line: short hash, old date, new date and truncated subject.
pub fn sample_line(a: &Assignment) -> String {
    let subject: String = a.commit.subject.chars().take(SUBJECT_WIDTH).collect();
    format!(
        "  {} {} → {} | {}",
        a.commit.short_sha(),
        a.commit.authored.date_naive(),
        a.redated.date_naive(),
        subject
    )
}

/// The first and last few assignments, one per line.
pub fn sample(assignments: &[Assignment]) -> String {
    let mut out = String::new();
    if assignments.len() <= 2 * SAMPLE_EDGE {
        for a in assignments {
            let _ = writeln!(out, "{}", sample_line(a));
        }
        return out;
    }

    for a in &assignments[..SAMPLE_EDGE] {
        let _ = writeln!(out, "{}", sample_line(a));
    }
    out.push_str("  ...\n");
    for a in &assignments[assignments.len() - SAMPLE_EDGE..] {
        let _ = writeln!(out, "{}", sample_line(a));
    }
    out
}
