//! Even distribution of commits over days.
//!
//! Commits keep their order. Day `d` of `D` receives `C / D` commits, and the
//! first `C % D` days receive one more. Within a day, commit `i` of `n` lands
//! at hour `9 + floor(14 * i / n)` with the minutes staggered by seven, so
//! every new timestamp falls between 09:00 and 23:00.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, TimeZone};

use crate::git::Commit;

/// First hour of the working window.
pub const WINDOW_START_HOUR: u32 = 9;

/// Width of the working window in hours (09:00 to 23:00).
pub const WINDOW_HOURS: u32 = 14;

/// A commit and the date it is moved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub commit: Commit,
    pub redated: DateTime<FixedOffset>,
}

/// Every day from `start` to `end`, both included.
pub fn days_inclusive(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    start.iter_days().take_while(|day| *day <= end).collect()
}

/// How many of `items` each of `buckets` receives, leftovers going to the
/// earliest buckets.
pub fn bucket_sizes(items: usize, buckets: usize) -> Vec<usize> {
    if buckets == 0 {
        return Vec::new();
    }
    let base = items / buckets;
    let extra = items % buckets;
    (0..buckets)
        .map(|i| base + usize::from(i < extra))
        .collect()
}

/// Time of day for the `index`-th of `count` commits on one day.
///
/// Returns `None` unless `index < count`.
pub fn slot_time(index: usize, count: usize) -> Option<NaiveTime> {
    if index >= count {
        return None;
    }
    let hour = WINDOW_START_HOUR + (index * WINDOW_HOURS as usize / count) as u32;
    let minute = ((index * 7) % 60) as u32;
    NaiveTime::from_hms_opt(hour, minute, 0)
}

/// Assign every commit a new date, walking `days` in order.
pub fn redistribute(
    commits: &[Commit],
    days: &[NaiveDate],
    offset: FixedOffset,
) -> Result<Vec<Assignment>, Error> {
    if days.is_empty() && !commits.is_empty() {
        return Err(Error::EmptyRange {
            commits: commits.len(),
        });
    }

    let sizes = bucket_sizes(commits.len(), days.len());
    let mut remaining = commits.iter();
    let mut assignments = Vec::with_capacity(commits.len());

    for (day, &count) in days.iter().zip(&sizes) {
        for (i, commit) in remaining.by_ref().take(count).enumerate() {
            let time = slot_time(i, count).ok_or(Error::SlotOutOfRange { index: i, count })?;
            let local = day.and_time(time);
            let redated = offset
                .from_local_datetime(&local)
                .single()
                .ok_or(Error::Unrepresentable { local })?;
            assignments.push(Assignment {
                commit: commit.clone(),
                redated,
            });
        }
    }

    Ok(assignments)
}

/// Errors from [`redistribute`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("cannot place {commits} commits in an empty date range")]
    EmptyRange { commits: usize },

    #[error("slot {index} is outside a day holding {count} commits")]
    SlotOutOfRange { index: usize, count: usize },

    #[error("local time {local} cannot be represented")]
    Unrepresentable { local: chrono::NaiveDateTime },
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;
    use proptest::prelude::*;
    use std::collections::BTreeMap;

    fn commits(n: usize) -> Vec<Commit> {
        let authored = DateTime::parse_from_rfc3339("2025-11-01T12:00:00+00:00").unwrap();
        (0..n)
            .map(|i| Commit {
                sha: format!("{i:040x}"),
                authored,
                subject: format!("commit {i}"),
            })
            .collect()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn pst() -> FixedOffset {
        FixedOffset::west_opt(8 * 3600).unwrap()
    }

    #[test]
    fn day_range_is_inclusive_and_crosses_years() {
        let days = days_inclusive(date(2025, 12, 23), date(2026, 1, 28));
        assert_eq!(days.len(), 37);
        assert_eq!(days.first(), Some(&date(2025, 12, 23)));
        assert_eq!(days.last(), Some(&date(2026, 1, 28)));
        assert!(days_inclusive(date(2025, 1, 2), date(2025, 1, 1)).is_empty());
    }

    #[test]
    fn leftovers_go_to_the_earliest_days() {
        assert_eq!(bucket_sizes(10, 4), vec![3, 3, 2, 2]);
        assert_eq!(bucket_sizes(3, 5), vec![1, 1, 1, 0, 0]);
        assert_eq!(bucket_sizes(0, 3), vec![0, 0, 0]);
        assert!(bucket_sizes(5, 0).is_empty());
    }

    #[test]
    fn slots_start_at_nine_and_stagger_minutes() {
        assert_eq!(slot_time(0, 1), Some(NaiveTime::from_hms_opt(9, 0, 0).unwrap()));
        assert_eq!(slot_time(1, 2), Some(NaiveTime::from_hms_opt(16, 7, 0).unwrap()));
        assert_eq!(slot_time(9, 10), Some(NaiveTime::from_hms_opt(21, 3, 0).unwrap()));
    }

    #[test]
    fn slot_outside_the_day_is_none() {
        assert_eq!(slot_time(3, 3), None);
        assert_eq!(slot_time(0, 0), None);
    }

    #[test]
    fn keeps_commit_order_and_uses_plan_offset() {
        let input = commits(5);
        let days = days_inclusive(date(2026, 1, 1), date(2026, 1, 2));
        let out = redistribute(&input, &days, pst()).unwrap();

        let shas: Vec<_> = out.iter().map(|a| a.commit.sha.clone()).collect();
        let expected: Vec<_> = input.iter().map(|c| c.sha.clone()).collect();
        assert_eq!(shas, expected);

        // 3 on the first day, 2 on the second.
        let per_day: Vec<_> = out.iter().map(|a| a.redated.date_naive()).collect();
        assert_eq!(
            per_day,
            vec![
                date(2026, 1, 1),
                date(2026, 1, 1),
                date(2026, 1, 1),
                date(2026, 1, 2),
                date(2026, 1, 2)
            ]
        );
        assert_eq!(out[0].redated.to_rfc3339(), "2026-01-01T09:00:00-08:00");
        assert_eq!(out[0].redated.timestamp(), 1767286800);
    }

    #[test]
    fn no_commits_yields_no_assignments() {
        let days = days_inclusive(date(2026, 1, 1), date(2026, 1, 5));
        assert!(redistribute(&[], &days, pst()).unwrap().is_empty());
    }

    #[test]
    fn commits_without_days_are_rejected() {
        let err = redistribute(&commits(2), &[], pst()).unwrap_err();
        assert!(matches!(err, Error::EmptyRange { commits: 2 }));
    }

    proptest! {
        #[test]
        fn bucket_sizes_are_balanced(items in 0usize..5000, buckets in 1usize..400) {
            let sizes = bucket_sizes(items, buckets);
            let base = items / buckets;
            prop_assert_eq!(sizes.len(), buckets);
            prop_assert_eq!(sizes.iter().sum::<usize>(), items);
            prop_assert!(sizes.iter().all(|&s| s == base || s == base + 1));
            prop_assert!(sizes.windows(2).all(|w| w[0] >= w[1]));
        }

        #[test]
        fn slots_stay_inside_the_window(count in 1usize..500, seed in 0usize..500) {
            let index = seed % count;
            let t = slot_time(index, count).unwrap();
            prop_assert!(t.hour() >= WINDOW_START_HOUR);
            prop_assert!(t.hour() < WINDOW_START_HOUR + WINDOW_HOURS);
        }

        #[test]
        fn every_commit_lands_on_a_day_in_range(n in 0usize..300, span in 0u64..60) {
            let start = date(2025, 12, 23);
            let days = days_inclusive(start, start + chrono::Days::new(span));
            let out = redistribute(&commits(n), &days, pst()).unwrap();
            prop_assert_eq!(out.len(), n);

            let mut per_day: BTreeMap<NaiveDate, usize> = BTreeMap::new();
            for a in &out {
                let day = a.redated.date_naive();
                prop_assert!(days.contains(&day));
                prop_assert!((9..23).contains(&a.redated.hour()));
                *per_day.entry(day).or_default() += 1;
            }
            if n >= days.len() {
                prop_assert_eq!(per_day.len(), days.len());
            }
        }
    }
}
