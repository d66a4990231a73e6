//! Practice activity per calendar day
//!
//! Every recorded attempt counts, in either pool, as does every passed audit.
//! Failed audits are not counted separately; their rating-1 attempt already
//! shows up in the in-progress history.

use std::collections::BTreeMap;

use chrono::{Datelike, Duration, Months, NaiveDate};

use crate::audit::{AuditLog, AuditResult};
use crate::problems::Pool;

pub type DateCounts = BTreeMap<NaiveDate, usize>;

/// Number of months covered when none is given
pub const DEFAULT_MONTHS: u32 = 12;

#[derive(Debug, Clone, PartialEq)]
pub struct ActivitySummary {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub total: usize,
    pub active_days: usize,
    pub average_per_active_day: f64,
    /// Longest run of consecutive active days
    pub best_streak: usize,
    /// Busiest day; the earliest wins a tie
    pub most_active: Option<(NaiveDate, usize)>,
}

pub fn date_counts(in_progress: &Pool, mastered: &Pool, audit: &AuditLog) -> DateCounts {
    let mut counts = DateCounts::new();

    let attempts = mastered
        .records()
        .values()
        .chain(in_progress.records().values())
        .flat_map(|record| record.history.iter());
    for attempt in attempts {
        *counts.entry(attempt.date).or_default() += 1;
    }

    for entry in audit.history.iter().filter(|e| e.result == AuditResult::Pass) {
        *counts.entry(entry.date).or_default() += 1;
    }

    counts
}

/// First day of the window covering `months` calendar months up to `today`
pub fn window_start(today: NaiveDate, months: u32) -> NaiveDate {
    let first_of_month = today.with_day(1).unwrap_or(today);
    first_of_month
        .checked_sub_months(Months::new(months.saturating_sub(1)))
        .unwrap_or(NaiveDate::MIN)
}

/// Summarise activity between [`window_start`] and `today`, inclusive
pub fn summarize(counts: &DateCounts, today: NaiveDate, months: u32) -> ActivitySummary {
    let start = window_start(today, months);
    let window: Vec<(NaiveDate, usize)> = counts
        .range(start..=today)
        .filter(|&(_, &count)| count > 0)
        .map(|(&date, &count)| (date, count))
        .collect();

    let total: usize = window.iter().map(|(_, count)| count).sum();
    let active_days = window.len();
    let average_per_active_day = if active_days > 0 {
        total as f64 / active_days as f64
    } else {
        0.0
    };

    let mut most_active: Option<(NaiveDate, usize)> = None;
    for &(date, count) in &window {
        if most_active.map_or(true, |(_, best)| count > best) {
            most_active = Some((date, count));
        }
    }

    ActivitySummary {
        start,
        end: today,
        total,
        active_days,
        average_per_active_day,
        best_streak: best_streak(window.iter().map(|(date, _)| *date)),
        most_active,
    }
}

fn best_streak(dates: impl Iterator<Item = NaiveDate>) -> usize {
    let mut best = 0;
    let mut current = 0;
    let mut previous: Option<NaiveDate> = None;

    for date in dates {
        current = match previous {
            Some(prev) if date - prev == Duration::days(1) => current + 1,
            _ => 1,
        };
        best = best.max(current);
        previous = Some(date);
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::AuditEntry;
    use crate::problems::{Attempt, ProblemRecord};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn pool(days: &[&str]) -> Pool {
        let mut record = ProblemRecord::new();
        for day in days {
            record.push(Attempt::new(3, date(day)));
        }
        let mut pool = Pool::new();
        pool.insert("p", record);
        pool
    }

    #[test]
    fn test_counts_attempts_and_passed_audits() {
        let in_progress = pool(&["2024-05-01", "2024-05-02"]);
        let mastered = pool(&["2024-05-01"]);
        let audit = AuditLog {
            current_audit: None,
            history: vec![
                AuditEntry {
                    date: date("2024-05-02"),
                    problem: "p".into(),
                    result: AuditResult::Pass,
                },
                AuditEntry {
                    date: date("2024-05-03"),
                    problem: "p".into(),
                    result: AuditResult::Fail,
                },
            ],
        };

        let counts = date_counts(&in_progress, &mastered, &audit);
        assert_eq!(counts[&date("2024-05-01")], 2);
        assert_eq!(counts[&date("2024-05-02")], 2);
        assert!(!counts.contains_key(&date("2024-05-03")));
    }

    #[test]
    fn test_window_start() {
        assert_eq!(window_start(date("2024-05-17"), 1), date("2024-05-01"));
        assert_eq!(window_start(date("2024-05-17"), 12), date("2023-06-01"));
        assert_eq!(window_start(date("2024-05-17"), 0), date("2024-05-01"));
    }

    #[test]
    fn test_summary() {
        let mut counts = DateCounts::new();
        counts.insert(date("2024-03-31"), 9);
        counts.insert(date("2024-04-01"), 1);
        counts.insert(date("2024-04-02"), 3);
        counts.insert(date("2024-04-03"), 1);
        counts.insert(date("2024-04-10"), 3);
        counts.insert(date("2024-04-11"), 1);

        let summary = summarize(&counts, date("2024-04-20"), 1);

        assert_eq!(summary.total, 9);
        assert_eq!(summary.active_days, 5);
        assert!((summary.average_per_active_day - 1.8).abs() < 1e-9);
        assert_eq!(summary.best_streak, 3);
        assert_eq!(summary.most_active, Some((date("2024-04-02"), 3)));
    }

    #[test]
    fn test_empty_summary() {
        let summary = summarize(&DateCounts::new(), date("2024-04-20"), 12);
        assert_eq!(summary.total, 0);
        assert_eq!(summary.best_streak, 0);
        assert_eq!(summary.most_active, None);
    }
}
