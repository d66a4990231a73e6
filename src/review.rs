//! Review scheduling
//!
//! The interval is the rating itself, read as a number of days:
//! - 1: review tomorrow
//! - 3: review in three days
//! - 5: review in five days (and a second 5 in a row means mastered)
//!
//! A problem is due once its due date is today or earlier. Due problems are
//! ranked most-overdue first; when nothing is due the next-up queue is used
//! as a fallback.

use std::cmp::Reverse;

use chrono::{Duration, NaiveDate};
use indexmap::IndexMap;

use crate::problems::{NextUp, Pool, ProblemRecord, MAX_RATING};

/// Number of next-up names returned when nothing is due and no limit is given
pub const DEFAULT_FALLBACK_LIMIT: usize = 3;

/// Days overdue at which a problem is flagged as a warning
pub const WARNING_OVERDUE_DAYS: i64 = 3;

/// Days overdue at which a problem is flagged as critical
pub const CRITICAL_OVERDUE_DAYS: i64 = 7;

/// A due in-progress problem and the facts it was ranked on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DueProblem {
    pub name: String,
    pub last_attempt_date: NaiveDate,
    pub last_rating: u8,
    pub days_overdue: i64,
    pub external_id: Option<i64>,
}

impl DueProblem {
    /// Another top rating would promote this problem
    pub fn is_mastery_candidate(&self) -> bool {
        self.last_rating == MAX_RATING
    }

    pub fn overdue_tier(&self) -> Option<OverdueTier> {
        OverdueTier::classify(self.days_overdue)
    }
}

/// The problems to practice in a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DueList {
    /// Due problems in ranked order
    Scheduled(Vec<DueProblem>),
    /// Nothing was due; the front of the next-up queue
    NextUp(Vec<String>),
}

impl DueList {
    /// Problem names in display order
    pub fn names(&self) -> Vec<String> {
        match self {
            DueList::Scheduled(due) => due.iter().map(|p| p.name.clone()).collect(),
            DueList::NextUp(names) => names.clone(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            DueList::Scheduled(due) => due.len(),
            DueList::NextUp(names) => names.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 1-based lookup, as shown to the user
    pub fn nth(&self, position: usize) -> Option<String> {
        let index = position.checked_sub(1)?;
        match self {
            DueList::Scheduled(due) => due.get(index).map(|p| p.name.clone()),
            DueList::NextUp(names) => names.get(index).cloned(),
        }
    }
}

/// Presentation bucket for how far behind a problem is
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum OverdueTier {
    /// 3 to 6 days overdue
    Warning,
    /// 7 or more days overdue
    Critical,
}

impl OverdueTier {
    pub fn classify(days_overdue: i64) -> Option<Self> {
        if days_overdue >= CRITICAL_OVERDUE_DAYS {
            Some(OverdueTier::Critical)
        } else if days_overdue >= WARNING_OVERDUE_DAYS {
            Some(OverdueTier::Warning)
        } else {
            None
        }
    }
}

/// Date the record next comes up, or `None` if it has never been attempted
pub fn due_date(record: &ProblemRecord) -> Option<NaiveDate> {
    let last = record.last_attempt()?;
    Some(last.date + Duration::days(i64::from(last.rating)))
}

/// Days past the due date, or `None` if the record is not due yet
pub fn days_overdue(record: &ProblemRecord, today: NaiveDate) -> Option<i64> {
    let due = due_date(record)?;
    if due <= today {
        Some((today - due).num_days())
    } else {
        None
    }
}

/// Whether the last attempt was a top rating
pub fn is_mastery_candidate(record: &ProblemRecord) -> bool {
    record
        .last_attempt()
        .is_some_and(|attempt| attempt.rating == MAX_RATING)
}

/// Every due problem in the pool, ranked.
///
/// Order: most days overdue first, then older last attempt, then lower last
/// rating. Ties beyond that keep document order.
pub fn scheduled(pool: &Pool, today: NaiveDate) -> Vec<DueProblem> {
    let mut due: Vec<DueProblem> = pool
        .iter()
        .filter_map(|(name, record)| {
            let last = record.last_attempt()?;
            let days_overdue = days_overdue(record, today)?;
            Some(DueProblem {
                name: name.clone(),
                last_attempt_date: last.date,
                last_rating: last.rating,
                days_overdue,
                external_id: record.external_id,
            })
        })
        .collect();

    due.sort_by_key(|p| (Reverse(p.days_overdue), p.last_attempt_date, p.last_rating));
    due
}

/// The due list for a session.
///
/// A limit of `None` (or zero) means no truncation for scheduled problems and
/// [`DEFAULT_FALLBACK_LIMIT`] for the next-up fallback.
pub fn due_list(pool: &Pool, next_up: &NextUp, today: NaiveDate, limit: Option<usize>) -> DueList {
    let limit = limit.filter(|&n| n > 0);
    let mut due = scheduled(pool, today);

    if due.is_empty() {
        let names = next_up.front(limit.unwrap_or(DEFAULT_FALLBACK_LIMIT));
        log::debug!("Nothing due on {}, {} next-up fallback(s)", today, names.len());
        return DueList::NextUp(names);
    }

    if let Some(limit) = limit {
        due.truncate(limit);
    }
    log::debug!("{} problem(s) due on {}", due.len(), today);
    DueList::Scheduled(due)
}

/// Days overdue for every due problem, in document order
pub fn overdue_info(pool: &Pool, today: NaiveDate) -> IndexMap<String, i64> {
    pool.iter()
        .filter_map(|(name, record)| Some((name.clone(), days_overdue(record, today)?)))
        .collect()
}

/// Names of in-progress problems whose last rating was the top one
pub fn mastery_candidates(pool: &Pool) -> Vec<String> {
    pool.iter()
        .filter(|(_, record)| is_mastery_candidate(record))
        .map(|(name, _)| name.clone())
        .collect()
}
