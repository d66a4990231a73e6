//! Retention audits of mastered problems
//!
//! An audit is either idle or pending on exactly one mastered problem. It is
//! started by a random draw when the due list is requested, and resolved by
//! an explicit pass or fail. Failing demotes the problem back to in-progress
//! with a fresh rating of 1.

use std::collections::HashSet;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::problems::{Attempt, Pool, MIN_RATING};
use crate::random::RandomSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditResult {
    Pass,
    Fail,
}

impl fmt::Display for AuditResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuditResult::Pass => write!(f, "pass"),
            AuditResult::Fail => write!(f, "fail"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub date: NaiveDate,
    pub problem: String,
    pub result: AuditResult,
}

/// The audit document: the pending audit, if any, and every resolved one
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuditLog {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_audit: Option<String>,
    #[serde(default)]
    pub history: Vec<AuditEntry>,
}

impl AuditLog {
    pub fn is_pending(&self) -> bool {
        self.current_audit.is_some()
    }

    pub fn start(&mut self, problem: String) {
        log::info!("Audit started on '{}'", problem);
        self.current_audit = Some(problem);
    }

    /// Log the outcome of the pending audit and return to idle.
    ///
    /// Returns the audited problem, or `None` if nothing was pending.
    pub fn resolve(&mut self, date: NaiveDate, result: AuditResult) -> Option<String> {
        let problem = self.current_audit.take()?;
        self.history.push(AuditEntry {
            date,
            problem: problem.clone(),
            result,
        });
        log::info!("Audit on '{}' resolved: {}", problem, result);
        Some(problem)
    }

    /// Merge another log into this one.
    ///
    /// Histories are concatenated and de-duplicated on `(date, problem)`,
    /// keeping the first occurrence. A pending audit in `other` replaces ours.
    pub fn merge(&mut self, other: AuditLog) {
        let mut seen = HashSet::new();
        let combined = std::mem::take(&mut self.history)
            .into_iter()
            .chain(other.history)
            .filter(|entry| seen.insert((entry.date, entry.problem.clone())))
            .collect();
        self.history = combined;

        if other.current_audit.is_some() {
            self.current_audit = other.current_audit;
        }
    }
}

/// Bernoulli draw with probability `p`
pub fn should_trigger(p: f64, rng: &mut dyn RandomSource) -> bool {
    rng.next_f64() < p
}

/// Pick a mastered problem uniformly at random
pub fn sample(mastered: &Pool, rng: &mut dyn RandomSource) -> Option<String> {
    if mastered.is_empty() {
        return None;
    }
    let index = rng.pick_index(mastered.len());
    mastered.names().nth(index).map(str::to_string)
}

/// Move `name` from mastered back to in-progress with a rating-1 attempt dated
/// `today` appended.
///
/// If in-progress already holds the name, the demoted history is appended to
/// that record. Returns the name it is stored under in in-progress, or `None`
/// if mastered does not hold `name`.
pub fn demote(
    in_progress: &mut Pool,
    mastered: &mut Pool,
    name: &str,
    today: NaiveDate,
) -> Option<String> {
    let (key, mut record) = mastered.remove(name)?;
    record.push(Attempt::new(MIN_RATING, today));

    let stored = match in_progress.get_mut(&key) {
        Some(existing) => {
            existing.absorb(record);
            in_progress.canonical_name(&key).unwrap_or(key.as_str()).to_string()
        }
        None => in_progress.insert(&key, record),
    };
    log::info!("Demoted '{}' to in progress", stored);
    Some(stored)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problems::ProblemRecord;
    use crate::random::FixedRandom;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn mastered_record() -> ProblemRecord {
        let mut record = ProblemRecord::new();
        record.push(Attempt::new(5, date("2024-01-01")));
        record.push(Attempt::new(5, date("2024-01-06")));
        record
    }

    #[test]
    fn test_audit_document_shape() {
        let json = r#"{"current_audit":"Two Sum","history":[{"date":"2024-02-01","problem":"LRU Cache","result":"fail"}]}"#;
        let log: AuditLog = serde_json::from_str(json).unwrap();
        assert!(log.is_pending());
        assert_eq!(log.history[0].result, AuditResult::Fail);
        assert_eq!(serde_json::to_string(&log).unwrap(), json);

        let idle = serde_json::to_string(&AuditLog::default()).unwrap();
        assert_eq!(idle, r#"{"history":[]}"#);
    }

    #[test]
    fn test_resolve_clears_and_logs() {
        let mut log = AuditLog::default();
        assert_eq!(log.resolve(date("2024-02-01"), AuditResult::Pass), None);
        assert!(log.history.is_empty());

        log.start("Two Sum".into());
        let problem = log.resolve(date("2024-02-01"), AuditResult::Pass);

        assert_eq!(problem.as_deref(), Some("Two Sum"));
        assert!(!log.is_pending());
        assert_eq!(log.history.len(), 1);
        assert_eq!(log.history[0].result, AuditResult::Pass);
    }

    #[test]
    fn test_trigger_draw() {
        assert!(should_trigger(0.1, &mut FixedRandom::always(0.05)));
        assert!(!should_trigger(0.1, &mut FixedRandom::always(0.1)));
        assert!(!should_trigger(0.0, &mut FixedRandom::always(0.0)));
    }

    #[test]
    fn test_sample() {
        let mut pool = Pool::new();
        assert_eq!(sample(&pool, &mut FixedRandom::new(vec![], 0)), None);

        pool.insert("a", mastered_record());
        pool.insert("b", mastered_record());
        assert_eq!(sample(&pool, &mut FixedRandom::new(vec![], 1)).as_deref(), Some("b"));
    }

    #[test]
    fn test_demote_moves_record_with_failing_attempt() {
        let mut in_progress = Pool::new();
        let mut mastered = Pool::new();
        mastered.insert("Word Break", mastered_record());

        let name = demote(&mut in_progress, &mut mastered, "word break", date("2024-03-01"));

        assert_eq!(name.as_deref(), Some("Word Break"));
        assert!(mastered.is_empty());
        let record = in_progress.get("Word Break").unwrap();
        assert_eq!(record.history.len(), 3);
        assert_eq!(record.history[2], Attempt::new(1, date("2024-03-01")));
    }

    #[test]
    fn test_demote_merges_into_existing_in_progress() {
        let mut in_progress = Pool::new();
        let mut mastered = Pool::new();
        mastered.insert("Word Break", mastered_record());
        let mut practising = ProblemRecord::new();
        practising.push(Attempt::new(3, date("2024-02-20")));
        in_progress.insert("word break", practising);

        let name = demote(&mut in_progress, &mut mastered, "Word Break", date("2024-03-01"));

        assert_eq!(name.as_deref(), Some("word break"));
        assert_eq!(in_progress.get("word break").unwrap().history.len(), 4);
    }

    #[test]
    fn test_demote_missing_is_none() {
        let mut in_progress = Pool::new();
        let mut mastered = Pool::new();
        assert_eq!(demote(&mut in_progress, &mut mastered, "ghost", date("2024-03-01")), None);
    }

    #[test]
    fn test_merge_dedupes_history() {
        let entry = |day: &str, problem: &str, result| AuditEntry {
            date: date(day),
            problem: problem.into(),
            result,
        };
        let mut existing = AuditLog {
            current_audit: Some("mine".into()),
            history: vec![entry("2024-01-01", "a", AuditResult::Pass)],
        };
        let imported = AuditLog {
            current_audit: None,
            history: vec![
                entry("2024-01-01", "a", AuditResult::Fail),
                entry("2024-01-02", "b", AuditResult::Pass),
            ],
        };

        existing.merge(imported);

        assert_eq!(existing.history.len(), 2);
        assert_eq!(existing.history[0].result, AuditResult::Pass);
        assert_eq!(existing.current_audit.as_deref(), Some("mine"));
    }
}
