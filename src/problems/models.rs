//! Data models for problems and attempts

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Lowest accepted rating
pub const MIN_RATING: u8 = 1;

/// Highest accepted rating; two in a row promote a problem to mastered
pub const MAX_RATING: u8 = 5;

/// A single recorded practice session
///
/// Ratings run from 1 (could not solve it) to 5 (solved it cold). The rating is
/// also the number of days until the problem comes up for review again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attempt {
    pub rating: u8,
    pub date: NaiveDate,
    /// Note about the solution or approach
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// What went wrong or what to watch out for
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mistake: Option<String>,
    /// Minutes spent on the attempt
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_spent: Option<u32>,
}

impl Attempt {
    pub fn new(rating: u8, date: NaiveDate) -> Self {
        Self {
            rating,
            date,
            note: None,
            mistake: None,
            time_spent: None,
        }
    }

    pub fn is_valid_rating(rating: u8) -> bool {
        (MIN_RATING..=MAX_RATING).contains(&rating)
    }

    /// Whether the attempt carries a note or a mistake
    pub fn has_notes(&self) -> bool {
        self.note.is_some() || self.mistake.is_some()
    }
}

/// A problem and everything recorded about it
///
/// `history` is append-only and kept in chronological (insertion) order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemRecord {
    #[serde(default)]
    pub history: Vec<Attempt>,
    /// Catalog identifier, e.g. a LeetCode problem number
    #[serde(rename = "leetcode_id", default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<i64>,
}

impl ProblemRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_attempt(&self) -> Option<&Attempt> {
        self.history.last()
    }

    pub fn push(&mut self, attempt: Attempt) {
        self.history.push(attempt);
    }

    /// Concatenate another record's history onto this one.
    ///
    /// The external ID is kept if already set, otherwise taken from `other`.
    pub fn absorb(&mut self, other: ProblemRecord) {
        self.history.extend(other.history);
        if self.external_id.is_none() {
            self.external_id = other.external_id;
        }
    }

    pub fn average_rating(&self) -> Option<f64> {
        if self.history.is_empty() {
            return None;
        }
        let total: u32 = self.history.iter().map(|a| a.rating as u32).sum();
        Some(total as f64 / self.history.len() as f64)
    }
}

/// Which pool a record lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoolKind {
    InProgress,
    Mastered,
}

impl fmt::Display for PoolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PoolKind::InProgress => write!(f, "In Progress"),
            PoolKind::Mastered => write!(f, "Mastered"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_attempt_json_omits_missing_fields() {
        let attempt = Attempt::new(3, date("2024-03-01"));
        let json = serde_json::to_string(&attempt).unwrap();
        assert_eq!(json, r#"{"rating":3,"date":"2024-03-01"}"#);
    }

    #[test]
    fn test_record_uses_leetcode_id_key() {
        let json = r#"{"history":[{"rating":5,"date":"2024-03-01","note":"two pointers"}],"leetcode_id":167}"#;
        let record: ProblemRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.external_id, Some(167));
        assert_eq!(record.history[0].note.as_deref(), Some("two pointers"));
        assert_eq!(serde_json::to_string(&record).unwrap(), json);
    }

    #[test]
    fn test_record_without_history_defaults_empty() {
        let record: ProblemRecord = serde_json::from_str("{}").unwrap();
        assert!(record.history.is_empty());
        assert!(record.last_attempt().is_none());
        assert!(record.average_rating().is_none());
    }

    #[test]
    fn test_absorb_keeps_order_and_existing_id() {
        let mut mastered = ProblemRecord {
            history: vec![Attempt::new(5, date("2024-01-01"))],
            external_id: Some(1),
        };
        let progress = ProblemRecord {
            history: vec![
                Attempt::new(5, date("2024-02-01")),
                Attempt::new(5, date("2024-02-06")),
            ],
            external_id: Some(2),
        };

        mastered.absorb(progress);

        assert_eq!(mastered.history.len(), 3);
        assert_eq!(mastered.history[2].date, date("2024-02-06"));
        assert_eq!(mastered.external_id, Some(1));
    }

    #[test]
    fn test_rating_bounds() {
        assert!(!Attempt::is_valid_rating(0));
        assert!(Attempt::is_valid_rating(1));
        assert!(Attempt::is_valid_rating(5));
        assert!(!Attempt::is_valid_rating(6));
    }
}
