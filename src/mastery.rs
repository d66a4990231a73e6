//! Mastery evaluation
//!
//! Applied every time an attempt is recorded. Two top ratings in a row move a
//! problem out of the in-progress pool and into the mastered pool.

use crate::problems::{Attempt, Pool, ProblemRecord, MAX_RATING};

/// Where an attempt left its problem
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Still in progress, stored under `name`
    InProgress { name: String },
    /// Promoted; stored in the mastered pool under `name`
    Promoted { name: String },
}

impl Outcome {
    pub fn name(&self) -> &str {
        match self {
            Outcome::InProgress { name } | Outcome::Promoted { name } => name,
        }
    }
}

/// The last two attempts are both top ratings
pub fn should_promote(record: &ProblemRecord) -> bool {
    match record.history.as_slice() {
        [.., previous, last] => previous.rating == MAX_RATING && last.rating == MAX_RATING,
        _ => false,
    }
}

/// Append `attempt` to the in-progress record called `name` and promote it if
/// it has earned it.
///
/// The record is created if the name is new. A matching name of any casing
/// reuses the stored key. `external_id`, when given, is set on the record
/// before the attempt is appended. On promotion into a mastered record of the
/// same name, the histories are concatenated.
pub fn apply_attempt(
    in_progress: &mut Pool,
    mastered: &mut Pool,
    name: &str,
    attempt: Attempt,
    external_id: Option<i64>,
) -> Outcome {
    let key = in_progress.canonical_name(name).unwrap_or(name).to_string();
    let mut record = in_progress.get(&key).cloned().unwrap_or_default();

    if external_id.is_some() {
        record.external_id = external_id;
    }
    record.push(attempt);

    if !should_promote(&record) {
        let name = in_progress.insert(&key, record);
        return Outcome::InProgress { name };
    }

    in_progress.remove(&key);
    let name = match mastered.get_mut(&key) {
        Some(existing) => {
            existing.absorb(record);
            mastered.canonical_name(&key).unwrap_or(key.as_str()).to_string()
        }
        None => mastered.insert(&key, record),
    };
    log::info!("Promoted '{}' to mastered", name);
    Outcome::Promoted { name }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn attempt(rating: u8) -> Attempt {
        Attempt::new(rating, date("2024-04-01"))
    }

    #[test]
    fn test_single_five_never_promotes() {
        let mut record = ProblemRecord::new();
        record.push(attempt(5));
        assert!(!should_promote(&record));

        record.push(attempt(4));
        record.push(attempt(5));
        assert!(!should_promote(&record));

        record.push(attempt(5));
        assert!(should_promote(&record));
    }

    #[test]
    fn test_two_fives_promote() {
        let mut in_progress = Pool::new();
        let mut mastered = Pool::new();

        let first = apply_attempt(&mut in_progress, &mut mastered, "Y", attempt(5), None);
        assert_eq!(first, Outcome::InProgress { name: "Y".into() });

        let second = apply_attempt(&mut in_progress, &mut mastered, "y", attempt(5), None);
        assert_eq!(second, Outcome::Promoted { name: "Y".into() });
        assert!(in_progress.is_empty());
        assert_eq!(mastered.get("Y").unwrap().history.len(), 2);
    }

    #[test]
    fn test_promotion_concatenates_existing_history() {
        let mut in_progress = Pool::new();
        let mut mastered = Pool::new();
        let mut old = ProblemRecord::new();
        old.push(Attempt::new(5, date("2023-01-01")));
        old.push(Attempt::new(5, date("2023-01-06")));
        mastered.insert("Jump Game", old);

        apply_attempt(&mut in_progress, &mut mastered, "jump game", attempt(5), Some(55));
        let outcome = apply_attempt(&mut in_progress, &mut mastered, "jump game", attempt(5), None);

        assert_eq!(outcome.name(), "Jump Game");
        let record = mastered.get("Jump Game").unwrap();
        assert_eq!(record.history.len(), 4);
        assert_eq!(record.history[0].date, date("2023-01-01"));
        assert_eq!(record.external_id, Some(55));
        assert!(!in_progress.contains("jump game"));
    }

    #[test]
    fn test_update_sets_external_id_and_keeps_casing() {
        let mut in_progress = Pool::new();
        let mut mastered = Pool::new();

        apply_attempt(&mut in_progress, &mut mastered, "Two Sum", attempt(3), None);
        let outcome = apply_attempt(&mut in_progress, &mut mastered, "TWO SUM", attempt(4), Some(1));

        assert_eq!(outcome, Outcome::InProgress { name: "Two Sum".into() });
        let record = in_progress.get("two sum").unwrap();
        assert_eq!(record.history.len(), 2);
        assert_eq!(record.external_id, Some(1));
    }

    #[test]
    fn test_update_keeps_document_position() {
        let mut in_progress = Pool::new();
        let mut mastered = Pool::new();
        for name in ["first", "second", "third"] {
            apply_attempt(&mut in_progress, &mut mastered, name, attempt(2), None);
        }

        apply_attempt(&mut in_progress, &mut mastered, "first", attempt(3), None);

        let names: Vec<_> = in_progress.names().collect();
        assert_eq!(names, vec!["first", "second", "third"]);
    }
}
