//! Keyed problem collections with case-insensitive lookup
//!
//! Names are unique within a pool regardless of case. The stored key keeps the
//! casing of the first write; a secondary index maps the lowercased name to it.

use std::collections::HashMap;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::models::ProblemRecord;

/// A pool of problem records keyed by name, in document order
#[derive(Debug, Clone, Default)]
pub struct Pool {
    records: IndexMap<String, ProblemRecord>,
    index: HashMap<String, String>,
}

fn fold(name: &str) -> String {
    name.to_lowercase()
}

impl Pool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The stored casing of `name`, if the pool holds it
    pub fn canonical_name(&self, name: &str) -> Option<&str> {
        self.index.get(&fold(name)).map(|s| s.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(&fold(name))
    }

    pub fn get(&self, name: &str) -> Option<&ProblemRecord> {
        let key = self.index.get(&fold(name))?;
        self.records.get(key)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut ProblemRecord> {
        let key = self.index.get(&fold(name))?;
        self.records.get_mut(key)
    }

    /// Insert or replace a record.
    ///
    /// If the pool already holds the name under another casing, the record is
    /// stored under the existing key. Returns the key used.
    pub fn insert(&mut self, name: &str, record: ProblemRecord) -> String {
        let key = match self.index.get(&fold(name)) {
            Some(existing) => existing.clone(),
            None => {
                self.index.insert(fold(name), name.to_string());
                name.to_string()
            }
        };
        self.records.insert(key.clone(), record);
        key
    }

    /// Remove a record, returning it with its stored name
    pub fn remove(&mut self, name: &str) -> Option<(String, ProblemRecord)> {
        let key = self.index.remove(&fold(name))?;
        let record = self.records.shift_remove(&key)?;
        Some((key, record))
    }

    pub fn find_by_external_id(&self, id: i64) -> Option<&str> {
        self.records
            .iter()
            .find(|(_, record)| record.external_id == Some(id))
            .map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, ProblemRecord> {
        self.records.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(|k| k.as_str())
    }

    pub fn records(&self) -> &IndexMap<String, ProblemRecord> {
        &self.records
    }

    /// Map-update: every incoming record replaces the one stored under the same name
    pub fn update_from(&mut self, other: Pool) {
        for (name, record) in other.records {
            self.insert(&name, record);
        }
    }
}

impl From<IndexMap<String, ProblemRecord>> for Pool {
    /// Names that differ only by case are folded into the first one, with the
    /// later histories appended in document order.
    fn from(records: IndexMap<String, ProblemRecord>) -> Self {
        let mut pool = Pool::new();
        for (name, record) in records {
            let Some(existing) = pool.canonical_name(&name).map(str::to_string) else {
                pool.insert(&name, record);
                continue;
            };
            log::warn!(
                "Problem '{}' duplicates '{}' by case; merging histories",
                name,
                existing
            );
            if let Some(target) = pool.get_mut(&existing) {
                target.absorb(record);
            }
        }
        pool
    }
}

impl PartialEq for Pool {
    fn eq(&self, other: &Self) -> bool {
        self.records == other.records
    }
}

impl Serialize for Pool {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.records.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Pool {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        IndexMap::<String, ProblemRecord>::deserialize(deserializer).map(Pool::from)
    }
}

/// Fallback queue of problem names, consulted only when nothing is due.
///
/// Values are free-form metadata; only the keys and their order matter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NextUp {
    entries: IndexMap<String, serde_json::Value>,
}

impl NextUp {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(|k| k.as_str())
    }

    fn position(&self, name: &str) -> Option<usize> {
        let folded = fold(name);
        self.entries.keys().position(|k| fold(k) == folded)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Append `name` to the back of the queue. Returns false if already queued.
    pub fn push(&mut self, name: &str, metadata: serde_json::Value) -> bool {
        if self.contains(name) {
            return false;
        }
        self.entries.insert(name.to_string(), metadata);
        true
    }

    /// Remove `name` (any casing), returning the stored name
    pub fn remove(&mut self, name: &str) -> Option<String> {
        let position = self.position(name)?;
        self.entries
            .shift_remove_index(position)
            .map(|(key, _)| key)
    }

    /// The first `limit` names in queue order
    pub fn front(&self, limit: usize) -> Vec<String> {
        self.entries.keys().take(limit).cloned().collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn update_from(&mut self, other: NextUp) {
        self.entries.extend(other.entries);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problems::Attempt;
    use chrono::NaiveDate;

    fn record(rating: u8) -> ProblemRecord {
        let mut record = ProblemRecord::new();
        record.push(Attempt::new(rating, NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()));
        record
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let mut pool = Pool::new();
        pool.insert("Two Sum", record(3));

        assert!(pool.contains("two sum"));
        assert_eq!(pool.canonical_name("TWO SUM"), Some("Two Sum"));
        assert_eq!(pool.get("two SUM").unwrap().history.len(), 1);
    }

    #[test]
    fn test_insert_keeps_first_casing() {
        let mut pool = Pool::new();
        pool.insert("Two Sum", record(3));
        let key = pool.insert("two sum", record(4));

        assert_eq!(key, "Two Sum");
        assert_eq!(pool.len(), 1);
        assert_eq!(pool.get("Two Sum").unwrap().history[0].rating, 4);
    }

    #[test]
    fn test_remove_preserves_order() {
        let mut pool = Pool::new();
        pool.insert("a", record(1));
        pool.insert("b", record(2));
        pool.insert("c", record(3));

        let (name, _) = pool.remove("B").unwrap();
        assert_eq!(name, "b");
        assert_eq!(pool.names().collect::<Vec<_>>(), vec!["a", "c"]);
        assert!(!pool.contains("b"));
    }

    #[test]
    fn test_find_by_external_id() {
        let mut pool = Pool::new();
        let mut with_id = record(2);
        with_id.external_id = Some(42);
        pool.insert("Trapping Rain Water", with_id);
        pool.insert("Other", record(2));

        assert_eq!(pool.find_by_external_id(42), Some("Trapping Rain Water"));
        assert_eq!(pool.find_by_external_id(7), None);
    }

    #[test]
    fn test_pool_document_order_survives_round_trip() {
        let json = r#"{"zeta":{"history":[]},"alpha":{"history":[],"leetcode_id":1}}"#;
        let pool: Pool = serde_json::from_str(json).unwrap();
        assert_eq!(pool.names().collect::<Vec<_>>(), vec!["zeta", "alpha"]);
        assert_eq!(serde_json::to_string(&pool).unwrap(), json);
    }

    #[test]
    fn test_case_duplicates_merge_on_load() {
        let json = r#"{
            "Two Sum": {"history": [{"rating": 2, "date": "2024-05-01"}]},
            "Other": {"history": []},
            "two sum": {"history": [{"rating": 4, "date": "2024-05-03"}], "leetcode_id": 1}
        }"#;
        let pool: Pool = serde_json::from_str(json).unwrap();

        assert_eq!(pool.names().collect::<Vec<_>>(), vec!["Two Sum", "Other"]);
        let record = pool.get("TWO SUM").unwrap();
        let ratings: Vec<u8> = record.history.iter().map(|a| a.rating).collect();
        assert_eq!(ratings, vec![2, 4]);
        assert_eq!(record.external_id, Some(1));
    }

    #[test]
    fn test_next_up_queue() {
        let mut queue = NextUp::new();
        assert!(queue.push("Course Schedule", serde_json::json!({})));
        assert!(queue.push("Word Ladder", serde_json::json!({})));
        assert!(!queue.push("course schedule", serde_json::json!({})));

        assert_eq!(queue.front(1), vec!["Course Schedule".to_string()]);
        assert_eq!(queue.remove("COURSE SCHEDULE").as_deref(), Some("Course Schedule"));
        assert_eq!(queue.names().collect::<Vec<_>>(), vec!["Word Ladder"]);
    }
}
