use std::fs;
use std::path::{Path, PathBuf};

use super::documents::{Document, DocumentStore, Result, StorageError};

/// Stores each document as a pretty-printed JSON file in one directory
///
/// ```text
/// ~/.local/share/srl/
/// ├── problems_in_progress.json
/// ├── problems_mastered.json
/// ├── next_up.json
/// ├── audit.json
/// └── config.json
/// ```
///
/// There is no locking: a single process is assumed to own the directory.
pub struct JsonFileStore {
    data_dir: PathBuf,
}

impl JsonFileStore {
    /// Open a store rooted at `data_dir`, creating the directory if needed
    pub fn new(data_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&data_dir)?;
        Ok(Self { data_dir })
    }

    /// Get the default data directory
    pub fn default_data_dir() -> Result<PathBuf> {
        dirs::data_local_dir()
            .map(|p| p.join("srl"))
            .ok_or(StorageError::DataDirNotFound)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn path(&self, document: Document) -> PathBuf {
        self.data_dir.join(document.file_name())
    }
}

impl DocumentStore for JsonFileStore {
    fn read(&self, document: Document) -> Result<Option<String>> {
        let path = self.path(document);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    fn write(&self, document: Document, contents: &str) -> Result<()> {
        fs::write(self.path(document), contents)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problems::{Attempt, Pool, ProblemRecord};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_store() -> (JsonFileStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(temp_dir.path().join("srl")).unwrap();
        (store, temp_dir)
    }

    #[test]
    fn test_missing_document_loads_default() {
        let (store, _temp) = create_test_store();

        let pool: Pool = store.load(Document::InProgress).unwrap();
        assert!(pool.is_empty());
        assert!(store.read(Document::Audit).unwrap().is_none());
    }

    #[test]
    fn test_blank_document_loads_default() {
        let (store, _temp) = create_test_store();
        store.write(Document::Mastered, "  \n").unwrap();

        let pool: Pool = store.load(Document::Mastered).unwrap();
        assert!(pool.is_empty());
    }

    #[test]
    fn test_save_and_load_pool() {
        let (store, _temp) = create_test_store();

        let mut record = ProblemRecord::new();
        record.push(Attempt::new(4, NaiveDate::from_ymd_opt(2024, 6, 2).unwrap()));
        let mut pool = Pool::new();
        pool.insert("Valid Anagram", record);

        store.save(Document::InProgress, &pool).unwrap();
        assert!(store.data_dir().join("problems_in_progress.json").exists());

        let loaded: Pool = store.load(Document::InProgress).unwrap();
        assert_eq!(loaded, pool);
    }

    #[test]
    fn test_corrupt_document_reports_file() {
        let (store, _temp) = create_test_store();
        store.write(Document::NextUp, "{not json").unwrap();

        let err = store.load::<Pool>(Document::NextUp).unwrap_err();
        assert!(err.to_string().contains("next_up.json"));
    }
}
