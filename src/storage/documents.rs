use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error in {document}: {source}")]
    Json {
        document: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Data directory not found")]
    DataDirNotFound,
}

pub type Result<T> = std::result::Result<T, StorageError>;

/// The named documents that make up a learner's state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Document {
    InProgress,
    Mastered,
    NextUp,
    Audit,
    Config,
}

impl Document {
    pub const ALL: [Document; 5] = [
        Document::InProgress,
        Document::Mastered,
        Document::NextUp,
        Document::Audit,
        Document::Config,
    ];

    pub fn file_name(&self) -> &'static str {
        match self {
            Document::InProgress => "problems_in_progress.json",
            Document::Mastered => "problems_mastered.json",
            Document::NextUp => "next_up.json",
            Document::Audit => "audit.json",
            Document::Config => "config.json",
        }
    }
}

/// Load/save access to whole documents.
///
/// Implementors only move raw text; (de)serialization lives in the provided
/// methods so every backend agrees on the format.
pub trait DocumentStore {
    /// Raw contents of a document, or `None` if it has never been written
    fn read(&self, document: Document) -> Result<Option<String>>;

    fn write(&self, document: Document, contents: &str) -> Result<()>;

    /// Load a document, falling back to its default when missing or blank
    fn load<T: DeserializeOwned + Default>(&self, document: Document) -> Result<T> {
        match self.read(document)? {
            Some(contents) if !contents.trim().is_empty() => serde_json::from_str(&contents)
                .map_err(|source| StorageError::Json {
                    document: document.file_name(),
                    source,
                }),
            _ => Ok(T::default()),
        }
    }

    fn save<T: Serialize>(&self, document: Document, value: &T) -> Result<()> {
        let contents =
            serde_json::to_string_pretty(value).map_err(|source| StorageError::Json {
                document: document.file_name(),
                source,
            })?;
        self.write(document, &contents)
    }
}
