//! Persistence port and the JSON file store behind it
//!
//! Every operation loads the documents it needs, mutates them in memory and
//! saves them back. Nothing is cached between calls.

mod documents;
mod json_store;

pub use documents::{Document, DocumentStore, Result, StorageError};
pub use json_store::JsonFileStore;
