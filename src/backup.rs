//! Export and import of the whole tracker state as one JSON bundle
//!
//! ```json
//! {
//!   "exported_at": "2024-05-01T09:30:00",
//!   "srl_version": "1.0.0",
//!   "export_type": "full",
//!   "data": {
//!     "problems_in_progress": { ... },
//!     "problems_mastered": { ... },
//!     "next_up": { ... },
//!     "config": { ... },
//!     "audit": { ... }
//!   }
//! }
//! ```

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::audit::AuditLog;
use crate::config::Config;
use crate::problems::{NextUp, Pool};
use crate::storage::{Document, DocumentStore};
use crate::tracker::{Result, TrackerError};

const REQUIRED_FIELDS: [&str; 3] = ["exported_at", "srl_version", "data"];

/// Which pools an export covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportType {
    /// In-progress, mastered and next-up
    #[default]
    Full,
    MasteredOnly,
    ProgressOnly,
    /// Written by something else; imported section by section as found
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for ExportType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ExportType::Full => "full",
            ExportType::MasteredOnly => "mastered_only",
            ExportType::ProgressOnly => "progress_only",
            ExportType::Unknown => "unknown",
        };
        write!(f, "{}", label)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    pub export_type: ExportType,
    pub include_config: bool,
    pub include_audit: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExportData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub problems_in_progress: Option<Pool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub problems_mastered: Option<Pool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_up: Option<NextUp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<Config>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audit: Option<AuditLog>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportBundle {
    pub exported_at: String,
    pub srl_version: String,
    #[serde(default = "unknown_export_type")]
    pub export_type: ExportType,
    pub data: ExportData,
}

fn unknown_export_type() -> ExportType {
    ExportType::Unknown
}

/// How imported sections combine with what is already stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImportMode {
    /// Each imported section overwrites its document
    #[default]
    Replace,
    /// Imported entries win over existing ones of the same name
    Merge,
}

/// Entries per section, for previews and import reports.
///
/// `None` means the section is absent from the bundle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportCounts {
    pub in_progress: Option<usize>,
    pub mastered: Option<usize>,
    pub next_up: Option<usize>,
    /// Whether non-empty configuration was carried
    pub config: bool,
    pub audit_entries: Option<usize>,
}

impl ImportCounts {
    pub fn is_empty(&self) -> bool {
        self.in_progress.is_none()
            && self.mastered.is_none()
            && self.next_up.is_none()
            && !self.config
            && self.audit_entries.is_none()
    }
}

impl ExportBundle {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Parse and validate a bundle
    pub fn parse(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)
            .map_err(|e| TrackerError::InvalidImport(format!("invalid JSON: {}", e)))?;

        let Some(object) = value.as_object() else {
            return Err(TrackerError::InvalidImport(
                "top level must be an object".to_string(),
            ));
        };
        for field in REQUIRED_FIELDS {
            if !object.contains_key(field) {
                return Err(TrackerError::InvalidImport(format!(
                    "missing '{}' field",
                    field
                )));
            }
        }
        if !object["data"].is_object() {
            return Err(TrackerError::InvalidImport(
                "'data' must be an object".to_string(),
            ));
        }

        serde_json::from_value(value).map_err(|e| TrackerError::InvalidImport(e.to_string()))
    }

    /// What an import of this bundle would touch
    pub fn preview(&self) -> ImportCounts {
        let data = &self.data;
        ImportCounts {
            in_progress: data.problems_in_progress.as_ref().map(Pool::len),
            mastered: data.problems_mastered.as_ref().map(Pool::len),
            next_up: data.next_up.as_ref().map(NextUp::len),
            config: data.config.as_ref().is_some_and(|c| !c.is_empty()),
            audit_entries: data.audit.as_ref().map(|a| a.history.len()),
        }
    }
}

/// Snapshot the stored documents into a bundle
pub fn export<S: DocumentStore>(
    store: &S,
    options: &ExportOptions,
    exported_at: NaiveDateTime,
) -> Result<ExportBundle> {
    let mut data = ExportData::default();

    match options.export_type {
        ExportType::MasteredOnly => {
            data.problems_mastered = Some(store.load(Document::Mastered)?);
        }
        ExportType::ProgressOnly => {
            data.problems_in_progress = Some(store.load(Document::InProgress)?);
        }
        ExportType::Full | ExportType::Unknown => {
            data.problems_in_progress = Some(store.load(Document::InProgress)?);
            data.problems_mastered = Some(store.load(Document::Mastered)?);
            data.next_up = Some(store.load(Document::NextUp)?);
        }
    }

    if options.include_config {
        data.config = Some(store.load(Document::Config)?);
    }
    if options.include_audit {
        data.audit = Some(store.load(Document::Audit)?);
    }

    let export_type = match options.export_type {
        ExportType::Unknown => ExportType::Full,
        other => other,
    };

    Ok(ExportBundle {
        exported_at: exported_at.format("%Y-%m-%dT%H:%M:%S").to_string(),
        srl_version: env!("CARGO_PKG_VERSION").to_string(),
        export_type,
        data,
    })
}

/// Write every section of `bundle` into the store
pub fn import<S: DocumentStore>(
    store: &S,
    bundle: ExportBundle,
    mode: ImportMode,
) -> Result<ImportCounts> {
    let counts = bundle.preview();
    let data = bundle.data;

    if let Some(pool) = data.problems_in_progress {
        import_pool(store, Document::InProgress, pool, mode)?;
    }
    if let Some(pool) = data.problems_mastered {
        import_pool(store, Document::Mastered, pool, mode)?;
    }

    if let Some(queue) = data.next_up {
        let queue = match mode {
            ImportMode::Replace => queue,
            ImportMode::Merge => {
                let mut existing: NextUp = store.load(Document::NextUp)?;
                existing.update_from(queue);
                existing
            }
        };
        store.save(Document::NextUp, &queue)?;
    }

    if let Some(config) = data.config {
        let config = match mode {
            ImportMode::Replace => config,
            ImportMode::Merge => {
                let mut existing: Config = store.load(Document::Config)?;
                existing.update_from(config);
                existing
            }
        };
        store.save(Document::Config, &config)?;
    }

    if let Some(audit) = data.audit {
        let audit = match mode {
            ImportMode::Replace => audit,
            ImportMode::Merge => {
                let mut existing: AuditLog = store.load(Document::Audit)?;
                existing.merge(audit);
                existing
            }
        };
        store.save(Document::Audit, &audit)?;
    }

    log::info!("Imported bundle ({:?}): {:?}", mode, counts);
    Ok(counts)
}

fn import_pool<S: DocumentStore>(
    store: &S,
    document: Document,
    pool: Pool,
    mode: ImportMode,
) -> Result<()> {
    let pool = match mode {
        ImportMode::Replace => pool,
        ImportMode::Merge => {
            let mut existing: Pool = store.load(document)?;
            existing.update_from(pool);
            existing
        }
    };
    store.save(document, &pool)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::JsonFileStore;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    const BUNDLE: &str = r#"{
  "exported_at": "2024-05-01T09:30:00",
  "srl_version": "1.0.0",
  "export_type": "full",
  "data": {
    "problems_in_progress": {
      "Two Sum": {"history": [{"rating": 3, "date": "2024-04-28"}], "leetcode_id": 1}
    },
    "problems_mastered": {
      "Valid Parentheses": {"history": [{"rating": 5, "date": "2024-04-01"}, {"rating": 5, "date": "2024-04-06"}]}
    },
    "next_up": {"Merge Intervals": {}},
    "audit": {"history": [{"date": "2024-04-20", "problem": "Valid Parentheses", "result": "pass"}]}
  }
}"#;

    fn create_test_store() -> (JsonFileStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(temp_dir.path().to_path_buf()).unwrap();
        (store, temp_dir)
    }

    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_parse_rejects_missing_fields() {
        for text in [
            r#"{"srl_version":"1.0.0","data":{}}"#,
            r#"{"exported_at":"x","data":{}}"#,
            r#"{"exported_at":"x","srl_version":"1.0.0"}"#,
            r#"{"exported_at":"x","srl_version":"1.0.0","data":[]}"#,
            r#"[1, 2]"#,
            "not json",
        ] {
            let err = ExportBundle::parse(text).unwrap_err();
            assert!(matches!(err, TrackerError::InvalidImport(_)), "{text}");
        }
    }

    #[test]
    fn test_parse_defaults_missing_export_type() {
        let bundle = ExportBundle::parse(r#"{"exported_at":"x","srl_version":"1.0.0","data":{}}"#).unwrap();
        assert_eq!(bundle.export_type, ExportType::Unknown);
        assert!(bundle.preview().is_empty());
    }

    #[test]
    fn test_preview_counts() {
        let bundle = ExportBundle::parse(BUNDLE).unwrap();
        let counts = bundle.preview();

        assert_eq!(counts.in_progress, Some(1));
        assert_eq!(counts.mastered, Some(1));
        assert_eq!(counts.next_up, Some(1));
        assert!(!counts.config);
        assert_eq!(counts.audit_entries, Some(1));
    }

    #[test]
    fn test_export_import_round_trip() {
        let (source, _source_dir) = create_test_store();
        import(&source, ExportBundle::parse(BUNDLE).unwrap(), ImportMode::Replace).unwrap();

        let bundle = export(&source, &ExportOptions::default(), noon()).unwrap();
        assert_eq!(bundle.exported_at, "2024-05-01T12:00:00");
        assert!(bundle.data.audit.is_none());

        let text = bundle.to_json().unwrap();
        let (target, _target_dir) = create_test_store();
        import(&target, ExportBundle::parse(&text).unwrap(), ImportMode::Replace).unwrap();

        for document in [Document::InProgress, Document::Mastered, Document::NextUp] {
            assert_eq!(
                source.read(document).unwrap(),
                target.read(document).unwrap(),
                "{:?}",
                document
            );
        }
    }

    #[test]
    fn test_partial_exports() {
        let (store, _dir) = create_test_store();
        import(&store, ExportBundle::parse(BUNDLE).unwrap(), ImportMode::Replace).unwrap();

        let options = ExportOptions {
            export_type: ExportType::MasteredOnly,
            include_audit: true,
            ..Default::default()
        };
        let bundle = export(&store, &options, noon()).unwrap();
        assert!(bundle.data.problems_in_progress.is_none());
        assert!(bundle.data.next_up.is_none());
        assert_eq!(bundle.data.problems_mastered.map(|p| p.len()), Some(1));
        assert_eq!(bundle.data.audit.map(|a| a.history.len()), Some(1));

        let options = ExportOptions {
            export_type: ExportType::ProgressOnly,
            ..Default::default()
        };
        let text = export(&store, &options, noon()).unwrap().to_json().unwrap();
        assert!(text.contains(r#""export_type": "progress_only""#));
        assert!(!text.contains("problems_mastered"));
    }

    #[test]
    fn test_merge_keeps_existing_and_prefers_imported() {
        let (store, _dir) = create_test_store();
        store
            .write(
                Document::InProgress,
                r#"{"Two Sum": {"history": []}, "Climbing Stairs": {"history": []}}"#,
            )
            .unwrap();
        store
            .write(
                Document::Audit,
                r#"{"current_audit": "Climbing Stairs", "history": [{"date": "2024-04-20", "problem": "Valid Parentheses", "result": "pass"}]}"#,
            )
            .unwrap();

        let counts = import(&store, ExportBundle::parse(BUNDLE).unwrap(), ImportMode::Merge).unwrap();
        assert_eq!(counts.in_progress, Some(1));

        let pool: Pool = store.load(Document::InProgress).unwrap();
        assert_eq!(pool.len(), 2);
        assert_eq!(pool.get("Two Sum").unwrap().history.len(), 1);

        let audit: AuditLog = store.load(Document::Audit).unwrap();
        assert_eq!(audit.history.len(), 1);
        assert_eq!(audit.current_audit.as_deref(), Some("Climbing Stairs"));
    }
}
