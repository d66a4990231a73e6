//! The tracker: every operation a session can perform
//!
//! Each call loads the documents it needs from the store, works on them in
//! memory and saves what changed. When a record moves between pools the
//! destination pool is written first, so an interrupted write can leave a
//! duplicate but never lose a record.

use chrono::NaiveDate;
use indexmap::IndexMap;
use thiserror::Error;

use crate::activity::{self, ActivitySummary, DateCounts};
use crate::audit::{self, AuditEntry, AuditLog, AuditResult};
use crate::backup::{self, ExportBundle, ExportOptions, ImportCounts, ImportMode};
use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::mastery::{self, Outcome};
use crate::problems::{Attempt, NextUp, Pool, PoolKind, ProblemRecord};
use crate::random::{RandomSource, ThreadRandom};
use crate::review::{self, DueList};
use crate::storage::{Document, DocumentStore, StorageError};

#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("Problem '{0}' not found")]
    NotFound(String),

    #[error("Problem with ID {id} is already mastered ('{name}'); add it by name to practise it again")]
    AlreadyMastered { id: i64, name: String },

    #[error("No problem found with ID {0}")]
    UnknownExternalId(i64),

    #[error("Invalid problem number: {0}")]
    InvalidSelection(usize),

    #[error("Audit problem '{0}' not found in mastered")]
    InconsistentAuditState(String),

    #[error("No active audit")]
    NoActiveAudit,

    #[error("Rating must be between 1 and 5, got {0}")]
    InvalidRating(u8),

    #[error("Time spent must be a positive number of minutes")]
    InvalidTimeSpent,

    #[error("ID {id} already belongs to '{name}'")]
    DuplicateExternalId { id: i64, name: String },

    #[error("'{name}' is already tracked ({pool})")]
    AlreadyTracked { name: String, pool: PoolKind },

    #[error("Audit probability must be between 0 and 1, got {0}")]
    InvalidProbability(f64),

    #[error("Invalid import file: {0}")]
    InvalidImport(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

pub type Result<T> = std::result::Result<T, TrackerError>;

/// How a command names the problem it acts on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    ByName(String),
    /// 1-based position in the current due list
    ByIndex(usize),
    ByExternalId(i64),
}

/// A practice session to record
#[derive(Debug, Clone)]
pub struct AttemptRequest {
    pub selector: Selector,
    pub rating: u8,
    pub note: Option<String>,
    pub mistake: Option<String>,
    /// Minutes
    pub time_spent: Option<u32>,
    /// Catalog ID to link to the record; only meaningful when selecting by name
    pub external_id: Option<i64>,
}

impl AttemptRequest {
    pub fn new(selector: Selector, rating: u8) -> Self {
        Self {
            selector,
            rating,
            note: None,
            mistake: None,
            time_spent: None,
            external_id: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recorded {
    InProgress { name: String, due: NaiveDate },
    Mastered { name: String },
}

/// Result of asking for an audit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuditTrigger {
    /// The random draw did not fire
    NotDrawn,
    /// An audit was already pending; nothing changed
    Pending(String),
    /// A new audit was started on this problem
    Started(String),
    /// The draw fired but there is nothing mastered to audit
    NoMastered,
}

impl AuditTrigger {
    /// The problem under audit, if any
    pub fn problem(&self) -> Option<&str> {
        match self {
            AuditTrigger::Pending(name) | AuditTrigger::Started(name) => Some(name),
            AuditTrigger::NotDrawn | AuditTrigger::NoMastered => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextReview {
    InDays(i64),
    Today,
    OverdueBy(i64),
}

impl NextReview {
    fn from_days_until(days: i64) -> Self {
        match days {
            d if d > 0 => NextReview::InDays(d),
            0 => NextReview::Today,
            d => NextReview::OverdueBy(-d),
        }
    }
}

/// A problem and where it stands
#[derive(Debug, Clone, PartialEq)]
pub struct ProblemView {
    pub name: String,
    pub status: PoolKind,
    pub record: ProblemRecord,
    /// Only set for in-progress problems with history
    pub next_review: Option<NextReview>,
    pub due_date: Option<NaiveDate>,
}

impl ProblemView {
    /// Attempts carrying a note or mistake, with their 1-based position
    pub fn noted_attempts(&self) -> Vec<(usize, &Attempt)> {
        self.record
            .history
            .iter()
            .enumerate()
            .filter(|(_, attempt)| attempt.has_notes())
            .map(|(i, attempt)| (i + 1, attempt))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MasteredSummary {
    pub name: String,
    pub external_id: Option<i64>,
    pub attempts: usize,
    /// Date of the last attempt
    pub mastered_on: NaiveDate,
}

pub struct Tracker<S: DocumentStore> {
    store: S,
    clock: Box<dyn Clock>,
    rng: Box<dyn RandomSource>,
}

impl<S: DocumentStore> Tracker<S> {
    /// A tracker on the local date with thread-local randomness
    pub fn new(store: S) -> Self {
        Self::with_sources(store, SystemClock, ThreadRandom)
    }

    pub fn with_sources(
        store: S,
        clock: impl Clock + 'static,
        rng: impl RandomSource + 'static,
    ) -> Self {
        Self {
            store,
            clock: Box::new(clock),
            rng: Box::new(rng),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    fn load_in_progress(&self) -> Result<Pool> {
        Ok(self.store.load(Document::InProgress)?)
    }

    fn load_mastered(&self) -> Result<Pool> {
        Ok(self.store.load(Document::Mastered)?)
    }

    fn load_next_up(&self) -> Result<NextUp> {
        Ok(self.store.load(Document::NextUp)?)
    }

    fn load_audit(&self) -> Result<AuditLog> {
        Ok(self.store.load(Document::Audit)?)
    }

    // ===== Attempts =====

    /// Record a practice session and apply the mastery rule
    pub fn record_attempt(&self, request: AttemptRequest) -> Result<Recorded> {
        if !Attempt::is_valid_rating(request.rating) {
            return Err(TrackerError::InvalidRating(request.rating));
        }
        if request.time_spent == Some(0) {
            return Err(TrackerError::InvalidTimeSpent);
        }

        let mut in_progress = self.load_in_progress()?;
        let mut mastered = self.load_mastered()?;
        let mut next_up = self.load_next_up()?;
        let today = self.today();

        let name = match &request.selector {
            Selector::ByName(name) => {
                let name = name.trim();
                if name.is_empty() {
                    return Err(TrackerError::NotFound(String::new()));
                }
                name.to_string()
            }
            Selector::ByIndex(position) => review::due_list(&in_progress, &next_up, today, None)
                .nth(*position)
                .ok_or(TrackerError::InvalidSelection(*position))?,
            Selector::ByExternalId(id) => resolve_external_id(&in_progress, &mastered, *id)?,
        };

        if let Some(id) = request.external_id {
            check_external_id_free(&in_progress, &mastered, &name, id)?;
        }

        let attempt = Attempt {
            rating: request.rating,
            date: today,
            note: request.note.filter(|s| !s.trim().is_empty()),
            mistake: request.mistake.filter(|s| !s.trim().is_empty()),
            time_spent: request.time_spent,
        };

        let outcome = mastery::apply_attempt(
            &mut in_progress,
            &mut mastered,
            &name,
            attempt,
            request.external_id,
        );

        if let Outcome::Promoted { .. } = outcome {
            self.store.save(Document::Mastered, &mastered)?;
        }
        self.store.save(Document::InProgress, &in_progress)?;
        if next_up.remove(outcome.name()).is_some() {
            self.store.save(Document::NextUp, &next_up)?;
        }

        Ok(match outcome {
            Outcome::Promoted { name } => Recorded::Mastered { name },
            Outcome::InProgress { name } => {
                let due = in_progress
                    .get(&name)
                    .and_then(review::due_date)
                    .unwrap_or(today);
                Recorded::InProgress { name, due }
            }
        })
    }

    // ===== Review =====

    /// Problems to practise today, or the next-up fallback when nothing is due
    pub fn get_due_problems(&self, limit: Option<usize>) -> Result<DueList> {
        let in_progress = self.load_in_progress()?;
        let next_up = self.load_next_up()?;
        Ok(review::due_list(&in_progress, &next_up, self.today(), limit))
    }

    /// Days past due for an in-progress problem, `None` if not due yet
    pub fn get_overdue_days(&self, name: &str) -> Result<Option<i64>> {
        let in_progress = self.load_in_progress()?;
        let record = in_progress
            .get(name)
            .ok_or_else(|| TrackerError::NotFound(name.to_string()))?;
        Ok(review::days_overdue(record, self.today()))
    }

    pub fn overdue_info(&self) -> Result<IndexMap<String, i64>> {
        Ok(review::overdue_info(&self.load_in_progress()?, self.today()))
    }

    pub fn get_mastery_candidates(&self) -> Result<Vec<String>> {
        Ok(review::mastery_candidates(&self.load_in_progress()?))
    }

    // ===== Inspection =====

    pub fn find_problem(&self, selector: &Selector) -> Result<ProblemView> {
        let in_progress = self.load_in_progress()?;
        let mastered = self.load_mastered()?;
        let today = self.today();

        let name = match selector {
            Selector::ByName(name) => name.trim().to_string(),
            Selector::ByIndex(position) => {
                let next_up = self.load_next_up()?;
                review::due_list(&in_progress, &next_up, today, None)
                    .nth(*position)
                    .ok_or(TrackerError::InvalidSelection(*position))?
            }
            Selector::ByExternalId(id) => in_progress
                .find_by_external_id(*id)
                .or_else(|| mastered.find_by_external_id(*id))
                .ok_or(TrackerError::UnknownExternalId(*id))?
                .to_string(),
        };

        let (status, pool) = if in_progress.contains(&name) {
            (PoolKind::InProgress, &in_progress)
        } else if mastered.contains(&name) {
            (PoolKind::Mastered, &mastered)
        } else {
            return Err(TrackerError::NotFound(name));
        };

        let canonical = pool.canonical_name(&name).unwrap_or(name.as_str()).to_string();
        let record = pool.get(&name).cloned().unwrap_or_default();
        let due_date = match status {
            PoolKind::InProgress => review::due_date(&record),
            PoolKind::Mastered => None,
        };

        Ok(ProblemView {
            name: canonical,
            status,
            next_review: due_date.map(|due| NextReview::from_days_until((due - today).num_days())),
            due_date,
            record,
        })
    }

    /// In-progress problems with their IDs, in document order
    pub fn in_progress(&self) -> Result<Vec<(String, Option<i64>)>> {
        Ok(self
            .load_in_progress()?
            .iter()
            .map(|(name, record)| (name.clone(), record.external_id))
            .collect())
    }

    /// Mastered problems that have history, in document order
    pub fn mastered(&self) -> Result<Vec<MasteredSummary>> {
        Ok(self
            .load_mastered()?
            .iter()
            .filter_map(|(name, record)| {
                let last = record.last_attempt()?;
                Some(MasteredSummary {
                    name: name.clone(),
                    external_id: record.external_id,
                    attempts: record.history.len(),
                    mastered_on: last.date,
                })
            })
            .collect())
    }

    pub fn mastered_count(&self) -> Result<usize> {
        Ok(self.load_mastered()?.len())
    }

    // ===== Next up =====

    pub fn next_up(&self) -> Result<Vec<String>> {
        Ok(self.load_next_up()?.names().map(str::to_string).collect())
    }

    /// Queue a problem. Returns false if it was already queued.
    pub fn add_next_up(&self, name: &str) -> Result<bool> {
        let name = name.trim();
        if name.is_empty() {
            return Err(TrackerError::NotFound(String::new()));
        }
        for (pool, kind) in [
            (self.load_in_progress()?, PoolKind::InProgress),
            (self.load_mastered()?, PoolKind::Mastered),
        ] {
            if let Some(existing) = pool.canonical_name(name) {
                return Err(TrackerError::AlreadyTracked {
                    name: existing.to_string(),
                    pool: kind,
                });
            }
        }

        let mut next_up = self.load_next_up()?;
        if !next_up.push(name, serde_json::json!({})) {
            return Ok(false);
        }
        self.store.save(Document::NextUp, &next_up)?;
        Ok(true)
    }

    /// Remove a problem from the queue, returning its stored name
    pub fn remove_next_up(&self, name: &str) -> Result<String> {
        let mut next_up = self.load_next_up()?;
        let removed = next_up
            .remove(name)
            .ok_or_else(|| TrackerError::NotFound(name.to_string()))?;
        self.store.save(Document::NextUp, &next_up)?;
        Ok(removed)
    }

    /// Empty the queue, returning how many names were dropped
    pub fn clear_next_up(&self) -> Result<usize> {
        let mut next_up = self.load_next_up()?;
        let count = next_up.len();
        next_up.clear();
        self.store.save(Document::NextUp, &next_up)?;
        Ok(count)
    }

    // ===== Audits =====

    pub fn get_current_audit(&self) -> Result<Option<String>> {
        Ok(self.load_audit()?.current_audit)
    }

    /// Random audit trigger, run before the due list is shown.
    ///
    /// A pending audit is always surfaced; the draw only happens when idle.
    pub fn maybe_start_audit(&mut self) -> Result<AuditTrigger> {
        if let Some(current) = self.load_audit()?.current_audit {
            return Ok(AuditTrigger::Pending(current));
        }
        let probability = self.config()?.audit_probability();
        if !audit::should_trigger(probability, &mut *self.rng) {
            return Ok(AuditTrigger::NotDrawn);
        }
        self.start_audit()
    }

    /// Start an audit now, or surface the one already pending
    pub fn start_audit(&mut self) -> Result<AuditTrigger> {
        let mut audit_log = self.load_audit()?;
        if let Some(current) = &audit_log.current_audit {
            return Ok(AuditTrigger::Pending(current.clone()));
        }

        let mastered = self.load_mastered()?;
        let Some(problem) = audit::sample(&mastered, &mut *self.rng) else {
            return Ok(AuditTrigger::NoMastered);
        };

        audit_log.start(problem.clone());
        self.store.save(Document::Audit, &audit_log)?;
        Ok(AuditTrigger::Started(problem))
    }

    /// Resolve the pending audit as passed. Pools are untouched.
    pub fn pass_audit(&self) -> Result<String> {
        let mut audit_log = self.load_audit()?;
        let problem = audit_log
            .resolve(self.today(), AuditResult::Pass)
            .ok_or(TrackerError::NoActiveAudit)?;
        self.store.save(Document::Audit, &audit_log)?;
        Ok(problem)
    }

    /// Resolve the pending audit as failed and demote the problem.
    ///
    /// Returns the name the problem is now stored under in progress. If the
    /// problem is no longer mastered, nothing is written and the audit stays
    /// pending.
    pub fn fail_audit(&self) -> Result<String> {
        let mut audit_log = self.load_audit()?;
        let problem = audit_log.current_audit.clone().ok_or(TrackerError::NoActiveAudit)?;

        let mut in_progress = self.load_in_progress()?;
        let mut mastered = self.load_mastered()?;
        let today = self.today();

        let Some(stored) = audit::demote(&mut in_progress, &mut mastered, &problem, today) else {
            log::warn!("Audit problem '{}' is not in mastered; audit left pending", problem);
            return Err(TrackerError::InconsistentAuditState(problem));
        };
        audit_log.resolve(today, AuditResult::Fail);

        self.store.save(Document::InProgress, &in_progress)?;
        self.store.save(Document::Mastered, &mastered)?;
        self.store.save(Document::Audit, &audit_log)?;
        Ok(stored)
    }

    pub fn audit_history(&self) -> Result<Vec<AuditEntry>> {
        Ok(self.load_audit()?.history)
    }

    // ===== Configuration =====

    pub fn config(&self) -> Result<Config> {
        Ok(self.store.load(Document::Config)?)
    }

    pub fn set_audit_probability(&self, probability: f64) -> Result<()> {
        let mut config = self.config()?;
        if !config.set_audit_probability(probability) {
            return Err(TrackerError::InvalidProbability(probability));
        }
        self.store.save(Document::Config, &config)?;
        Ok(())
    }

    // ===== Backup =====

    pub fn export(&self, options: &ExportOptions) -> Result<ExportBundle> {
        backup::export(&self.store, options, self.clock.now())
    }

    pub fn import(&self, bundle: ExportBundle, mode: ImportMode) -> Result<ImportCounts> {
        backup::import(&self.store, bundle, mode)
    }

    // ===== Activity =====

    pub fn date_counts(&self) -> Result<DateCounts> {
        Ok(activity::date_counts(
            &self.load_in_progress()?,
            &self.load_mastered()?,
            &self.load_audit()?,
        ))
    }

    pub fn activity(&self, months: u32) -> Result<ActivitySummary> {
        Ok(activity::summarize(&self.date_counts()?, self.today(), months))
    }
}

fn resolve_external_id(in_progress: &Pool, mastered: &Pool, id: i64) -> Result<String> {
    if let Some(name) = in_progress.find_by_external_id(id) {
        return Ok(name.to_string());
    }
    if let Some(name) = mastered.find_by_external_id(id) {
        return Err(TrackerError::AlreadyMastered {
            id,
            name: name.to_string(),
        });
    }
    Err(TrackerError::UnknownExternalId(id))
}

/// An ID may only be linked to one logical problem across both pools
fn check_external_id_free(in_progress: &Pool, mastered: &Pool, name: &str, id: i64) -> Result<()> {
    let folded = name.to_lowercase();
    for pool in [in_progress, mastered] {
        if let Some(owner) = pool.find_by_external_id(id) {
            if owner.to_lowercase() != folded {
                return Err(TrackerError::DuplicateExternalId {
                    id,
                    name: owner.to_string(),
                });
            }
        }
    }
    Ok(())
}
