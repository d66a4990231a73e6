use std::path::PathBuf;

use anyhow::{Context, Result};

use srl_lib::storage::JsonFileStore;
use srl_lib::tracker::{Tracker, TrackerError};

use crate::render::terminal::{paint, Color};

/// Shared application state for CLI commands
pub struct App {
    pub tracker: Tracker<JsonFileStore>,
    pub use_color: bool,
}

impl App {
    /// Open the tracker in `data_dir`, or the default data directory
    pub fn new(data_dir: Option<PathBuf>, use_color: bool) -> Result<Self> {
        let data_dir = match data_dir {
            Some(dir) => dir,
            None => JsonFileStore::default_data_dir().context("Failed to get data directory")?,
        };

        let store = JsonFileStore::new(data_dir.clone())
            .with_context(|| format!("Failed to open data directory {}", data_dir.display()))?;
        log::debug!("Using data directory {}", data_dir.display());

        Ok(Self {
            tracker: Tracker::new(store),
            use_color,
        })
    }

    /// Unwrap a tracker result for a command.
    ///
    /// Problems the user can act on are printed and yield `None`; storage
    /// failures are returned as errors.
    pub fn check<T>(&self, result: srl_lib::tracker::Result<T>) -> Result<Option<T>> {
        match result {
            Ok(value) => Ok(Some(value)),
            Err(TrackerError::Storage(e)) => Err(e).context("Failed to access tracker data"),
            Err(e) => {
                eprintln!("{}", paint(&e.to_string(), Color::RED, self.use_color));
                if let TrackerError::UnknownExternalId(id) = e {
                    eprintln!(
                        "Hint: add the problem first with: srl add \"Problem Name\" <rating> --id {}",
                        id
                    );
                }
                Ok(None)
            }
        }
    }

    pub fn paint(&self, text: &str, color: &str) -> String {
        paint(text, color, self.use_color)
    }
}
