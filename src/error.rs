//! Error and diagnostic types
//!
//! Only [`AnalysisError::RootNotFound`] aborts a pipeline run. Everything else
//! degrades gracefully and is reported through [`Issue`] entries and counters
//! on [`Diagnostics`].

use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

/// Hard failures surfaced to the caller.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The scan root is missing, unreadable, or not a directory.
    #[error("cannot access '{}': {reason}", path.display())]
    RootNotFound { path: PathBuf, reason: String },

    /// A settings file could not be read.
    #[error("cannot read config '{}': {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A settings file is not valid TOML for [`crate::config::Settings`].
    #[error("invalid config: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, AnalysisError>;

/// A non-fatal problem encountered while scanning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Issue {
    /// The entry was skipped; the scan carried on without it.
    EntryUnreadable { path: PathBuf, reason: String },
    /// The file is kept with no imports/exports and the default score.
    ParseFailure { path: PathBuf, reason: String },
}

impl Issue {
    pub fn path(&self) -> &PathBuf {
        match self {
            Issue::EntryUnreadable { path, .. } | Issue::ParseFailure { path, .. } => path,
        }
    }
}

/// Aggregate counters describing how gracefully a run degraded.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Diagnostics {
    pub issues: Vec<Issue>,
    pub resolved_imports: usize,
    pub unresolved_imports: usize,
    /// Specifiers that resolved back to the importing file itself.
    pub self_imports: usize,
}

impl Diagnostics {
    pub fn entries_skipped(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| matches!(i, Issue::EntryUnreadable { .. }))
            .count()
    }

    pub fn parse_failures(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| matches!(i, Issue::ParseFailure { .. }))
            .count()
    }
}
