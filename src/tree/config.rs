//! Configuration types for the scanner

use serde::{Deserialize, Serialize};

use crate::file_utils::DEFAULT_MAX_FILE_SIZE;

/// Names excluded from every scan unless the caller opts out.
pub const DEFAULT_EXCLUDES: &[&str] = &[
    "node_modules",
    ".git",
    ".next",
    "dist",
    "build",
    "coverage",
    ".DS_Store",
    "*.log",
];

/// Configuration for scanning behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Entry names to skip: exact match or glob such as `*.log`.
    pub exclude_patterns: Vec<String>,
    /// Also skip whatever the root `.gitignore` ignores.
    pub respect_gitignore: bool,
    /// Directories at this depth are kept but not descended into.
    pub max_depth: Option<usize>,
    /// Number of parallel workers for content analysis.
    /// 0 = auto-detect (use all available cores)
    /// 1 = sequential (no parallelism)
    /// N = use N worker threads
    pub parallel_workers: usize,
    /// Files larger than this are not read for content.
    pub max_file_size: u64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            exclude_patterns: DEFAULT_EXCLUDES.iter().map(|s| s.to_string()).collect(),
            respect_gitignore: false,
            max_depth: None,
            parallel_workers: 0,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

impl ScanConfig {
    /// A config with no exclusions at all.
    pub fn without_excludes() -> Self {
        Self {
            exclude_patterns: Vec::new(),
            ..Default::default()
        }
    }

    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_patterns.push(pattern.into());
        self
    }
}
