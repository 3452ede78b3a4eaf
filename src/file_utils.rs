//! Shared file reading utilities for the content-analysis pass
//!
//! The size limit is passed in explicitly from [`crate::tree::ScanConfig`]
//! rather than held in process-wide state.

use std::path::Path;

use crate::language::Language;

/// Default maximum file size for content analysis (1MB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 1_000_000;

/// Outcome of trying to read a file's content for analysis.
#[derive(Debug)]
pub enum SourceRead {
    /// Source file read and decoded as UTF-8.
    Source { content: String, language: Language },
    /// Extension is not a recognised source language; content not needed.
    NotSource,
    /// Larger than the configured limit; content intentionally not read.
    TooLarge { size: u64 },
    /// Recognised source file that could not be read or decoded.
    Failed { reason: String },
}

/// Read a source file if it is a supported language and within `max_size`.
///
/// A file exactly at `max_size` is still read (the check is `>`).
pub fn read_source_file(path: &Path, max_size: u64) -> SourceRead {
    let Some(language) = Language::from_path(path) else {
        return SourceRead::NotSource;
    };

    match path.metadata() {
        Ok(metadata) if metadata.len() > max_size => {
            return SourceRead::TooLarge {
                size: metadata.len(),
            };
        }
        Ok(_) => {}
        Err(e) => {
            return SourceRead::Failed {
                reason: e.to_string(),
            };
        }
    }

    match std::fs::read_to_string(path) {
        Ok(content) => SourceRead::Source {
            content: strip_bom(content),
            language,
        },
        Err(e) => SourceRead::Failed {
            reason: e.to_string(),
        },
    }
}

fn strip_bom(content: String) -> String {
    match content.strip_prefix('\u{FEFF}') {
        Some(rest) => rest.to_string(),
        None => content,
    }
}

/// Lowercased extension with a leading dot, e.g. `.tsx`.
pub fn dotted_extension(path: &Path) -> Option<String> {
    path.extension()
        .map(|e| format!(".{}", e.to_string_lossy().to_lowercase()))
}
