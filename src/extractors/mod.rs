//! Regex-level source scanning
//!
//! Extractors work on already-decoded file content and never fail: content
//! they cannot make sense of yields empty output. Reading the file, and
//! deciding whether it is worth reading at all, is [`analyze_file`]'s job.
//!
//! - [`imports`]: internal import specifiers and exported names
//! - [`structure`]: structural signal counts feeding the complexity score

pub mod imports;
pub mod structure;

use std::path::Path;

use tracing::debug;

use crate::file_utils::{SourceRead, read_source_file};
use crate::language::Language;

pub use imports::{ExportExtractor, ImportExtractor, extract_exports, extract_imports};
pub use structure::{SourceMetrics, StructureExtractor, measure};

/// Common interface for content extractors.
pub trait Extractor {
    /// The output type produced by this extractor.
    type Output;

    /// Extract from decoded file content.
    fn extract(&self, content: &str, language: Language) -> Self::Output;

    /// A descriptive name for logging (e.g. "imports").
    fn name(&self) -> &'static str;
}

/// Everything the scanner learns from one file's content.
#[derive(Debug, Clone, Default)]
pub struct FileContent {
    pub imports: Vec<String>,
    pub exports: Vec<String>,
    /// `None` for non-source files and files that were not read.
    pub metrics: Option<SourceMetrics>,
    /// Set when a source file could not be read or decoded.
    pub failure: Option<String>,
}

/// Read and scan a single file.
pub fn analyze_file(path: &Path, max_size: u64) -> FileContent {
    match read_source_file(path, max_size) {
        SourceRead::Source { content, language } => FileContent {
            imports: ImportExtractor.extract(&content, language),
            exports: ExportExtractor.extract(&content, language),
            metrics: Some(StructureExtractor.extract(&content, language)),
            failure: None,
        },
        SourceRead::NotSource => FileContent::default(),
        SourceRead::TooLarge { size } => {
            debug!(path = %path.display(), size, "skipping content of large file");
            FileContent::default()
        }
        SourceRead::Failed { reason } => FileContent {
            failure: Some(reason),
            ..Default::default()
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_analyze_source_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.ts");
        fs::write(
            &path,
            concat!(
                "import { b } from './b';\n",
                "import React from 'react';\n",
                "export function a() { if (b) { return 1; } }\n",
            ),
        )
        .unwrap();

        let content = analyze_file(&path, 1_000_000);
        assert_eq!(content.imports, vec!["./b"]);
        assert_eq!(content.exports, vec!["a"]);
        let metrics = content.metrics.unwrap();
        assert_eq!(metrics.lines, 3);
        assert_eq!(metrics.control_flow, 1);
        assert!(content.failure.is_none());
    }

    #[test]
    fn test_analyze_non_source_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("README.md");
        fs::write(&path, "import x from './x'").unwrap();

        let content = analyze_file(&path, 1_000_000);
        assert!(content.imports.is_empty());
        assert!(content.metrics.is_none());
        assert!(content.failure.is_none());
    }

    #[test]
    fn test_analyze_undecodable_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.js");
        fs::write(&path, [0xC3, 0x28, 0xFF]).unwrap();

        let content = analyze_file(&path, 1_000_000);
        assert!(content.imports.is_empty());
        assert!(content.exports.is_empty());
        assert!(content.failure.is_some());
    }

    #[test]
    fn test_analyze_large_file_skips_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("big.js");
        fs::write(&path, "import a from './a';\n".repeat(10)).unwrap();

        let content = analyze_file(&path, 16);
        assert!(content.imports.is_empty());
        assert!(content.metrics.is_none());
        assert!(content.failure.is_none());
    }
}
