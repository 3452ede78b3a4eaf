//! Scanner - builds the node arena for a directory tree

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::error::{AnalysisError, Issue, Result};
use crate::extractors::{FileContent, analyze_file};
use crate::file_utils::dotted_extension;
use crate::graph::{NodeIndex, NodeKind, ProjectGraph};

use super::config::ScanConfig;
use super::filter::ExcludeFilter;
use super::utils::{entry_order, modified_utc};

/// Result of a scan: the tree plus whatever was skipped along the way.
#[derive(Debug)]
pub struct ScanOutput {
    pub graph: ProjectGraph,
    pub issues: Vec<Issue>,
}

/// Entry collected while listing a directory.
struct ListedEntry {
    name: String,
    path: PathBuf,
    is_dir: bool,
    size: u64,
    modified: Option<chrono::DateTime<chrono::Utc>>,
}

/// Directory scanner.
///
/// Phase 1 walks the tree with an explicit stack and records every entry.
/// Phase 2 reads and scans file contents in parallel. Directory sizes are
/// summed last, once every file has been visited.
pub struct Scanner {
    config: ScanConfig,
}

impl Scanner {
    pub fn new(config: ScanConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    pub fn scan(&self, root: &Path) -> Result<ScanOutput> {
        let root = resolve_root(root)?;
        let name = root
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| root.display().to_string());

        let mut filter = ExcludeFilter::new(&self.config.exclude_patterns);
        if self.config.respect_gitignore {
            filter = filter.with_gitignore(&root);
        }

        let mut graph = ProjectGraph::with_root(&name, &root);
        let mut issues = Vec::new();

        self.walk(&mut graph, &filter, &mut issues)?;
        self.analyze_contents(&mut graph, &mut issues);
        aggregate_sizes(&mut graph);

        debug!(
            root = %root.display(),
            nodes = graph.len(),
            skipped = issues.len(),
            "scan complete"
        );
        Ok(ScanOutput { graph, issues })
    }

    fn walk(
        &self,
        graph: &mut ProjectGraph,
        filter: &ExcludeFilter,
        issues: &mut Vec<Issue>,
    ) -> Result<()> {
        let mut stack = vec![graph.root()];

        while let Some(dir) = stack.pop() {
            let node = graph.node(dir);
            if self.config.max_depth.is_some_and(|max| node.depth >= max) {
                continue;
            }
            let dir_path = node.path.clone();
            let is_root = node.parent.is_none();

            let entries = match list_dir(&dir_path, filter, issues) {
                Ok(entries) => entries,
                Err(e) if is_root => {
                    return Err(AnalysisError::RootNotFound {
                        path: dir_path,
                        reason: e.to_string(),
                    });
                }
                Err(e) => {
                    warn!(path = %dir_path.display(), error = %e, "skipping unreadable directory");
                    issues.push(Issue::EntryUnreadable {
                        path: dir_path,
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            let mut subdirs = Vec::new();
            for entry in entries {
                let kind = if entry.is_dir {
                    NodeKind::Directory
                } else {
                    NodeKind::File
                };
                let idx = graph.add_child(dir, &entry.name, kind, entry.path);
                if entry.is_dir {
                    subdirs.push(idx);
                } else {
                    let file = graph.node_mut(idx);
                    file.size = entry.size;
                    file.last_modified = entry.modified;
                    file.extension = dotted_extension(&file.path);
                }
            }
            stack.extend(subdirs.into_iter().rev());
        }
        Ok(())
    }

    fn analyze_contents(&self, graph: &mut ProjectGraph, issues: &mut Vec<Issue>) {
        let files: Vec<(NodeIndex, PathBuf)> = graph
            .files()
            .map(|(idx, node)| (idx, node.path.clone()))
            .collect();

        let max_size = self.config.max_file_size;
        let results: Vec<(NodeIndex, FileContent)> = files
            .par_iter()
            .map(|(idx, path)| (*idx, analyze_file(path, max_size)))
            .collect();

        for (idx, content) in results {
            let node = graph.node_mut(idx);
            if let Some(reason) = content.failure {
                warn!(path = %node.path.display(), error = %reason, "could not parse file");
                issues.push(Issue::ParseFailure {
                    path: node.path.clone(),
                    reason,
                });
            }
            node.raw_imports = content.imports;
            node.exports = content.exports;
            node.metrics = content.metrics;
        }
    }
}

fn resolve_root(root: &Path) -> Result<PathBuf> {
    let not_found = |reason: String| AnalysisError::RootNotFound {
        path: root.to_path_buf(),
        reason,
    };
    let canonical = fs::canonicalize(root).map_err(|e| not_found(e.to_string()))?;
    let metadata = fs::metadata(&canonical).map_err(|e| not_found(e.to_string()))?;
    if !metadata.is_dir() {
        return Err(not_found("Not a directory".to_string()));
    }
    Ok(canonical)
}

/// List a directory's non-excluded entries in sibling order.
///
/// Failing to open the directory is returned to the caller; failures on
/// individual entries are recorded and the entry skipped.
fn list_dir(
    path: &Path,
    filter: &ExcludeFilter,
    issues: &mut Vec<Issue>,
) -> std::io::Result<Vec<ListedEntry>> {
    let mut listed = Vec::new();

    for entry in fs::read_dir(path)? {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "skipping unreadable entry");
                issues.push(Issue::EntryUnreadable {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                });
                continue;
            }
        };
        let entry_path = entry.path();
        // Lossy conversion would let distinct names collide on one node id
        let name = match entry.file_name().into_string() {
            Ok(name) => name,
            Err(raw) => {
                warn!(path = %entry_path.display(), name = ?raw, "skipping non-UTF-8 name");
                issues.push(Issue::EntryUnreadable {
                    path: entry_path,
                    reason: "file name is not valid UTF-8".to_string(),
                });
                continue;
            }
        };

        let file_type = match entry.file_type() {
            Ok(t) => t,
            Err(e) => {
                warn!(path = %entry_path.display(), error = %e, "skipping unreadable entry");
                issues.push(Issue::EntryUnreadable {
                    path: entry_path,
                    reason: e.to_string(),
                });
                continue;
            }
        };

        // Symlinks are never followed
        if file_type.is_symlink() {
            debug!(path = %entry_path.display(), "skipping symlink");
            continue;
        }

        let is_dir = file_type.is_dir();
        if filter.is_excluded(&entry_path, &name, is_dir) {
            continue;
        }

        let (size, modified) = if is_dir {
            (0, None)
        } else {
            match entry.metadata() {
                Ok(meta) => (meta.len(), modified_utc(&meta)),
                Err(e) => {
                    warn!(path = %entry_path.display(), error = %e, "skipping unreadable entry");
                    issues.push(Issue::EntryUnreadable {
                        path: entry_path,
                        reason: e.to_string(),
                    });
                    continue;
                }
            }
        };

        listed.push(ListedEntry {
            name,
            path: entry_path,
            is_dir,
            size,
            modified,
        });
    }

    listed.sort_by(|a, b| entry_order((&a.name, a.is_dir), (&b.name, b.is_dir)));
    Ok(listed)
}

/// Sum file sizes into every ancestor directory.
fn aggregate_sizes(graph: &mut ProjectGraph) {
    for i in (1..graph.len()).rev() {
        let (size, parent) = {
            let node = graph.node(NodeIndex(i));
            (node.size, node.parent)
        };
        if let Some(parent) = parent {
            graph.node_mut(parent).size += size;
        }
    }
}
