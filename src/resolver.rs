//! Import specifier resolution
//!
//! Turns each file's raw specifiers into edges between nodes. Strategies are
//! tried in order and the first hit wins:
//!
//! 1. exact path of an existing file
//! 2. path plus one of [`EXTENSIONS`]
//! 3. `<path>/index.<ext>`
//! 4. the same three checks after stripping leading project-root segments
//!    ([`ROOT_SEGMENTS`]) from both sides
//!
//! Specifiers that match nothing are dropped and only counted.

use std::collections::HashMap;

use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;

use crate::graph::{NodeIndex, ProjectGraph};

/// Extensions tried when a specifier omits one.
pub const EXTENSIONS: &[&str] = &[".ts", ".tsx", ".js", ".jsx"];

/// Leading directory names treated as interchangeable project roots.
pub const ROOT_SEGMENTS: &[&str] = &["src", "app", "lib", "source", "packages"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolveStrategy {
    Exact,
    Extension,
    DirectoryIndex,
    RootNormalized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub target: NodeIndex,
    pub strategy: ResolveStrategy,
}

/// Counters reported by [`resolve_imports`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveStats {
    /// Specifiers that resolved to another file.
    pub resolved: usize,
    pub unresolved: usize,
    /// Specifiers that resolved back to the importing file.
    pub self_imports: usize,
}

/// Collapse `.` and `..` segments. `None` if the path climbs above the root.
fn normalize(path: &str) -> Option<String> {
    let mut parts: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                parts.pop()?;
            }
            other => parts.push(other),
        }
    }
    Some(parts.join("/"))
}

fn strip_root_segments(path: &str) -> &str {
    let mut rest = path;
    loop {
        let (head, tail) = match rest.split_once('/') {
            Some((head, tail)) => (head, tail),
            None => return rest,
        };
        if ROOT_SEGMENTS.contains(&head) {
            rest = tail;
        } else {
            return rest;
        }
    }
}

fn join_rel(dir: &str, name: &str) -> String {
    if dir.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", dir, name)
    }
}

/// Read-only lookup over a scanned graph's files.
pub struct Resolver<'g> {
    graph: &'g ProjectGraph,
    files: HashMap<&'g str, NodeIndex>,
    stripped: HashMap<&'g str, NodeIndex>,
}

impl<'g> Resolver<'g> {
    pub fn new(graph: &'g ProjectGraph) -> Self {
        let mut files = HashMap::new();
        let mut stripped = HashMap::new();
        for (idx, node) in graph.files() {
            files.insert(node.rel_path.as_str(), idx);
            // First file in arena order wins a collision
            stripped
                .entry(strip_root_segments(&node.rel_path))
                .or_insert(idx);
        }
        Self {
            graph,
            files,
            stripped,
        }
    }

    /// Resolve one specifier written in `importer`.
    pub fn resolve(&self, importer: NodeIndex, spec: &str) -> Option<Resolution> {
        let target = self.target_path(importer, spec)?;

        let hit = |strategy, index: &HashMap<&'g str, NodeIndex>, path: &str| {
            index.get(path).map(|&target| Resolution { target, strategy })
        };

        hit(ResolveStrategy::Exact, &self.files, target.as_str())
            .or_else(|| self.with_inference(&self.files, &target, hit))
            .or_else(|| {
                let stripped = strip_root_segments(&target);
                hit(ResolveStrategy::RootNormalized, &self.stripped, stripped).or_else(|| {
                    self.with_inference(&self.stripped, stripped, hit)
                        .map(|r| Resolution {
                            strategy: ResolveStrategy::RootNormalized,
                            ..r
                        })
                })
            })
    }

    fn with_inference<F>(
        &self,
        index: &HashMap<&'g str, NodeIndex>,
        base: &str,
        hit: F,
    ) -> Option<Resolution>
    where
        F: Fn(ResolveStrategy, &HashMap<&'g str, NodeIndex>, &str) -> Option<Resolution>,
    {
        EXTENSIONS
            .iter()
            .find_map(|ext| {
                let candidate = format!("{}{}", base, ext);
                hit(ResolveStrategy::Extension, index, candidate.as_str())
            })
            .or_else(|| {
                EXTENSIONS.iter().find_map(|ext| {
                    let candidate = join_rel(base, &format!("index{}", ext));
                    hit(ResolveStrategy::DirectoryIndex, index, candidate.as_str())
                })
            })
    }

    /// Root-relative target path for a specifier.
    fn target_path(&self, importer: NodeIndex, spec: &str) -> Option<String> {
        if let Some(rest) = spec.strip_prefix("@/").or_else(|| spec.strip_prefix("~/")) {
            return normalize(rest);
        }
        if let Some(rest) = spec.strip_prefix('/') {
            return normalize(rest);
        }
        let importer_path = &self.graph.node(importer).rel_path;
        let dir = importer_path
            .rsplit_once('/')
            .map(|(dir, _)| dir)
            .unwrap_or("");
        normalize(&join_rel(dir, spec))
    }
}

/// Resolve every file's raw imports and record the edges on both endpoints.
///
/// Lookups run in parallel per importing file; edges are then merged in
/// arena order so the result is the same for any thread count.
pub fn resolve_imports(graph: &mut ProjectGraph) -> ResolveStats {
    let mut stats = ResolveStats::default();

    let per_file: Vec<(NodeIndex, Vec<NodeIndex>, usize, usize)> = {
        let graph: &ProjectGraph = graph;
        let resolver = Resolver::new(graph);
        let sources: Vec<NodeIndex> = graph
            .files()
            .filter(|(_, n)| !n.raw_imports.is_empty())
            .map(|(idx, _)| idx)
            .collect();

        sources
            .par_iter()
            .map(|&source| {
                let mut targets = Vec::new();
                let mut unresolved = 0;
                let mut self_imports = 0;
                for spec in &graph.node(source).raw_imports {
                    match resolver.resolve(source, spec) {
                        Some(r) if r.target == source => self_imports += 1,
                        Some(r) => targets.push(r.target),
                        None => unresolved += 1,
                    }
                }
                (source, targets, unresolved, self_imports)
            })
            .collect()
    };

    for (source, targets, unresolved, self_imports) in per_file {
        stats.unresolved += unresolved;
        stats.self_imports += self_imports;
        stats.resolved += targets.len();

        let source_id = graph.node(source).id.clone();
        for target in targets {
            let target_id = graph.node(target).id.clone();
            graph.node_mut(source).imports.insert(target_id);
            graph.node_mut(target).imported_by.insert(source_id.clone());
        }
    }

    debug!(
        resolved = stats.resolved,
        unresolved = stats.unresolved,
        self_imports = stats.self_imports,
        "import resolution complete"
    );
    stats
}
