//! Pipeline driver: scan, resolve, estimate, and optionally lay out

use std::path::Path;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::config::Settings;
use crate::error::{Diagnostics, Result};
use crate::estimator::estimate;
use crate::graph::ProjectGraph;
use crate::layout::{self, LayoutConfig, LayoutResult};
use crate::output::Report;
use crate::resolver::resolve_imports;
use crate::stats::ProjectStats;
use crate::tree::{Scanner, run_with_workers};

/// A scanned, resolved and scored project.
#[derive(Debug)]
pub struct Analysis {
    pub graph: ProjectGraph,
    pub diagnostics: Diagnostics,
    pub elapsed: Duration,
}

impl Analysis {
    /// Lay out the graph from scratch with `config`.
    pub fn layout(&self, config: &LayoutConfig) -> LayoutResult {
        layout::layout(&self.graph, config)
    }

    pub fn stats(&self) -> ProjectStats {
        ProjectStats::from_graph(&self.graph)
    }

    pub fn report(&self, layout: Option<LayoutResult>) -> Report {
        Report::new(self, layout)
    }
}

/// Runs the whole pipeline with one set of [`Settings`].
pub struct Analyzer {
    settings: Settings,
}

impl Analyzer {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Scan `root` and build the scored dependency graph.
    ///
    /// Fails only when `root` cannot be accessed as a directory.
    pub fn analyze(&self, root: &Path) -> Result<Analysis> {
        let started = Instant::now();
        let workers = self.settings.scan.parallel_workers;

        run_with_workers(workers, || {
            let scanner = Scanner::new(self.settings.scan.clone());
            let output = scanner.scan(root)?;
            let mut graph = output.graph;
            debug!(nodes = graph.len(), "scan complete");

            let stats = resolve_imports(&mut graph);
            estimate(&mut graph, &self.settings.complexity);

            let diagnostics = Diagnostics {
                issues: output.issues,
                resolved_imports: stats.resolved,
                unresolved_imports: stats.unresolved,
                self_imports: stats.self_imports,
            };
            let elapsed = started.elapsed();
            info!(
                root = %graph.root_node().path.display(),
                nodes = graph.len(),
                resolved = diagnostics.resolved_imports,
                unresolved = diagnostics.unresolved_imports,
                issues = diagnostics.issues.len(),
                elapsed = %humantime::format_duration(truncate_millis(elapsed)),
                "analysis complete"
            );

            Ok(Analysis {
                graph,
                diagnostics,
                elapsed,
            })
        })
    }

    /// Analyze `root` and lay it out with the configured strategy.
    pub fn analyze_with_layout(&self, root: &Path) -> Result<(Analysis, LayoutResult)> {
        let analysis = self.analyze(root)?;
        let layout = run_with_workers(self.settings.scan.parallel_workers, || {
            analysis.layout(&self.settings.layout)
        });
        Ok((analysis, layout))
    }
}

/// Drop sub-millisecond precision so durations print compactly.
pub(crate) fn truncate_millis(d: Duration) -> Duration {
    Duration::from_millis(d.as_millis() as u64)
}
