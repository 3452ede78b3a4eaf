//! Project statistics collection and display
//!
//! This module aggregates statistics about an analyzed project: node counts,
//! total size, complexity and breakdowns by category and extension.

use std::collections::BTreeMap;
use std::io::{self, Write};
use std::time::Duration;

use serde::Serialize;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::category::Category;
use crate::error::Diagnostics;
use crate::graph::ProjectGraph;
use crate::tree::format_size;

/// Collected statistics about a project.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProjectStats {
    pub files: usize,
    pub directories: usize,
    /// Sum of file sizes in bytes
    pub total_size: u64,
    /// Non-blank lines across all readable source files
    pub total_lines: usize,
    pub import_edges: usize,
    pub average_complexity: f64,
    pub max_complexity: f64,
    /// File counts per category, directories excluded
    pub by_category: BTreeMap<Category, usize>,
    /// File counts per dotted extension; files without one are keyed `""`
    pub by_extension: BTreeMap<String, usize>,
}

impl ProjectStats {
    pub fn from_graph(graph: &ProjectGraph) -> Self {
        let mut stats = ProjectStats::default();
        let mut complexity_sum = 0.0;

        for node in graph.nodes() {
            if node.is_dir() {
                stats.directories += 1;
                continue;
            }
            stats.files += 1;
            stats.total_size += node.size;
            stats.import_edges += node.imports.len();
            stats.total_lines += node.metrics.as_ref().map_or(0, |m| m.lines);
            complexity_sum += node.complexity;
            stats.max_complexity = stats.max_complexity.max(node.complexity);
            *stats.by_category.entry(node.category).or_default() += 1;
            *stats
                .by_extension
                .entry(node.extension.clone().unwrap_or_default())
                .or_default() += 1;
        }

        if stats.files > 0 {
            stats.average_complexity = complexity_sum / stats.files as f64;
        }
        stats
    }
}

/// Print statistics to stdout with optional color.
pub fn print_stats(
    stats: &ProjectStats,
    diagnostics: &Diagnostics,
    elapsed: Duration,
    color: ColorChoice,
) -> io::Result<()> {
    let mut stdout = StandardStream::stdout(color);
    write_stats(&mut stdout, stats, diagnostics, elapsed)
}

/// Write the statistics summary to any color-capable writer.
pub fn write_stats<W: WriteColor>(
    out: &mut W,
    stats: &ProjectStats,
    diagnostics: &Diagnostics,
    elapsed: Duration,
) -> io::Result<()> {
    let mut bold = ColorSpec::new();
    bold.set_bold(true);
    out.set_color(&bold)?;
    writeln!(out, "Project Statistics")?;
    out.reset()?;
    writeln!(out, "──────────────────")?;

    writeln!(out, "Files:        {} total", format_number(stats.files))?;
    writeln!(out, "Directories:  {}", format_number(stats.directories))?;
    writeln!(out, "Size:         {}", format_size(stats.total_size))?;
    writeln!(out, "Lines:        {}", format_number(stats.total_lines))?;
    writeln!(out, "Imports:      {} edges", format_number(stats.import_edges))?;
    writeln!(
        out,
        "Complexity:   {:.2} avg, {:.2} max",
        stats.average_complexity, stats.max_complexity
    )?;
    writeln!(out)?;

    let mut label = ColorSpec::new();
    label.set_fg(Some(Color::Cyan));

    if !stats.by_category.is_empty() {
        out.set_color(&bold)?;
        writeln!(out, "By Category:")?;
        out.reset()?;

        let mut rows: Vec<_> = stats.by_category.iter().collect();
        rows.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
        for (category, count) in rows {
            write!(out, "  ")?;
            out.set_color(&label)?;
            write!(out, "{:<12}", category.name())?;
            out.reset()?;
            writeln!(out, "{:>5} files", count)?;
        }
        writeln!(out)?;
    }

    if !stats.by_extension.is_empty() {
        out.set_color(&bold)?;
        writeln!(out, "By Extension:")?;
        out.reset()?;

        let mut rows: Vec<_> = stats.by_extension.iter().collect();
        rows.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
        for (ext, count) in rows {
            let ext = if ext.is_empty() { "(none)" } else { ext.as_str() };
            write!(out, "  ")?;
            out.set_color(&label)?;
            write!(out, "{:<12}", ext)?;
            out.reset()?;
            writeln!(out, "{:>5} files", count)?;
        }
        writeln!(out)?;
    }

    let imports_total = diagnostics.resolved_imports + diagnostics.unresolved_imports;
    writeln!(
        out,
        "Resolved:     {}/{} imports",
        diagnostics.resolved_imports, imports_total
    )?;
    if !diagnostics.issues.is_empty() {
        let mut warn = ColorSpec::new();
        warn.set_fg(Some(Color::Yellow));
        out.set_color(&warn)?;
        writeln!(
            out,
            "Skipped:      {} unreadable, {} unparsable",
            diagnostics.entries_skipped(),
            diagnostics.parse_failures()
        )?;
        out.reset()?;
    }

    out.set_color(&bold)?;
    write!(out, "Elapsed:      ")?;
    out.reset()?;
    writeln!(
        out,
        "{}",
        humantime::format_duration(crate::analysis::truncate_millis(elapsed))
    )?;

    Ok(())
}

/// Format a number with thousand separators.
fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();

    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.insert(0, ',');
        }
        result.insert(0, c);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::fixtures::graph_with_files;
    use termcolor::NoColor;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(1234567), "1,234,567");
    }

    #[test]
    fn test_from_graph_counts() {
        let mut graph = graph_with_files(&[
            ("src/components/Button.tsx", &[]),
            ("src/hooks/useAuth.ts", &[]),
            ("README.md", &[]),
        ]);
        for i in 0..graph.len() {
            let node = graph.node_mut(crate::graph::NodeIndex(i));
            if node.is_file() {
                node.size = 10;
                node.complexity = 2.0;
                node.extension = crate::file_utils::dotted_extension(&node.path);
            }
        }
        graph.node_mut(crate::graph::NodeIndex(graph.len() - 1)).complexity = 5.0;

        let stats = ProjectStats::from_graph(&graph);
        assert_eq!(stats.files, 3);
        // root, src, components, hooks
        assert_eq!(stats.directories, 4);
        assert_eq!(stats.total_size, 30);
        assert_eq!(stats.max_complexity, 5.0);
        assert!((stats.average_complexity - 3.0).abs() < 1e-12);
        assert_eq!(stats.by_category.get(&Category::Component), Some(&1));
        assert_eq!(stats.by_category.get(&Category::Hook), Some(&1));
        assert_eq!(stats.by_extension.get(".md"), Some(&1));
        assert!(!stats.by_category.contains_key(&Category::Directory));
    }

    #[test]
    fn test_empty_graph_stats() {
        let graph = graph_with_files(&[]);
        let stats = ProjectStats::from_graph(&graph);
        assert_eq!(stats.files, 0);
        assert_eq!(stats.directories, 1);
        assert_eq!(stats.average_complexity, 0.0);
        assert!(stats.by_category.is_empty());
    }

    #[test]
    fn test_write_stats_plain() {
        let graph = graph_with_files(&[("src/components/Button.tsx", &[])]);
        let stats = ProjectStats::from_graph(&graph);
        let diagnostics = Diagnostics {
            resolved_imports: 3,
            unresolved_imports: 1,
            ..Default::default()
        };

        let mut out = NoColor::new(Vec::new());
        write_stats(&mut out, &stats, &diagnostics, Duration::from_millis(1500)).unwrap();
        let text = String::from_utf8(out.into_inner()).unwrap();

        assert!(text.contains("Project Statistics"));
        assert!(text.contains("Files:        1 total"));
        assert!(text.contains("component"));
        assert!(text.contains("Resolved:     3/4 imports"));
        assert!(text.contains("Elapsed:      1s 500ms"));
        assert!(!text.contains("Skipped"));
    }
}
