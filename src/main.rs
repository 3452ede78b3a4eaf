//! CLI entry point for codeorbit

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process;

use clap::{Parser, ValueEnum};
use termcolor::ColorChoice;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use codeorbit::{Analyzer, LayoutStrategy, Settings, print_json, print_stats};

/// Color output mode
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum ColorMode {
    /// Auto-detect based on terminal and environment
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Determine whether to use color output based on mode and environment.
fn should_use_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => {
            // https://no-color.org/
            if std::env::var_os("NO_COLOR").is_some() {
                return false;
            }
            if std::env::var_os("FORCE_COLOR").is_some() {
                return true;
            }
            if std::env::var("TERM").map(|t| t == "dumb").unwrap_or(false) {
                return false;
            }
            std::io::stdout().is_terminal()
        }
    }
}

/// Initial placement strategy
#[derive(Debug, Clone, Copy, ValueEnum)]
enum StrategyArg {
    /// Fibonacci shells around each parent directory
    Sphere,
    /// Category districts around a central core
    District,
    /// Nested folder bubbles
    Bubble,
}

impl From<StrategyArg> for LayoutStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Sphere => LayoutStrategy::HierarchicalSphere,
            StrategyArg::District => LayoutStrategy::DistrictCluster,
            StrategyArg::Bubble => LayoutStrategy::FolderBubble,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "codeorbit")]
#[command(about = "Scan a JavaScript/TypeScript project into a 3D dependency map")]
#[command(version)]
struct Args {
    /// Project root to analyze
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Exclude entries matching pattern (exact name, glob, or *suffix)
    #[arg(short = 'I', long = "ignore", value_name = "PATTERN")]
    ignore: Vec<String>,

    /// Do not apply the built-in exclusion list (node_modules, dist, ...)
    #[arg(long = "no-default-excludes")]
    no_default_excludes: bool,

    /// Also skip entries matched by the root .gitignore
    #[arg(long = "gitignore")]
    gitignore: bool,

    /// Descend only LEVEL directories deep
    #[arg(short = 'L', long = "level", value_name = "LEVEL")]
    level: Option<usize>,

    /// Initial placement strategy
    #[arg(long = "strategy", value_enum)]
    strategy: Option<StrategyArg>,

    /// Force relaxation iterations
    #[arg(long = "iterations", value_name = "N")]
    iterations: Option<usize>,

    /// Seed for deterministic jitter and tie-breaking
    #[arg(long = "seed", value_name = "N")]
    seed: Option<u64>,

    /// Skip the layout step
    #[arg(long = "no-layout")]
    no_layout: bool,

    /// Print the full report as JSON
    #[arg(long = "json")]
    json: bool,

    /// Number of worker threads (0 = one per CPU)
    #[arg(short = 'j', long = "jobs", value_name = "N")]
    jobs: Option<usize>,

    /// Skip reading files larger than SIZE (e.g. 500K, 2M)
    #[arg(long = "max-file-size", value_name = "SIZE")]
    max_file_size: Option<String>,

    /// Load settings from a TOML file; flags override it
    #[arg(long = "config", value_name = "FILE")]
    config: Option<PathBuf>,

    /// When to use colors
    #[arg(long = "color", value_name = "WHEN", default_value = "auto")]
    color: ColorMode,

    /// Log pipeline progress to stderr
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

/// Parse a file size string like "5M", "100K", "1G" into bytes.
/// Supports suffixes: K/KB (1024), M/MB (1024^2), G/GB (1024^3)
/// Without suffix, interprets as bytes.
fn parse_file_size(s: &str) -> Result<u64, String> {
    let s = s.trim().to_uppercase();
    let (num_str, multiplier) = if let Some(n) = s.strip_suffix("GB") {
        (n, 1024 * 1024 * 1024)
    } else if let Some(n) = s.strip_suffix('G') {
        (n, 1024 * 1024 * 1024)
    } else if let Some(n) = s.strip_suffix("MB") {
        (n, 1024 * 1024)
    } else if let Some(n) = s.strip_suffix('M') {
        (n, 1024 * 1024)
    } else if let Some(n) = s.strip_suffix("KB") {
        (n, 1024)
    } else if let Some(n) = s.strip_suffix('K') {
        (n, 1024)
    } else {
        (s.as_str(), 1)
    };

    let num: u64 = num_str
        .trim()
        .parse()
        .map_err(|_| format!("invalid number: {}", num_str))?;

    Ok(num * multiplier)
}

fn init_logging(verbose: bool) {
    let default = if verbose { "codeorbit=debug" } else { "codeorbit=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Apply command-line overrides on top of file or default settings.
fn apply_args(settings: &mut Settings, args: &Args) -> Result<(), String> {
    let scan = &mut settings.scan;
    if args.no_default_excludes {
        scan.exclude_patterns.clear();
    }
    scan.exclude_patterns.extend(args.ignore.iter().cloned());
    if args.gitignore {
        scan.respect_gitignore = true;
    }
    if args.level.is_some() {
        scan.max_depth = args.level;
    }
    if let Some(jobs) = args.jobs {
        scan.parallel_workers = jobs;
    }
    if let Some(ref size) = args.max_file_size {
        scan.max_file_size = parse_file_size(size)
            .map_err(|e| format!("invalid --max-file-size '{}': {}", size, e))?;
    }

    let layout = &mut settings.layout;
    if let Some(strategy) = args.strategy {
        layout.strategy = strategy.into();
    }
    if let Some(iterations) = args.iterations {
        layout.iterations = iterations;
    }
    if let Some(seed) = args.seed {
        layout.seed = seed;
    }
    Ok(())
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    let mut settings = match &args.config {
        Some(path) => Settings::load(path).unwrap_or_else(|e| {
            eprintln!("codeorbit: {}", e);
            process::exit(1);
        }),
        None => Settings::default(),
    };
    if let Err(e) = apply_args(&mut settings, &args) {
        eprintln!("codeorbit: {}", e);
        process::exit(1);
    }

    let analyzer = Analyzer::new(settings);
    let with_layout = args.json && !args.no_layout;
    let outcome = if with_layout {
        analyzer
            .analyze_with_layout(&args.path)
            .map(|(analysis, layout)| (analysis, Some(layout)))
    } else {
        analyzer.analyze(&args.path).map(|analysis| (analysis, None))
    };
    let (analysis, layout) = outcome.unwrap_or_else(|e| {
        eprintln!("codeorbit: {}", e);
        process::exit(1);
    });

    let result = if args.json {
        print_json(&analysis.report(layout))
    } else {
        let color = if should_use_color(args.color) {
            ColorChoice::Always
        } else {
            ColorChoice::Never
        };
        print_stats(&analysis.stats(), &analysis.diagnostics, analysis.elapsed, color)
    };

    if let Err(e) = result {
        eprintln!("codeorbit: error writing output: {}", e);
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_file_size() {
        assert_eq!(parse_file_size("100"), Ok(100));
        assert_eq!(parse_file_size("1K"), Ok(1024));
        assert_eq!(parse_file_size("2mb"), Ok(2 * 1024 * 1024));
        assert_eq!(parse_file_size("1G"), Ok(1024 * 1024 * 1024));
        assert!(parse_file_size("lots").is_err());
    }

    #[test]
    fn test_apply_args_overrides() {
        let args = Args::parse_from([
            "codeorbit",
            "proj",
            "-I",
            "vendor",
            "--no-default-excludes",
            "-L",
            "2",
            "--strategy",
            "bubble",
            "--seed",
            "9",
            "-j",
            "3",
        ]);
        let mut settings = Settings::default();
        apply_args(&mut settings, &args).unwrap();

        assert_eq!(settings.scan.exclude_patterns, vec!["vendor".to_string()]);
        assert_eq!(settings.scan.max_depth, Some(2));
        assert_eq!(settings.scan.parallel_workers, 3);
        assert_eq!(settings.layout.strategy, LayoutStrategy::FolderBubble);
        assert_eq!(settings.layout.seed, 9);
        assert_eq!(settings.layout.iterations, 50);
    }

    #[test]
    fn test_apply_args_rejects_bad_size() {
        let args = Args::parse_from(["codeorbit", "--max-file-size", "huge"]);
        let mut settings = Settings::default();
        assert!(apply_args(&mut settings, &args).is_err());
    }
}
