//! Shared utility functions for scanning

use std::cmp::Ordering;
use std::fs::Metadata;

use chrono::{DateTime, Utc};
use tracing::warn;

/// Run `op` on a rayon pool sized by `workers`.
///
/// 0 uses rayon's global pool; N builds a dedicated pool of N threads. If the
/// dedicated pool cannot be built the global pool is used instead.
pub fn run_with_workers<R, F>(workers: usize, op: F) -> R
where
    R: Send,
    F: FnOnce() -> R + Send,
{
    if workers == 0 {
        return op();
    }
    match rayon::ThreadPoolBuilder::new().num_threads(workers).build() {
        Ok(pool) => pool.install(op),
        Err(e) => {
            warn!(workers, error = %e, "falling back to the global thread pool");
            op()
        }
    }
}

/// Sibling order: directories first, then by name.
pub fn entry_order(a: (&str, bool), b: (&str, bool)) -> Ordering {
    b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0))
}

/// Modification time as UTC, if the platform reports one.
pub fn modified_utc(metadata: &Metadata) -> Option<DateTime<Utc>> {
    metadata.modified().ok().map(DateTime::<Utc>::from)
}

/// Format a size in bytes to human-readable format.
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1}G", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1}M", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1}K", bytes as f64 / KB as f64)
    } else {
        format!("{}B", bytes)
    }
}
