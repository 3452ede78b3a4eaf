//! Directory tree scanning
//!
//! [`Scanner`] walks a root directory into a [`crate::graph::ProjectGraph`],
//! classifying each file and reading source contents for the later passes.

mod config;
mod filter;
mod utils;
mod walker;

pub use config::{DEFAULT_EXCLUDES, ScanConfig};
pub use filter::ExcludeFilter;
pub use utils::{format_size, run_with_workers};
pub use walker::{ScanOutput, Scanner};
