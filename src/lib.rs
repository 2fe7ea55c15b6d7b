//! # concat-parts
//!
//! Concatenates the source files of a directory tree into a fixed number of
//! output files, as plain text or as Markdown with fenced code blocks.
//!
//! ## Features
//!
//! - Extension allow-list and exact path-segment ignore patterns
//! - Balanced split by file count into exactly `N` output files
//! - Parallel writing, one task per output file
//! - Unreadable or non-UTF-8 files are reported and skipped, never fatal
//!
//! ## Quick Start
//!
//! ```no_run
//! use concat_parts::{Config, ExtensionSet, IgnoreSet, OutputFormat, Pipeline};
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = Config::builder()
//!     .root_dir("./my-project")
//!     .output_dir("./out")
//!     .num_files(4)
//!     .ignore(IgnoreSet::parse("node_modules,.git"))
//!     .extensions(ExtensionSet::parse(".py,.js"))
//!     .format(OutputFormat::Markdown)
//!     .build()?;
//!
//! Pipeline::new(config)?.run()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! 1. **Scanner**: Walks the root and keeps files accepted by the [`PathFilter`]
//! 2. **Splitter**: Cuts the file list into `N` contiguous [`Partition`]s
//! 3. **Dispatcher**: Runs one writer task per partition on a thread pool
//! 4. **Writer**: Appends each file, with its header, to the partition's output

#![warn(
    missing_docs,
    rust_2018_idioms,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery
)]
#![allow(clippy::module_name_repetitions)]

mod config;
mod dispatcher;
mod error;
mod filter;
mod format;
mod highlight;
mod pipeline;
mod progress;
mod scanner;
mod splitter;
mod writer;

pub use config::{Config, ConfigBuilder, OutputFormat};
pub use dispatcher::Dispatcher;
pub use error::{Error, Result};
pub use filter::{ExtensionSet, IgnoreSet, PathFilter, DEFAULT_EXTENSIONS};
pub use format::EntryFormatter;
pub use highlight::{Highlighted, Highlighter};
pub use pipeline::{Pipeline, RunStats};
pub use scanner::enumerate_files;
pub use splitter::{partition, Partition};
pub use writer::PartitionReport;

/// Runs the complete concatenation pipeline with the given configuration.
///
/// # Errors
///
/// Returns an error if:
/// - Configuration is invalid
/// - The root directory cannot be walked
/// - The output directory cannot be created
/// - Any writer task fails
///
/// # Examples
///
/// ```no_run
/// use concat_parts::{Config, run};
///
/// # fn main() -> anyhow::Result<()> {
/// let config = Config::builder()
///     .root_dir(".")
///     .num_files(2)
///     .build()?;
///
/// run(config)?;
/// # Ok(())
/// # }
/// ```
pub fn run(config: Config) -> Result<RunStats> {
    Pipeline::new(config)?.run()
}
