use crate::{
    config::{Config, OutputFormat},
    error::{Error, Result},
    format::EntryFormatter,
    splitter::Partition,
};
use std::{
    fs,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
    sync::Arc,
};
use tracing::{debug, trace, warn};

/// Outcome of one writer task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionReport {
    /// 1-based partition ordinal
    pub partition: usize,

    /// Output file that was written
    pub output_path: PathBuf,

    /// Files whose content made it into the output
    pub written: usize,

    /// Files that could not be read or decoded and were left out
    pub skipped: Vec<PathBuf>,
}

/// Writes partitions to their output files.
pub(crate) struct Writer {
    output_dir: PathBuf,
    format: OutputFormat,
    formatter: Arc<dyn EntryFormatter>,
}

impl Writer {
    /// Creates a new writer from configuration.
    pub(crate) fn new(config: &Config) -> Self {
        Self {
            output_dir: config.output_dir.clone(),
            format: config.format,
            formatter: config.format.create_formatter(),
        }
    }

    /// Creates a writer that formats entries with `formatter` instead of the
    /// configured format's own.
    #[cfg(test)]
    pub(crate) fn with_formatter(config: &Config, formatter: Arc<dyn EntryFormatter>) -> Self {
        Self {
            formatter,
            ..Self::new(config)
        }
    }

    /// Generates the output file path for a 1-based partition ordinal.
    pub(crate) fn output_path(&self, ordinal: usize) -> PathBuf {
        self.output_dir.join(self.format.output_file_name(ordinal))
    }

    /// Writes one partition of `files` to its output file.
    ///
    /// The output file is created (or truncated) even when the partition is
    /// empty. Files that cannot be read as UTF-8 text are logged and left out;
    /// they never fail the partition.
    ///
    /// # Errors
    ///
    /// Returns an error if the output file cannot be created or written.
    pub(crate) fn write_partition(
        &self,
        partition: &Partition,
        files: &[PathBuf],
    ) -> Result<PartitionReport> {
        let path = self.output_path(partition.ordinal());
        let file = fs::File::create(&path).map_err(|e| Error::io(&path, e))?;
        let mut out = BufWriter::new(file);

        let mut written = 0;
        let mut skipped = Vec::new();

        for input in partition.slice(files) {
            let content = match read_text(input) {
                Ok(content) => content,
                Err(e) => {
                    warn!("Could not read file {}: {}", input.display(), e);
                    skipped.push(input.clone());
                    continue;
                }
            };

            trace!("Appending {} to {}", input.display(), path.display());
            self.formatter
                .write_entry(&mut out, input, &content)
                .map_err(|e| Error::io(&path, e))?;
            written += 1;
        }

        out.flush().map_err(|e| Error::io(&path, e))?;

        debug!(
            "Wrote part {} ({} files, {} skipped) to {}",
            partition.ordinal(),
            written,
            skipped.len(),
            path.display()
        );

        Ok(PartitionReport {
            partition: partition.ordinal(),
            output_path: path,
            written,
            skipped,
        })
    }
}

/// Reads a whole file as UTF-8 text.
///
/// # Errors
///
/// Returns [`Error::InvalidUtf8`] for undecodable content and [`Error::Io`]
/// for anything else.
pub(crate) fn read_text(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|e| Error::io(path, e))?;
    String::from_utf8(bytes).map_err(|_| Error::invalid_utf8(path))
}
