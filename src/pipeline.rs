use crate::{
    config::Config,
    dispatcher::Dispatcher,
    error::{Error, Result},
    scanner::Scanner,
    splitter::{partition, Partition},
    writer::PartitionReport,
};
use std::{
    fs,
    path::PathBuf,
    time::{Duration, Instant},
};
use tracing::{info, instrument, warn};

/// Statistics collected during a run.
#[derive(Debug, Clone)]
pub struct RunStats {
    /// Eligible files found under the root
    pub files_found: usize,

    /// Files whose content was written
    pub files_written: usize,

    /// Files left out because they could not be read
    pub files_skipped: usize,

    /// Number of output files produced (or planned, in a dry run)
    pub partitions: usize,

    /// Output files that received no content
    pub empty_partitions: usize,

    /// Total execution time
    pub duration: Duration,

    /// Time spent walking the root
    pub scan_duration: Duration,

    /// Time spent in writer tasks
    pub write_duration: Duration,

    /// Output directory path
    pub output_directory: String,

    /// Per-partition results, in partition order
    pub reports: Vec<PartitionReport>,
}

impl RunStats {
    /// Prints a human-readable summary to stdout.
    pub fn print_summary(&self) {
        println!();
        for line in self.summary_lines() {
            println!("{line}");
        }
        println!();
    }

    fn summary_lines(&self) -> Vec<String> {
        vec![
            BOX_TOP.to_string(),
            box_row("                Concatenation Summary"),
            BOX_DIVIDER.to_string(),
            box_row(&format!("Files Found:          {:>8}", self.files_found)),
            box_row(&format!("  - Written:          {:>8}", self.files_written)),
            box_row(&format!("  - Skipped:          {:>8}", self.files_skipped)),
            box_row(""),
            box_row(&format!("Output Files:         {:>8}", self.partitions)),
            box_row(&format!("  - Empty:            {:>8}", self.empty_partitions)),
            box_row("Output Directory:"),
            box_row(&format!("  {}", self.output_directory)),
            box_row(""),
            box_row("Timing Breakdown:"),
            box_row(&format!(
                "  - Scanning:         {:>8.2}s",
                self.scan_duration.as_secs_f64()
            )),
            box_row(&format!(
                "  - Writing:          {:>8.2}s",
                self.write_duration.as_secs_f64()
            )),
            box_row(&format!(
                "  - Total:            {:>8.2}s",
                self.duration.as_secs_f64()
            )),
            box_row(&format!(
                "  - Throughput:       {:>8.1} files/s",
                self.throughput_files_per_sec()
            )),
            BOX_BOTTOM.to_string(),
        ]
    }

    /// Returns the throughput in files per second.
    #[must_use]
    pub fn throughput_files_per_sec(&self) -> f64 {
        let secs = self.duration.as_secs_f64();
        if secs > 0.0 {
            self.files_found as f64 / secs
        } else {
            0.0
        }
    }
}

const BOX_WIDTH: usize = 53;
const BOX_TOP: &str = "╔═══════════════════════════════════════════════════════╗";
const BOX_DIVIDER: &str = "╠═══════════════════════════════════════════════════════╣";
const BOX_BOTTOM: &str = "╚═══════════════════════════════════════════════════════╝";

/// Formats one row of a summary box, padded or shortened to the box width.
fn box_row(text: &str) -> String {
    format!("║ {} ║", fit_width(text, BOX_WIDTH))
}

/// Pads `text` to exactly `width` chars, keeping the tail when it is too long.
fn fit_width(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len <= width {
        return format!("{text}{}", " ".repeat(width - len));
    }

    let tail: String = text.chars().skip(len - (width - 3)).collect();
    format!("...{tail}")
}

/// Walks, partitions and writes a source tree.
pub struct Pipeline {
    config: Config,
    scanner: Scanner,
    dispatcher: Dispatcher,
}

impl Pipeline {
    /// Creates a new pipeline with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Configuration validation fails
    /// - The writer pool cannot be started
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let scanner = Scanner::new(&config);
        let dispatcher = Dispatcher::new(&config)?;

        Ok(Self {
            config,
            scanner,
            dispatcher,
        })
    }

    /// Executes the pipeline and returns statistics.
    ///
    /// # Process
    ///
    /// 1. **Scan**: Lists eligible files under the root in traversal order
    /// 2. **Prepare**: Creates the output directory
    /// 3. **Write**: Splits the list into partitions and writes them in parallel
    ///
    /// # Errors
    ///
    /// Returns an error if the walk fails, the output directory cannot be
    /// created, or any writer task fails. Output files written by other tasks
    /// are left in place.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use concat_parts::{Config, Pipeline};
    ///
    /// # fn main() -> anyhow::Result<()> {
    /// let config = Config::builder()
    ///     .root_dir("./src")
    ///     .num_files(3)
    ///     .build()?;
    ///
    /// let stats = Pipeline::new(config)?.run()?;
    /// stats.print_summary();
    /// # Ok(())
    /// # }
    /// ```
    #[instrument(skip(self), fields(root_dir = %self.config.root_dir.display()))]
    pub fn run(self) -> Result<RunStats> {
        let start_time = Instant::now();

        info!("Stage 1/3: Scanning {}...", self.config.root_dir.display());
        let scan_start = Instant::now();
        let files = self.scanner.scan()?;
        let scan_duration = scan_start.elapsed();
        let files_found = files.len();

        info!(
            "✓ Found {} eligible files in {:.2}s",
            files_found,
            scan_duration.as_secs_f64()
        );

        let plan = partition(files_found, self.config.num_files);
        let planned_empty = plan.iter().filter(|p| p.is_empty()).count();
        if planned_empty > 0 {
            warn!(
                "{} output files requested for {} input files; {} will be empty",
                self.config.num_files, files_found, planned_empty
            );
        }

        if self.config.dry_run {
            warn!("Dry run mode enabled - skipping file writes");
            self.print_dry_run_summary(&files, &plan);
            return Ok(RunStats {
                files_found,
                files_written: 0,
                files_skipped: 0,
                partitions: plan.len(),
                empty_partitions: planned_empty,
                duration: start_time.elapsed(),
                scan_duration,
                write_duration: Duration::ZERO,
                output_directory: self.config.output_dir.display().to_string(),
                reports: Vec::new(),
            });
        }

        info!("Stage 2/3: Preparing {}...", self.config.output_dir.display());
        fs::create_dir_all(&self.config.output_dir)
            .map_err(|e| Error::io(&self.config.output_dir, e))?;

        info!(
            "Stage 3/3: Writing {} output files on {} workers...",
            self.config.num_files,
            self.dispatcher.workers()
        );
        let write_start = Instant::now();
        let reports = self.dispatcher.dispatch(files, self.config.num_files)?;
        let write_duration = write_start.elapsed();

        let files_written: usize = reports.iter().map(|r| r.written).sum();
        let files_skipped: usize = reports.iter().map(|r| r.skipped.len()).sum();
        let empty_partitions = reports.iter().filter(|r| r.written == 0).count();

        if files_skipped > 0 {
            warn!("{} files could not be read and were left out", files_skipped);
        }

        let duration = start_time.elapsed();
        info!(
            "✓ Wrote {} files into {} parts in {:.2}s",
            files_written,
            reports.len(),
            duration.as_secs_f64()
        );

        Ok(RunStats {
            files_found,
            files_written,
            files_skipped,
            partitions: reports.len(),
            empty_partitions,
            duration,
            scan_duration,
            write_duration,
            output_directory: self.config.output_dir.display().to_string(),
            reports,
        })
    }

    /// Prints the planned partitions for dry run mode.
    fn print_dry_run_summary(&self, files: &[PathBuf], plan: &[Partition]) {
        println!("\n{BOX_TOP}");
        println!("{}", box_row("                   Dry Run Summary"));
        println!("{BOX_DIVIDER}");
        println!("{}", box_row(&format!("Total files:          {:>8}", files.len())));
        println!("{}", box_row(&format!("Output files:         {:>8}", plan.len())));
        println!("{}", box_row(""));
        for part in plan {
            let name = self.config.format.output_file_name(part.ordinal());
            let slice = part.slice(files);
            println!("{}", box_row(&format!("{name}: {} files", slice.len())));
            if let (Some(first), Some(last)) = (slice.first(), slice.last()) {
                println!("{}", box_row(&format!("  first: {}", first.display())));
                println!("{}", box_row(&format!("  last:  {}", last.display())));
            }
        }
        println!("{}", box_row(""));
        println!("{}", box_row("⚠ No files were written (dry run mode)"));
        println!("{BOX_BOTTOM}\n");
    }
}
