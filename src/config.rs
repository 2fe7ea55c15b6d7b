use crate::error::{Error, Result};
use crate::filter::{ExtensionSet, IgnoreSet, PathFilter};
use std::path::PathBuf;

const OUTPUT_FILE_STEM: &str = "concatenated_part_";

/// Output format for the concatenated files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Raw content under a `// File: <path>` comment line
    #[default]
    Text,
    /// `## File: <path>` headings with fenced code blocks
    Markdown,
}

impl OutputFormat {
    /// Returns the file extension for this format.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Text => "txt",
            Self::Markdown => "md",
        }
    }

    /// Returns the output file name for a 1-based partition ordinal.
    ///
    /// ```
    /// use concat_parts::OutputFormat;
    ///
    /// assert_eq!(OutputFormat::Markdown.output_file_name(2), "concatenated_part_2.md");
    /// ```
    #[must_use]
    pub fn output_file_name(self, ordinal: usize) -> String {
        format!("{OUTPUT_FILE_STEM}{ordinal}.{}", self.extension())
    }
}

/// Configuration for a concatenation run.
///
/// Use [`Config::builder()`] to construct a new configuration.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct Config {
    /// Root directory to walk
    pub root_dir: PathBuf,

    /// Directory receiving the output files
    pub output_dir: PathBuf,

    /// Number of output files to produce
    pub num_files: usize,

    /// Path segments that exclude a file
    pub ignore: IgnoreSet,

    /// Accepted file suffixes
    pub extensions: ExtensionSet,

    /// Output format
    pub format: OutputFormat,

    /// Draw a progress bar while writer tasks complete
    pub show_progress: bool,

    /// Plan partitions without writing anything
    pub dry_run: bool,
}

impl Config {
    /// Creates a new configuration builder.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use concat_parts::{Config, OutputFormat};
    ///
    /// let config = Config::builder()
    ///     .root_dir("./src")
    ///     .output_dir("./out")
    ///     .num_files(4)
    ///     .format(OutputFormat::Markdown)
    ///     .build()
    ///     .expect("valid configuration");
    /// ```
    #[must_use]
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Root directory doesn't exist or is not a directory
    /// - The number of output files is zero
    /// - The extension set is empty or an extension lacks its leading dot
    pub fn validate(&self) -> Result<()> {
        if !self.root_dir.exists() {
            return Err(Error::config(format!(
                "Root directory does not exist: {}",
                self.root_dir.display()
            )));
        }

        if !self.root_dir.is_dir() {
            return Err(Error::config(format!(
                "Root path is not a directory: {}",
                self.root_dir.display()
            )));
        }

        if self.num_files == 0 {
            return Err(Error::config("num_files must be greater than 0"));
        }

        if self.extensions.is_empty() {
            return Err(Error::config("at least one file extension is required"));
        }

        if let Some(ext) = self.extensions.iter().find(|ext| !is_valid_extension(ext)) {
            return Err(Error::config(format!(
                "extension '{ext}' must start with '.' followed by a suffix, e.g. '.py'"
            )));
        }

        Ok(())
    }

    /// Builds the path filter for this run.
    #[must_use]
    pub fn path_filter(&self) -> PathFilter {
        PathFilter::new(self.ignore.clone(), self.extensions.clone())
    }
}

fn is_valid_extension(ext: &str) -> bool {
    ext.len() > 1 && ext.starts_with('.') && !ext[1..].contains(['.', '/', '\\'])
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root_dir: PathBuf::from("."),
            output_dir: PathBuf::from("out"),
            num_files: 1,
            ignore: IgnoreSet::default(),
            extensions: ExtensionSet::default(),
            format: OutputFormat::Text,
            show_progress: true,
            dry_run: false,
        }
    }
}

/// Builder for creating a [`Config`].
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    root_dir: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    num_files: Option<usize>,
    ignore: Option<IgnoreSet>,
    extensions: Option<ExtensionSet>,
    format: Option<OutputFormat>,
    show_progress: Option<bool>,
    dry_run: bool,
}

impl ConfigBuilder {
    /// Sets the root directory to walk.
    #[must_use]
    pub fn root_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.root_dir = Some(path.into());
        self
    }

    /// Sets the output directory for generated files.
    #[must_use]
    pub fn output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(path.into());
        self
    }

    /// Sets the number of output files.
    #[must_use]
    pub fn num_files(mut self, count: usize) -> Self {
        self.num_files = Some(count);
        self
    }

    /// Sets the ignore patterns.
    #[must_use]
    pub fn ignore(mut self, ignore: IgnoreSet) -> Self {
        self.ignore = Some(ignore);
        self
    }

    /// Sets the accepted extensions.
    #[must_use]
    pub fn extensions(mut self, extensions: ExtensionSet) -> Self {
        self.extensions = Some(extensions);
        self
    }

    /// Sets the output format.
    #[must_use]
    pub fn format(mut self, format: OutputFormat) -> Self {
        self.format = Some(format);
        self
    }

    /// Enables or disables the progress bar.
    #[must_use]
    pub fn show_progress(mut self, enabled: bool) -> Self {
        self.show_progress = Some(enabled);
        self
    }

    /// Enables dry run mode (no file writes).
    #[must_use]
    pub fn dry_run(mut self, enabled: bool) -> Self {
        self.dry_run = enabled;
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails.
    pub fn build(self) -> Result<Config> {
        let config = Config {
            root_dir: self.root_dir.unwrap_or_else(|| PathBuf::from(".")),
            output_dir: self.output_dir.unwrap_or_else(|| PathBuf::from("out")),
            num_files: self.num_files.unwrap_or(1),
            ignore: self.ignore.unwrap_or_default(),
            extensions: self.extensions.unwrap_or_default(),
            format: self.format.unwrap_or_default(),
            show_progress: self.show_progress.unwrap_or(true),
            dry_run: self.dry_run,
        };

        config.validate()?;
        Ok(config)
    }
}
