use anyhow::Context;
use clap::{builder::RangedU64ValueParser, Parser};
use concat_parts::{
    Config, ExtensionSet, IgnoreSet, OutputFormat, Pipeline, DEFAULT_EXTENSIONS,
};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(
    name = "concat-parts",
    version,
    about = "Concatenate files into a specified number of output files",
    long_about = "Concatenate files into a specified number of output files.\n\n\
    Walks the root directory, keeps files with an accepted extension whose path \
    contains no ignored segment, splits them into N groups of near-equal file \
    count and writes each group to concatenated_part_<i>.<ext> in parallel.\n\n\
    USAGE EXAMPLES:\n  \
      # Four plain-text parts of a web project\n  \
      concat-parts -r ./app -o ./out -n 4 -i node_modules,.git\n\n  \
      # Markdown with fenced code blocks, Python only\n  \
      concat-parts -r ./src -o ./out -n 2 -e .py -f md"
)]
struct Cli {
    /// Root directory to walk
    #[arg(short = 'r', long = "root-directory", alias = "root_directory", value_name = "PATH")]
    root_directory: PathBuf,

    /// Directory for the concatenated files (created if missing)
    #[arg(short = 'o', long = "output-directory", alias = "output_directory", value_name = "PATH")]
    output_directory: PathBuf,

    /// Number of output files
    #[arg(
        short = 'n',
        long = "number-of-files",
        alias = "number_of_files",
        value_name = "N",
        value_parser = RangedU64ValueParser::<usize>::new().range(1..)
    )]
    number_of_files: usize,

    /// Comma-separated path segments to ignore, e.g. node_modules,.git
    #[arg(short, long, default_value = "", value_name = "LIST")]
    ignore: String,

    /// Comma-separated file extensions to include, with leading dots
    #[arg(short, long, default_value = DEFAULT_EXTENSIONS, value_name = "LIST")]
    extensions: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "txt")]
    format: CliFormat,

    /// Show the planned parts without writing anything
    #[arg(long)]
    dry_run: bool,

    /// Don't draw the progress bar
    #[arg(long)]
    no_progress: bool,

    /// Verbose output (repeat for more detail)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliFormat {
    /// Plain text with `// File:` headers
    Txt,
    /// Markdown with fenced code blocks
    Md,
}

impl From<CliFormat> for OutputFormat {
    fn from(f: CliFormat) -> Self {
        match f {
            CliFormat::Txt => Self::Text,
            CliFormat::Md => Self::Markdown,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_tracing(cli.verbose)?;

    let num_files = cli.number_of_files;
    let config = Config::builder()
        .root_dir(cli.root_directory)
        .output_dir(cli.output_directory)
        .num_files(num_files)
        .ignore(IgnoreSet::parse(&cli.ignore))
        .extensions(ExtensionSet::parse(&cli.extensions))
        .format(cli.format.into())
        .show_progress(!cli.no_progress)
        .dry_run(cli.dry_run)
        .build()
        .context("Failed to build configuration")?;

    let dry_run = config.dry_run;
    let stats = Pipeline::new(config)
        .context("Failed to create pipeline")?
        .run()
        .context("Concatenation failed")?;

    if cli.verbose > 0 {
        stats.print_summary();
    }

    if !dry_run {
        println!("All files have been successfully concatenated into {num_files} files.");
    }

    Ok(())
}

fn setup_tracing(verbosity: u8) -> anyhow::Result<()> {
    let level = match verbosity {
        0 => "concat_parts=warn",
        1 => "concat_parts=info",
        2 => "concat_parts=debug",
        _ => "concat_parts=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false),
        )
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(())
}
