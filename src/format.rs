use crate::config::OutputFormat;
use crate::highlight::Highlighter;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;

impl OutputFormat {
    /// Creates the entry formatter for this format.
    ///
    /// Called once per run; every writer task shares the result.
    #[must_use]
    pub fn create_formatter(self) -> Arc<dyn EntryFormatter> {
        match self {
            Self::Text => Arc::new(TextFormatter),
            Self::Markdown => Arc::new(MarkdownFormatter::new()),
        }
    }
}

/// Writes one input file, header included, into an output stream.
///
/// Implementations must be thread-safe; one instance serves all partitions.
pub trait EntryFormatter: Send + Sync {
    /// Writes the header, the content and the trailing separator for `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `out` fails.
    fn write_entry(&self, out: &mut dyn Write, path: &Path, content: &str) -> io::Result<()>;
}

/// `// File: <path>` followed by the raw content.
#[derive(Debug, Clone, Copy)]
pub(crate) struct TextFormatter;

impl EntryFormatter for TextFormatter {
    fn write_entry(&self, out: &mut dyn Write, path: &Path, content: &str) -> io::Result<()> {
        write!(out, "// File: {}\n{}\n\n", path.display(), content)
    }
}

/// `## File: <path>` followed by a fenced, language-tagged code block.
#[derive(Debug, Clone, Copy)]
pub(crate) struct MarkdownFormatter {
    highlighter: Highlighter,
}

impl MarkdownFormatter {
    pub(crate) fn new() -> Self {
        Self {
            highlighter: Highlighter::new(),
        }
    }
}

impl EntryFormatter for MarkdownFormatter {
    fn write_entry(&self, out: &mut dyn Write, path: &Path, content: &str) -> io::Result<()> {
        let highlighted = self.highlighter.render(path, content);

        writeln!(out, "## File: {}", path.display())?;
        writeln!(out, "```{}", highlighted.language)?;
        out.write_all(highlighted.body.as_bytes())?;
        if !highlighted.body.is_empty() && !highlighted.body.ends_with('\n') {
            out.write_all(b"\n")?;
        }
        out.write_all(b"```\n\n")
    }
}
