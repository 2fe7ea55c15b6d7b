//! Lexical classification and highlighting for Markdown output.
//!
//! Content is highlighted to terminal escapes for the detected syntax and the
//! escapes are stripped again, so the emitted body is the token text of the
//! source. The fence language tag comes from the same classification.

use once_cell::sync::Lazy;
use std::path::Path;
use syntect::{
    easy::HighlightLines,
    highlighting::{Theme, ThemeSet},
    parsing::{SyntaxReference, SyntaxSet},
    util::{as_24_bit_terminal_escaped, LinesWithEndings},
};
use tracing::{debug, trace};

const THEME_NAME: &str = "base16-ocean.dark";
const PLAIN_TEXT_TAG: &str = "text";

static SYNTAXES: Lazy<SyntaxSet> = Lazy::new(SyntaxSet::load_defaults_newlines);

static THEME: Lazy<Theme> = Lazy::new(|| {
    ThemeSet::load_defaults()
        .themes
        .remove(THEME_NAME)
        .unwrap_or_default()
});

/// A highlighted file ready to be placed in a fenced code block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Highlighted {
    /// Fence language tag, e.g. `py` or `text`
    pub language: String,

    /// Token text with all escape sequences removed
    pub body: String,
}

/// Classifies files by name and content and renders their token text.
#[derive(Clone, Copy)]
pub struct Highlighter {
    syntaxes: &'static SyntaxSet,
    theme: &'static Theme,
}

impl std::fmt::Debug for Highlighter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Highlighter")
            .field("syntaxes", &self.syntaxes.syntaxes().len())
            .finish_non_exhaustive()
    }
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl Highlighter {
    /// Returns a highlighter backed by the bundled syntax and theme sets.
    ///
    /// The sets are loaded on first use and shared by every writer task.
    #[must_use]
    pub fn new() -> Self {
        Self {
            syntaxes: &SYNTAXES,
            theme: &THEME,
        }
    }

    /// Finds the best syntax for a file.
    ///
    /// Tries the whole file name (for `Makefile`, `Dockerfile` and friends),
    /// then the extension, then the first line (shebangs, modelines), and
    /// finally falls back to plain text.
    #[must_use]
    pub fn detect(&self, path: &Path, content: &str) -> &'static SyntaxReference {
        let syntaxes = self.syntaxes;
        let by_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(|name| syntaxes.find_syntax_by_extension(name));
        let by_ext = || {
            path.extension()
                .and_then(|e| e.to_str())
                .and_then(|ext| syntaxes.find_syntax_by_extension(ext))
        };
        let by_first_line = || syntaxes.find_syntax_by_first_line(content);

        by_name
            .or_else(by_ext)
            .or_else(by_first_line)
            .unwrap_or_else(|| syntaxes.find_syntax_plain_text())
    }

    /// Returns the fence language tag for a syntax.
    #[must_use]
    pub fn language_tag(&self, syntax: &SyntaxReference) -> String {
        if syntax.name == self.syntaxes.find_syntax_plain_text().name {
            return PLAIN_TEXT_TAG.to_string();
        }

        syntax
            .file_extensions
            .first()
            .map_or_else(|| syntax.name.to_lowercase(), |ext| ext.to_lowercase())
    }

    /// Classifies and highlights `content`, then strips the escapes.
    ///
    /// If the highlighter fails part-way the raw content is used instead.
    #[must_use]
    pub fn render(&self, path: &Path, content: &str) -> Highlighted {
        let syntax = self.detect(path, content);
        let language = self.language_tag(syntax);
        trace!("{} classified as {}", path.display(), syntax.name);

        let body = match self.highlight(syntax, content) {
            Ok(escaped) => console::strip_ansi_codes(&escaped).into_owned(),
            Err(e) => {
                debug!(
                    "Highlighting {} failed, using raw content: {}",
                    path.display(),
                    e
                );
                content.to_string()
            }
        };

        Highlighted { language, body }
    }

    fn highlight(
        &self,
        syntax: &SyntaxReference,
        content: &str,
    ) -> Result<String, syntect::Error> {
        let mut highlighter = HighlightLines::new(syntax, self.theme);
        let mut escaped = String::with_capacity(content.len() * 2);

        for line in LinesWithEndings::from(content) {
            let regions = highlighter.highlight_line(line, self.syntaxes)?;
            escaped.push_str(&as_24_bit_terminal_escaped(&regions, false));
        }

        Ok(escaped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_tags() {
        let h = Highlighter::new();
        let cases = [
            ("a.py", "x = 1\n", "py"),
            ("b.js", "let b = 2;\n", "js"),
            ("c.rs", "fn main() {}\n", "rs"),
            ("d.css", "body {}\n", "css"),
            ("e.html", "<p>hi</p>\n", "html"),
            ("f.unknownext", "whatever\n", "text"),
        ];

        for (name, content, expected) in cases {
            let syntax = h.detect(Path::new(name), content);
            assert_eq!(h.language_tag(syntax), expected, "{name}");
        }
    }

    #[test]
    fn test_detects_from_shebang() {
        let h = Highlighter::new();
        let syntax = h.detect(Path::new("run"), "#!/usr/bin/env python\nprint(1)\n");
        assert_eq!(syntax.name, "Python");
    }

    #[test]
    fn test_detects_from_whole_file_name() {
        let h = Highlighter::new();
        let syntax = h.detect(Path::new("build/Makefile"), "all:\n\techo hi\n");
        assert_ne!(h.language_tag(syntax), "text");
    }

    #[test]
    fn test_render_passes_content_through() {
        let h = Highlighter::new();
        let source = "def f(x):\n    return x * 2\n\nprint(f(21))\n";

        let out = h.render(Path::new("pkg/mod.py"), source);

        assert_eq!(out.language, "py");
        assert_eq!(out.body, source);
        assert!(!out.body.contains('\x1b'));
    }

    #[test]
    fn test_render_plain_text() {
        let h = Highlighter::new();
        let out = h.render(Path::new("notes.zzz"), "just words\nmore words");

        assert_eq!(out.language, "text");
        assert_eq!(out.body, "just words\nmore words");
    }

    #[test]
    fn test_render_empty_content() {
        let h = Highlighter::new();
        let out = h.render(Path::new("empty.py"), "");

        assert_eq!(out.body, "");
    }
}
