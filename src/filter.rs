//! Path eligibility checks.
//!
//! A discovered path is kept when none of its segments equals an ignore
//! pattern and its final suffix (including the dot) is an accepted extension.

use std::collections::BTreeSet;
use std::ffi::OsStr;
use std::path::{Component, Path};

/// Extensions accepted when none are configured.
pub const DEFAULT_EXTENSIONS: &str = ".js,.jsx,.css,.html,.json,.md,.mdx,.txt,.py,.sh,.yaml,.yml";

/// Splits a comma-separated list, dropping empty items.
fn split_list(list: &str) -> impl Iterator<Item = String> + '_ {
    list.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
}

/// Literal path segments that exclude a path when any segment matches exactly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IgnoreSet {
    patterns: BTreeSet<String>,
}

impl IgnoreSet {
    /// Parses a comma-separated list such as `node_modules,.git`.
    #[must_use]
    pub fn parse(list: &str) -> Self {
        split_list(list).collect()
    }

    /// Returns true if no patterns are configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Iterates over the configured patterns.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(String::as_str)
    }

    /// Returns true if any normal segment of `path` equals a pattern.
    ///
    /// This is segment equality: `node_modules` matches `a/node_modules/b.js`
    /// but not `a/node_modules_old/b.js`.
    #[must_use]
    pub fn matches(&self, path: &Path) -> bool {
        if self.patterns.is_empty() {
            return false;
        }

        path.components().any(|component| match component {
            Component::Normal(segment) => self.matches_segment(segment),
            _ => false,
        })
    }

    /// Returns true if a single segment equals a pattern.
    #[must_use]
    pub fn matches_segment(&self, segment: &OsStr) -> bool {
        segment
            .to_str()
            .is_some_and(|segment| self.patterns.contains(segment))
    }
}

impl FromIterator<String> for IgnoreSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            patterns: iter.into_iter().collect(),
        }
    }
}

/// Accepted file suffixes, each including its leading dot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionSet {
    extensions: BTreeSet<String>,
}

impl ExtensionSet {
    /// Parses a comma-separated list such as `.py,.js`.
    #[must_use]
    pub fn parse(list: &str) -> Self {
        split_list(list).collect()
    }

    /// Returns true if no extensions are configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }

    /// Iterates over the configured extensions.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.extensions.iter().map(String::as_str)
    }

    /// Returns true if the final suffix of `path` is accepted.
    ///
    /// Files without a suffix, including dotfiles like `.bashrc`, never match.
    #[must_use]
    pub fn matches(&self, path: &Path) -> bool {
        path.extension()
            .and_then(OsStr::to_str)
            .is_some_and(|ext| self.extensions.contains(&format!(".{ext}")))
    }
}

impl Default for ExtensionSet {
    fn default() -> Self {
        Self::parse(DEFAULT_EXTENSIONS)
    }
}

impl FromIterator<String> for ExtensionSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            extensions: iter.into_iter().collect(),
        }
    }
}

/// Decides whether an enumerated path goes into the output.
#[derive(Debug, Clone, Default)]
pub struct PathFilter {
    ignore: IgnoreSet,
    extensions: ExtensionSet,
}

impl PathFilter {
    /// Creates a filter from an ignore set and an extension set.
    #[must_use]
    pub const fn new(ignore: IgnoreSet, extensions: ExtensionSet) -> Self {
        Self { ignore, extensions }
    }

    /// Returns true if `path` is eligible.
    #[must_use]
    pub fn accepts(&self, path: &Path) -> bool {
        !self.ignore.matches(path) && self.extensions.matches(path)
    }

    /// Returns true if a directory named `segment` should not be descended into.
    #[must_use]
    pub fn prunes(&self, segment: &OsStr) -> bool {
        self.ignore.matches_segment(segment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(ignore: &str, extensions: &str) -> PathFilter {
        PathFilter::new(IgnoreSet::parse(ignore), ExtensionSet::parse(extensions))
    }

    #[test]
    fn test_accepts_listed_extension() {
        let f = filter("", ".py,.js");
        assert!(f.accepts(Path::new("src/a.py")));
        assert!(f.accepts(Path::new("b.js")));
        assert!(!f.accepts(Path::new("c.rs")));
        assert!(!f.accepts(Path::new("Makefile")));
    }

    #[test]
    fn test_only_last_suffix_counts() {
        let f = filter("", ".gz");
        assert!(f.accepts(Path::new("archive.tar.gz")));
        assert!(!filter("", ".tar").accepts(Path::new("archive.tar.gz")));
    }

    #[test]
    fn test_dotfiles_have_no_extension() {
        let f = filter("", ".bashrc");
        assert!(!f.accepts(Path::new("home/.bashrc")));
    }

    #[test]
    fn test_ignore_is_segment_equality() {
        let f = filter("node_modules", ".js");
        assert!(!f.accepts(Path::new("web/node_modules/c.js")));
        assert!(f.accepts(Path::new("web/node_modules_old/c.js")));
        assert!(f.accepts(Path::new("web/my_node_modules/c.js")));
    }

    #[test]
    fn test_ignore_matches_file_name() {
        let f = filter("secret.py", ".py");
        assert!(!f.accepts(Path::new("pkg/secret.py")));
        assert!(f.accepts(Path::new("pkg/public.py")));
    }

    #[test]
    fn test_ignore_is_not_a_glob() {
        let f = filter("*.py", ".py");
        assert!(f.accepts(Path::new("pkg/a.py")));
    }

    #[test]
    fn test_parse_drops_empty_items() {
        let set = IgnoreSet::parse("a,,b, ,");
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["a", "b"]);
        assert!(IgnoreSet::parse("").is_empty());

        let f = PathFilter::new(IgnoreSet::parse("a, b"), ExtensionSet::parse(".py,"));
        assert!(!f.accepts(Path::new("b/x.py")));
        assert!(!f.accepts(Path::new("x/Makefile")));
    }

    #[test]
    fn test_default_extensions() {
        let set = ExtensionSet::default();
        assert!(set.matches(Path::new("x.py")));
        assert!(set.matches(Path::new("x.mdx")));
        assert!(set.matches(Path::new("x.yml")));
        assert!(!set.matches(Path::new("x.rs")));
    }

    #[test]
    fn test_prunes_ignored_directory() {
        let f = filter(".git,target", ".rs");
        assert!(f.prunes(OsStr::new(".git")));
        assert!(f.prunes(OsStr::new("target")));
        assert!(!f.prunes(OsStr::new("src")));
    }
}
