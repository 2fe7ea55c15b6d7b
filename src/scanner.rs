use crate::{
    config::Config,
    error::{Error, Result},
    filter::PathFilter,
};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};
use walkdir::{DirEntry, WalkDir};

/// Walks a root directory and collects eligible files.
pub(crate) struct Scanner {
    root_dir: PathBuf,
    filter: PathFilter,
}

impl Scanner {
    /// Creates a new scanner from configuration.
    pub(crate) fn new(config: &Config) -> Self {
        Self {
            root_dir: config.root_dir.clone(),
            filter: config.path_filter(),
        }
    }

    /// Scans the root directory and returns eligible files in traversal order.
    ///
    /// # Errors
    ///
    /// Returns the first traversal error, including a missing root.
    pub(crate) fn scan(&self) -> Result<Vec<PathBuf>> {
        enumerate_files(&self.root_dir, &self.filter)
    }
}

/// Lists every regular file under `root` that passes `filter`.
///
/// Files keep the order the directory walk yields them in; nothing is sorted.
/// Ignored directories are not descended into, since no file below them could
/// pass the filter anyway.
///
/// # Errors
///
/// Any traversal failure (missing root, permission denied, symlink loop)
/// aborts the enumeration.
pub fn enumerate_files(root: &Path, filter: &PathFilter) -> Result<Vec<PathBuf>> {
    debug!("Starting scan of {}", root.display());

    let walker = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| !is_pruned(entry, filter));

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|e| Error::walk(root, &e))?;
        let path = entry.path();

        if !is_regular_file(&entry) {
            continue;
        }

        if filter.accepts(path) {
            trace!("Accepted {}", path.display());
            files.push(entry.into_path());
        } else {
            trace!("Skipped {}", path.display());
        }
    }

    debug!("Found {} eligible files under {}", files.len(), root.display());
    Ok(files)
}

fn is_pruned(entry: &DirEntry, filter: &PathFilter) -> bool {
    entry.depth() > 0 && entry.file_type().is_dir() && filter.prunes(entry.file_name())
}

/// Regular files, plus symlinks that resolve to one.
fn is_regular_file(entry: &DirEntry) -> bool {
    let file_type = entry.file_type();
    file_type.is_file() || (file_type.is_symlink() && entry.path().is_file())
}
