use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using the library's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the concat-parts library.
#[derive(Error, Debug, Clone)]
#[non_exhaustive]
pub enum Error {
    /// IO error with context about the file path.
    #[error("IO error accessing '{path}': {message}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// Error message
        message: String,
    },

    /// Configuration validation error.
    #[error("Invalid configuration: {message}")]
    Config {
        /// Detailed error message
        message: String,
    },

    /// Invalid UTF-8 encountered in file.
    #[error("Invalid UTF-8 encoding in file '{path}'. File may be binary or use unsupported encoding.")]
    InvalidUtf8 {
        /// Path to file with encoding issues
        path: PathBuf,
    },

    /// Directory traversal failed.
    #[error("Failed to walk '{path}': {message}")]
    Walk {
        /// Path being visited when the walk failed
        path: PathBuf,
        /// Error message
        message: String,
    },

    /// A writer task failed or panicked.
    #[error("Writer task for part {partition} failed: {message}")]
    Worker {
        /// 1-based ordinal of the partition
        partition: usize,
        /// Error message
        message: String,
    },

    /// The writer thread pool could not be started.
    #[error("Failed to start writer pool: {message}")]
    ThreadPool {
        /// Error message
        message: String,
    },
}

impl Error {
    /// Creates an IO error with path context.
    #[must_use]
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: source.to_string(),
        }
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates an invalid UTF-8 error.
    #[must_use]
    pub fn invalid_utf8(path: impl Into<PathBuf>) -> Self {
        Self::InvalidUtf8 { path: path.into() }
    }

    /// Creates a traversal error from a `walkdir` failure.
    #[must_use]
    pub fn walk(root: impl Into<PathBuf>, source: &walkdir::Error) -> Self {
        let path = source
            .path()
            .map_or_else(|| root.into(), std::path::Path::to_path_buf);

        Self::Walk {
            path,
            message: source.to_string(),
        }
    }

    /// Wraps a task failure with the ordinal of its partition.
    #[must_use]
    pub fn worker(partition: usize, message: impl Into<String>) -> Self {
        Self::Worker {
            partition,
            message: message.into(),
        }
    }

    /// Returns true if this is an IO error.
    #[must_use]
    pub const fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. })
    }

    /// Returns true if this is a configuration error.
    #[must_use]
    pub const fn is_config(&self) -> bool {
        matches!(self, Self::Config { .. })
    }

    /// Returns true if this error came from a writer task.
    #[must_use]
    pub const fn is_worker(&self) -> bool {
        matches!(self, Self::Worker { .. })
    }
}

impl From<rayon::ThreadPoolBuildError> for Error {
    fn from(e: rayon::ThreadPoolBuildError) -> Self {
        Self::ThreadPool {
            message: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = Error::config("test message");
        assert!(err.is_config());
        assert!(err.to_string().contains("test message"));
    }

    #[test]
    fn test_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = Error::io("/tmp/test.txt", io_err);
        assert!(err.is_io());
        assert!(err.to_string().contains("/tmp/test.txt"));
    }

    #[test]
    fn test_worker_error_mentions_partition() {
        let err = Error::worker(3, "disk full");
        assert!(err.is_worker());
        assert!(err.to_string().contains("part 3"));
        assert!(err.to_string().contains("disk full"));
    }

    #[test]
    fn test_walk_error_from_missing_root() {
        let root = "/nonexistent/path/that/should/not/exist";
        let walk_err = walkdir::WalkDir::new(root)
            .into_iter()
            .find_map(std::result::Result::err)
            .unwrap();

        let err = Error::walk(root, &walk_err);
        assert!(matches!(err, Error::Walk { .. }));
        assert!(err.to_string().contains(root));
    }

    #[test]
    fn test_error_clone() {
        let err = Error::invalid_utf8("bad.py");
        let cloned = err.clone();
        assert_eq!(err.to_string(), cloned.to_string());
    }
}
