use std::ops::Range;
use tracing::debug;

/// A contiguous block of the enumerated file list assigned to one output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    /// Sequential partition index (0-based)
    pub index: usize,

    /// Half-open range into the enumerated file list
    pub range: Range<usize>,
}

impl Partition {
    /// Returns the 1-based ordinal used in output file names.
    #[must_use]
    pub const fn ordinal(&self) -> usize {
        self.index + 1
    }

    /// Returns the number of files in this partition.
    #[must_use]
    pub fn len(&self) -> usize {
        self.range.len()
    }

    /// Returns true if this partition holds no files.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }

    /// Returns this partition's slice of `files`.
    #[must_use]
    pub fn slice<'a, T>(&self, files: &'a [T]) -> &'a [T] {
        &files[self.range.clone()]
    }
}

/// Splits `total` items into exactly `count` contiguous partitions.
///
/// Each partition holds `ceil(total / count)` items except the trailing ones,
/// which may be shorter or empty when `count` exceeds what the block size
/// needs. `count` must be at least 1; that is checked when the run is
/// configured.
///
/// # Examples
///
/// ```
/// use concat_parts::partition;
///
/// let parts = partition(5, 3);
/// let ranges: Vec<_> = parts.iter().map(|p| p.range.clone()).collect();
/// assert_eq!(ranges, vec![0..2, 2..4, 4..5]);
/// ```
#[must_use]
pub fn partition(total: usize, count: usize) -> Vec<Partition> {
    debug_assert!(count > 0, "partition count must be positive");

    let chunk_size = total.div_ceil(count.max(1));
    let parts: Vec<_> = (0..count)
        .map(|index| {
            let start = (index * chunk_size).min(total);
            let end = ((index + 1) * chunk_size).min(total);
            Partition {
                index,
                range: start..end,
            }
        })
        .collect();

    debug!(
        "Split {} files into {} partitions of up to {} files",
        total, count, chunk_size
    );

    parts
}
