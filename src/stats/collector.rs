//! Size collection for discovered files.
//!
//! # Overview
//!
//! [`collect`] stats every discovered path and returns the records sorted
//! ascending by `(size, path)`, so the smallest file is first and the
//! largest is last. Files that vanish between discovery and stat are
//! reported and skipped.
//!
//! # Example
//!
//! ```
//! use filestats::stats::{FileRecord, SizeCollection};
//!
//! let collection = SizeCollection::from_records(vec![
//!     FileRecord::new(200, "/b.img"),
//!     FileRecord::new(100, "/a.nii"),
//! ]);
//!
//! assert_eq!(collection.min().map(|r| r.size), Some(100));
//! assert_eq!(collection.max().map(|r| r.size), Some(200));
//! ```

use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use super::StatsError;
use crate::scanner::ScanError;

/// A discovered file and its size in bytes.
///
/// Records order by size, then by the path as a string. Comparing the raw
/// strings rather than path components puts `/d/a-b` before `/d/a/x`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct FileRecord {
    /// File size in bytes
    pub size: u64,
    /// Absolute path to the file
    pub path: PathBuf,
}

impl FileRecord {
    /// Create a new record.
    #[must_use]
    pub fn new(size: u64, path: impl Into<PathBuf>) -> Self {
        Self {
            size,
            path: path.into(),
        }
    }
}

impl Ord for FileRecord {
    fn cmp(&self, other: &Self) -> Ordering {
        self.size
            .cmp(&other.size)
            .then_with(|| self.path.as_os_str().cmp(other.path.as_os_str()))
    }
}

impl PartialOrd for FileRecord {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// File records sorted ascending by size, ties broken by path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SizeCollection {
    records: Vec<FileRecord>,
}

impl SizeCollection {
    /// Sort `records` into a collection.
    #[must_use]
    pub fn from_records(mut records: Vec<FileRecord>) -> Self {
        records.sort_unstable();
        let collection = Self { records };
        debug_assert!(collection.verify().is_ok());
        collection
    }

    /// The records, smallest first.
    #[must_use]
    pub fn records(&self) -> &[FileRecord] {
        &self.records
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the collection is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The smallest record.
    #[must_use]
    pub fn min(&self) -> Option<&FileRecord> {
        self.records.first()
    }

    /// The largest record.
    #[must_use]
    pub fn max(&self) -> Option<&FileRecord> {
        self.records.last()
    }

    /// Iterate records in ascending size order.
    pub fn iter(&self) -> std::slice::Iter<'_, FileRecord> {
        self.records.iter()
    }

    /// The `n` largest records, largest first.
    pub fn largest(&self, n: usize) -> impl Iterator<Item = &FileRecord> {
        self.records.iter().rev().take(n)
    }

    /// Look up the size recorded for `path`.
    #[must_use]
    pub fn size_of(&self, path: &Path) -> Option<u64> {
        self.records.iter().find(|r| r.path == path).map(|r| r.size)
    }

    /// Check that the first and last records hold the extreme sizes.
    pub fn verify(&self) -> Result<(), StatsError> {
        let (Some(first), Some(last)) = (self.records.first(), self.records.last()) else {
            return Ok(());
        };
        let (min, max) = self
            .records
            .iter()
            .fold((u64::MAX, u64::MIN), |(lo, hi), r| (lo.min(r.size), hi.max(r.size)));

        if first.size == min && last.size == max {
            Ok(())
        } else {
            Err(StatsError::SortInvariant {
                first: first.size,
                min,
                last: last.size,
                max,
            })
        }
    }
}

impl<'a> IntoIterator for &'a SizeCollection {
    type Item = &'a FileRecord;
    type IntoIter = std::slice::Iter<'a, FileRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Output of [`collect`].
#[derive(Debug, Default)]
pub struct CollectOutcome {
    /// Records for every file that could be stat'd
    pub collection: SizeCollection,
    /// Files that vanished or could not be stat'd
    pub errors: Vec<ScanError>,
}

/// Stat each path and build a size-ordered collection.
///
/// A path that cannot be stat'd is logged, reported in
/// [`CollectOutcome::errors`] and left out; collection continues.
pub fn collect<I, P>(paths: I) -> CollectOutcome
where
    I: IntoIterator<Item = P>,
    P: Into<PathBuf>,
{
    let mut records = Vec::new();
    let mut errors = Vec::new();

    for path in paths {
        let path = path.into();
        match fs::metadata(&path) {
            Ok(metadata) => records.push(FileRecord {
                size: metadata.len(),
                path,
            }),
            Err(e) => errors.push(ScanError::from_io(path, e)),
        }
    }

    log::debug!(
        "Collected sizes for {} files ({} skipped)",
        records.len(),
        errors.len()
    );

    CollectOutcome {
        collection: SizeCollection::from_records(records),
        errors,
    }
}
