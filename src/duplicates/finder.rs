//! Duplicate finder: hashes candidate files and groups them by digest.
//!
//! # Overview
//!
//! 1. **Size filter**: only files sharing a size with another file are hashed
//! 2. **Hashing**: candidates are hashed on a bounded rayon pool
//! 3. **Grouping**: digests are grouped once every worker has finished
//!
//! Candidates keep their discovery order, so group members appear in scan order.
//!
//! # Example
//!
//! ```no_run
//! use filestats::duplicates::{DuplicateFinder, FinderConfig};
//! use filestats::stats::collect;
//! use std::path::PathBuf;
//!
//! let paths = vec![PathBuf::from("/data/a.nii"), PathBuf::from("/data/b.nii")];
//! let sizes = collect(paths.clone()).collection;
//!
//! let finder = DuplicateFinder::new(FinderConfig::default());
//! let report = finder.find(&paths, &sizes).unwrap();
//! println!("{} duplicate groups", report.groups.len());
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;

use super::groups::{group, DuplicateGroup};
use crate::progress::ProgressCallback;
use crate::scanner::{HashError, Hasher};
use crate::stats::SizeCollection;

/// Errors that abort duplicate detection as a whole.
#[derive(thiserror::Error, Debug)]
pub enum FinderError {
    /// The hashing thread pool could not be created.
    #[error("Failed to build hashing thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Configuration for the duplicate finder.
#[derive(Clone)]
pub struct FinderConfig {
    /// Number of I/O threads for parallel hashing.
    /// Default is 4 to prevent disk thrashing.
    pub io_threads: usize,
    /// Optional progress callback.
    pub progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for FinderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinderConfig")
            .field("io_threads", &self.io_threads)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            io_threads: 4,
            progress_callback: None,
        }
    }
}

impl FinderConfig {
    /// Set the number of hashing threads (minimum 1).
    #[must_use]
    pub fn with_io_threads(mut self, threads: usize) -> Self {
        self.io_threads = threads.max(1);
        self
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }
}

/// Outcome of a duplicate-detection pass.
#[derive(Debug, Default, Serialize)]
pub struct DuplicateReport {
    /// Duplicate groups, in order of first appearance
    pub groups: Vec<DuplicateGroup>,
    /// Number of files hashed successfully
    pub hashed_files: usize,
    /// Number of files not hashed because their size is unique
    pub unique_size_files: usize,
    /// Files that could not be read
    #[serde(skip)]
    pub errors: Vec<HashError>,
}

impl DuplicateReport {
    /// Total number of files that belong to a duplicate group.
    #[must_use]
    pub fn duplicate_files(&self) -> usize {
        self.groups.iter().map(DuplicateGroup::len).sum()
    }

    /// Total bytes reclaimable across all groups.
    #[must_use]
    pub fn wasted_space(&self) -> u64 {
        self.groups.iter().map(DuplicateGroup::wasted_space).sum()
    }
}

/// Content-based duplicate finder.
#[derive(Debug, Clone, Default)]
pub struct DuplicateFinder {
    config: FinderConfig,
    hasher: Hasher,
}

impl DuplicateFinder {
    /// Create a finder with the given configuration.
    #[must_use]
    pub fn new(config: FinderConfig) -> Self {
        Self {
            config,
            hasher: Hasher::new(),
        }
    }

    /// Create a finder with default settings.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::default()
    }

    /// The files worth hashing: those whose size is shared with another file.
    ///
    /// Files missing from `sizes` (they vanished before stat) are dropped.
    fn candidates(paths: &[PathBuf], sizes: &SizeCollection) -> (Vec<PathBuf>, usize) {
        let mut size_of: HashMap<&Path, u64> = HashMap::with_capacity(sizes.len());
        let mut per_size: HashMap<u64, usize> = HashMap::new();
        for record in sizes {
            size_of.insert(record.path.as_path(), record.size);
            *per_size.entry(record.size).or_default() += 1;
        }

        let mut unique = 0;
        let candidates = paths
            .iter()
            .filter(|path| match size_of.get(path.as_path()) {
                Some(size) if per_size.get(size).copied().unwrap_or(0) > 1 => true,
                Some(_) => {
                    unique += 1;
                    false
                }
                None => false,
            })
            .cloned()
            .collect();
        (candidates, unique)
    }

    /// Find duplicates among `paths` (in scan order), hashing only files
    /// whose size in `sizes` is shared.
    pub fn find(
        &self,
        paths: &[PathBuf],
        sizes: &SizeCollection,
    ) -> Result<DuplicateReport, FinderError> {
        let (candidates, unique_size_files) = Self::candidates(paths, sizes);
        log::info!(
            "Hashing {} candidate files ({} have a unique size)",
            candidates.len(),
            unique_size_files
        );

        let mut report = self.find_all(&candidates)?;
        report.unique_size_files = unique_size_files;
        Ok(report)
    }

    /// Hash every path and group by digest, without a size filter.
    pub fn find_all(&self, paths: &[PathBuf]) -> Result<DuplicateReport, FinderError> {
        if paths.is_empty() {
            log::debug!("No files to hash");
            return Ok(DuplicateReport::default());
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.io_threads.max(1))
            .build()?;

        let progress = self.config.progress_callback.as_deref();
        let batch = pool.install(|| self.hasher.hash_many(paths, progress));

        let hashed_files = batch.hashed.len();
        let groups = group(batch.hashed);
        log::info!(
            "Found {} duplicate groups among {} hashed files",
            groups.len(),
            hashed_files
        );

        Ok(DuplicateReport {
            groups,
            hashed_files,
            unique_size_files: 0,
            errors: batch.errors,
        })
    }
}
