//! Directory walker implementation using walkdir.
//!
//! # Overview
//!
//! This module provides the [`Walker`] struct for traversing one root and
//! yielding the paths of files whose names match a [`PatternSet`].
//!
//! # Features
//!
//! - Depth-first, top-down traversal with entries sorted by name
//! - Skip directories pruned before they are opened
//! - Symbolic-link files never yielded
//! - Symlinked directories followed only on request, with cycle detection
//!   and each real directory walked once
//! - Unreadable directories reported and skipped, the walk continues
//!
//! # Example
//!
//! ```no_run
//! use filestats::scanner::{PatternSet, SkipSet, Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let config = WalkerConfig::new(PatternSet::parse("*.nii*").unwrap(), SkipSet::default());
//! let walker = Walker::new(Path::new("/home/user/data"), config);
//! let files: Vec<_> = walker.walk().filter_map(Result::ok).collect();
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use super::{PatternSet, ScanError, SkipSet};

/// Configuration for directory walking.
#[derive(Debug, Clone)]
pub struct WalkerConfig {
    /// Filename patterns; a file is yielded if it matches any of them.
    pub patterns: PatternSet,

    /// Directories pruned from traversal.
    pub skip: SkipSet,

    /// Descend into symbolic links that point at directories.
    /// Cycles are detected and reported as [`ScanError::SymlinkCycle`].
    pub follow_dir_symlinks: bool,
}

impl WalkerConfig {
    /// Create a configuration that does not follow directory symlinks.
    #[must_use]
    pub fn new(patterns: PatternSet, skip: SkipSet) -> Self {
        Self {
            patterns,
            skip,
            follow_dir_symlinks: false,
        }
    }

    /// Enable or disable descending into symlinked directories.
    #[must_use]
    pub fn with_follow_dir_symlinks(mut self, follow: bool) -> Self {
        self.follow_dir_symlinks = follow;
        self
    }
}

/// Directory walker for one root.
///
/// Each call to [`Walker::walk`] re-walks the tree from scratch.
#[derive(Debug)]
pub struct Walker {
    /// Root path to walk
    root: PathBuf,
    /// Walker configuration
    config: WalkerConfig,
}

impl Walker {
    /// Create a new walker for the given root.
    #[must_use]
    pub fn new(root: &Path, config: WalkerConfig) -> Self {
        Self {
            root: root.to_path_buf(),
            config,
        }
    }

    /// The root this walker starts from.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether a directory entry should be pruned before descending.
    fn is_pruned(&self, entry: &DirEntry) -> bool {
        if !entry.file_type().is_dir() {
            return false;
        }
        let pruned = self.config.skip.contains(entry.path());
        if pruned {
            log::debug!("Pruning skipped directory: {}", entry.path().display());
        }
        pruned
    }

    /// Whether a directory resolves to one this walk has already entered.
    ///
    /// Only consulted when following links. Ancestor loops never get here,
    /// since walkdir reports them as errors first.
    fn is_revisit(&self, entry: &DirEntry, visited: &mut HashSet<PathBuf>) -> bool {
        if !entry.file_type().is_dir() {
            return false;
        }
        let Ok(real) = fs::canonicalize(entry.path()) else {
            return false;
        };
        if visited.insert(real) {
            return false;
        }
        log::debug!("Directory already walked, skipping: {}", entry.path().display());
        true
    }

    /// Walk the tree, yielding matching file paths.
    ///
    /// Errors are yielded as [`ScanError`] values rather than stopping
    /// iteration; an unreadable directory contributes one error and its
    /// subtree is skipped. When following links, a directory reached a second
    /// time through a link is skipped, so the first name in sorted order wins.
    pub fn walk(&self) -> impl Iterator<Item = Result<PathBuf, ScanError>> + '_ {
        let follow = self.config.follow_dir_symlinks;
        let walk_dir = WalkDir::new(&self.root)
            .follow_links(follow)
            .sort_by_file_name();
        let mut visited = HashSet::new();

        walk_dir
            .into_iter()
            .filter_entry(move |entry| {
                !self.is_pruned(entry) && !(follow && self.is_revisit(entry, &mut visited))
            })
            .filter_map(move |entry_result| match entry_result {
                Ok(entry) => self.process_entry(entry).map(Ok),
                Err(e) => Some(Err(self.handle_walk_error(e))),
            })
    }

    /// Decide whether a visited entry is a file to yield.
    fn process_entry(&self, entry: DirEntry) -> Option<PathBuf> {
        let file_type = entry.file_type();

        if file_type.is_dir() {
            return None;
        }

        // With follow_links the reported type is the target's, so ask about
        // the link itself
        if entry.path_is_symlink() || file_type.is_symlink() {
            log::trace!("Skipping symlink: {}", entry.path().display());
            return None;
        }

        if !file_type.is_file() {
            log::trace!("Skipping special file: {}", entry.path().display());
            return None;
        }

        if !self.config.patterns.matches_path(entry.path()) {
            return None;
        }

        log::trace!("Matched: {}", entry.path().display());
        Some(entry.into_path())
    }

    /// Convert a walkdir error into a [`ScanError`].
    fn handle_walk_error(&self, error: walkdir::Error) -> ScanError {
        let path = error
            .path()
            .map_or_else(|| self.root.clone(), Path::to_path_buf);

        if let Some(ancestor) = error.loop_ancestor() {
            log::error!(
                "Symlink cycle: {} points back to {}",
                path.display(),
                ancestor.display()
            );
            return ScanError::SymlinkCycle {
                path,
                ancestor: ancestor.to_path_buf(),
            };
        }

        let message = error.to_string();
        let io_error = error
            .into_io_error()
            .unwrap_or_else(|| std::io::Error::other(message));
        ScanError::from_io(path, io_error)
    }
}
