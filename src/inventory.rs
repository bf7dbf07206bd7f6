//! End-to-end inventory run.
//!
//! Roots are normalized, walked one after another into a combined file list,
//! stat'd into a size collection and summarized. Duplicate detection runs
//! only when requested. Every stage consumes the previous stage's output
//! and nothing is shared between stages.
//!
//! Per-item failures are recovered locally and listed in
//! [`InventoryReport::warnings`]; bad input as a whole (no usable root,
//! no files, a symlink cycle) fails the run with an [`InventoryError`].

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;

use crate::duplicates::{DuplicateFinder, DuplicateReport, FinderConfig, FinderError};
use crate::progress::{ProgressCallback, WALK_PHASE};
use crate::scanner::{
    collapse_nested, normalize_each, HashError, PathError, PatternError, PatternSet, ScanError,
    SkipSet, Walker, WalkerConfig,
};
use crate::stats::{collect, summarize, SizeCollection, StatsError, Summary};

/// Errors that stop an inventory run.
#[derive(thiserror::Error, Debug)]
pub enum InventoryError {
    /// None of the supplied roots could be resolved.
    #[error("No valid root directories ({} rejected)", .0.len())]
    NoValidRoots(Vec<PathError>),

    /// A symlinked directory loops back to an ancestor.
    #[error("Aborting walk: {0}")]
    SymlinkCycle(ScanError),

    /// Statistics could not be computed.
    #[error(transparent)]
    Stats(#[from] StatsError),

    /// Duplicate detection failed as a whole.
    #[error(transparent)]
    Finder(#[from] FinderError),

    /// The filename patterns are unusable.
    #[error(transparent)]
    Pattern(#[from] PatternError),
}

/// Category of a recovered per-item problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// A root or skip path does not exist
    InvalidPath,
    /// A directory or file could not be opened
    PermissionDenied,
    /// A file disappeared between discovery and stat
    Vanished,
    /// A file could not be read for hashing
    Unreadable,
    /// Any other I/O failure
    Io,
}

/// A recovered per-item problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Warning {
    /// What went wrong
    pub kind: WarningKind,
    /// The path concerned
    pub path: PathBuf,
    /// Human-readable description
    pub message: String,
}

impl From<&PathError> for Warning {
    fn from(err: &PathError) -> Self {
        let kind = match err {
            PathError::InvalidPath(_) => WarningKind::InvalidPath,
            PathError::Unresolvable { .. } => WarningKind::Io,
        };
        Self {
            kind,
            path: err.path().to_path_buf(),
            message: err.to_string(),
        }
    }
}

impl From<&ScanError> for Warning {
    fn from(err: &ScanError) -> Self {
        let kind = match err {
            ScanError::PermissionDenied(_) => WarningKind::PermissionDenied,
            ScanError::Vanished(_) => WarningKind::Vanished,
            ScanError::SymlinkCycle { .. } | ScanError::Io { .. } => WarningKind::Io,
        };
        Self {
            kind,
            path: err.path().to_path_buf(),
            message: err.to_string(),
        }
    }
}

impl From<&HashError> for Warning {
    fn from(err: &HashError) -> Self {
        Self {
            kind: WarningKind::Unreadable,
            path: err.path().to_path_buf(),
            message: err.to_string(),
        }
    }
}

/// Typed inputs for one inventory run.
#[derive(Clone)]
pub struct InventoryRequest {
    /// Root directories as supplied (may be relative or start with `~`)
    pub roots: Vec<PathBuf>,
    /// Filename patterns
    pub patterns: PatternSet,
    /// Directories to prune, as supplied
    pub skip_dirs: Vec<PathBuf>,
    /// Run duplicate detection
    pub find_duplicates: bool,
    /// Descend into symlinked directories
    pub follow_dir_symlinks: bool,
    /// Hashing threads
    pub io_threads: usize,
    /// Optional progress callback
    pub progress: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for InventoryRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InventoryRequest")
            .field("roots", &self.roots)
            .field("patterns", &self.patterns.patterns())
            .field("skip_dirs", &self.skip_dirs)
            .field("find_duplicates", &self.find_duplicates)
            .field("follow_dir_symlinks", &self.follow_dir_symlinks)
            .field("io_threads", &self.io_threads)
            .finish_non_exhaustive()
    }
}

impl InventoryRequest {
    /// A request over `roots` with default options.
    #[must_use]
    pub fn new(roots: Vec<PathBuf>, patterns: PatternSet) -> Self {
        Self {
            roots,
            patterns,
            skip_dirs: Vec::new(),
            find_duplicates: false,
            follow_dir_symlinks: false,
            io_threads: 4,
            progress: None,
        }
    }

    /// Set the directories to prune.
    #[must_use]
    pub fn with_skip_dirs(mut self, skip_dirs: Vec<PathBuf>) -> Self {
        self.skip_dirs = skip_dirs;
        self
    }

    /// Enable or disable duplicate detection.
    #[must_use]
    pub fn with_duplicates(mut self, enabled: bool) -> Self {
        self.find_duplicates = enabled;
        self
    }

    /// Enable or disable following symlinked directories.
    #[must_use]
    pub fn with_follow_dir_symlinks(mut self, follow: bool) -> Self {
        self.follow_dir_symlinks = follow;
        self
    }

    /// Set the number of hashing threads.
    #[must_use]
    pub fn with_io_threads(mut self, threads: usize) -> Self {
        self.io_threads = threads.max(1);
        self
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress(mut self, progress: Arc<dyn ProgressCallback>) -> Self {
        self.progress = Some(progress);
        self
    }
}

/// Structured result of an inventory run.
#[derive(Debug, Serialize)]
pub struct InventoryReport {
    /// Roots actually walked, sorted
    pub roots: Vec<PathBuf>,
    /// Discovered files, ascending by size
    pub files: SizeCollection,
    /// Statistics over `files`
    pub summary: Summary,
    /// Duplicate groups, if detection was requested
    pub duplicates: Option<DuplicateReport>,
    /// Recovered per-item problems
    pub warnings: Vec<Warning>,
}

impl InventoryReport {
    /// Whether any per-item problem was recorded.
    #[must_use]
    pub fn is_partial(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Walk every root in turn, returning matching paths in scan order.
///
/// Unreadable directories become warnings; a symlink cycle aborts the run.
pub fn discover(
    roots: &[PathBuf],
    config: &WalkerConfig,
    progress: Option<&dyn ProgressCallback>,
    warnings: &mut Vec<Warning>,
) -> Result<Vec<PathBuf>, InventoryError> {
    if let Some(callback) = progress {
        callback.on_phase_start(WALK_PHASE, 0);
    }

    let mut files = Vec::new();
    for root in roots {
        log::info!("Walking {}", root.display());
        let walker = Walker::new(root, config.clone());
        for entry in walker.walk() {
            match entry {
                Ok(path) => {
                    if let Some(callback) = progress {
                        callback.on_progress(files.len() + 1, path.to_string_lossy().as_ref());
                    }
                    files.push(path);
                }
                Err(e @ ScanError::SymlinkCycle { .. }) => {
                    return Err(InventoryError::SymlinkCycle(e));
                }
                Err(e) => warnings.push(Warning::from(&e)),
            }
        }
    }

    if let Some(callback) = progress {
        callback.on_phase_end(WALK_PHASE);
    }
    log::info!("Discovered {} matching files", files.len());
    Ok(files)
}

/// Run a complete inventory.
pub fn run_inventory(request: &InventoryRequest) -> Result<InventoryReport, InventoryError> {
    let mut warnings = Vec::new();

    let (roots, root_errors) = normalize_each(&request.roots);
    warnings.extend(root_errors.iter().map(Warning::from));
    if roots.is_empty() {
        return Err(InventoryError::NoValidRoots(root_errors));
    }
    let roots = collapse_nested(&roots);

    let (skip, skip_errors) = SkipSet::resolve(&request.skip_dirs);
    warnings.extend(skip_errors.iter().map(Warning::from));

    let config = WalkerConfig::new(request.patterns.clone(), skip)
        .with_follow_dir_symlinks(request.follow_dir_symlinks);
    let progress = request.progress.as_deref();

    let paths = discover(&roots, &config, progress, &mut warnings)?;

    let outcome = collect(paths.iter().cloned());
    warnings.extend(outcome.errors.iter().map(Warning::from));
    let files = outcome.collection;

    let summary = summarize(&files)?;

    let duplicates = if request.find_duplicates {
        let mut finder_config = FinderConfig::default().with_io_threads(request.io_threads);
        if let Some(ref callback) = request.progress {
            finder_config = finder_config.with_progress_callback(Arc::clone(callback));
        }
        let report = DuplicateFinder::new(finder_config).find(&paths, &files)?;
        warnings.extend(report.errors.iter().map(Warning::from));
        Some(report)
    } else {
        None
    };

    if !warnings.is_empty() {
        log::warn!("Completed with {} skipped items", warnings.len());
    }

    Ok(InventoryReport {
        roots,
        files,
        summary,
        duplicates,
        warnings,
    })
}

/// Convenience wrapper: inventory a single root with a pattern string.
pub fn inventory_root(root: &Path, patterns: &str) -> Result<InventoryReport, InventoryError> {
    let patterns = PatternSet::parse(patterns)?;
    run_inventory(&InventoryRequest::new(vec![root.to_path_buf()], patterns))
}
