//! Scanner module for root normalization, directory traversal and file hashing.
//!
//! This module provides functionality for:
//! - Root and skip-directory normalization
//! - Shell-glob filename matching
//! - Sorted, pruned directory walking using walkdir
//! - Content hashing with BLAKE3 (streaming)
//!
//! # Architecture
//!
//! The scanner is divided into submodules:
//! - [`path_utils`]: Root normalization and the skip set
//! - [`pattern`]: Filename pattern matching
//! - [`walker`]: Directory traversal and file discovery
//! - [`hasher`]: BLAKE3 file hashing (streaming)
//!
//! # Example
//!
//! ```no_run
//! use filestats::scanner::{PatternSet, SkipSet, Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let config = WalkerConfig::new(PatternSet::parse("*.nii*;*.img*").unwrap(), SkipSet::default());
//!
//! let walker = Walker::new(Path::new("."), config);
//! for entry in walker.walk() {
//!     match entry {
//!         Ok(path) => println!("{}", path.display()),
//!         Err(e) => eprintln!("Warning: {}", e),
//!     }
//! }
//! ```

pub mod hasher;
pub mod path_utils;
pub mod pattern;
pub mod walker;

use std::io;
use std::path::PathBuf;

// Re-export main types
pub use hasher::{hash_to_hex, Hash, HashBatch, HashedFile, Hasher, CHUNK_SIZE};
pub use path_utils::{collapse_nested, normalize, normalize_each, normalize_path, SkipSet};
pub use pattern::{PatternError, PatternSet};
pub use walker::{Walker, WalkerConfig};

/// Errors raised while resolving root or skip paths.
#[derive(thiserror::Error, Debug)]
pub enum PathError {
    /// The resolved path does not exist on the filesystem.
    #[error("Path does not exist: {0}")]
    InvalidPath(PathBuf),

    /// The path could not be made absolute (no working directory or home directory).
    #[error("Cannot resolve {path}: {source}")]
    Unresolvable {
        /// Path as supplied by the caller
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },
}

impl PathError {
    /// The path this error refers to.
    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::InvalidPath(path) | Self::Unresolvable { path, .. } => path,
        }
    }
}

/// Errors that can occur during directory scanning and size collection.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// Permission was denied when accessing a file or directory.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// The file disappeared between discovery and stat.
    #[error("File vanished: {0}")]
    Vanished(PathBuf),

    /// Following directory symlinks led back to an ancestor.
    #[error("Symlink cycle: {path} points back to {ancestor}")]
    SymlinkCycle {
        /// Directory entry that closes the loop
        path: PathBuf,
        /// Ancestor directory it resolves to
        ancestor: PathBuf,
    },

    /// An I/O error occurred while accessing a file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },
}

impl ScanError {
    /// Classify an I/O error raised for `path`.
    pub(crate) fn from_io(path: PathBuf, error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::PermissionDenied => {
                log::warn!("Permission denied: {}", path.display());
                Self::PermissionDenied(path)
            }
            io::ErrorKind::NotFound => {
                log::warn!("File vanished before stat: {}", path.display());
                Self::Vanished(path)
            }
            _ => {
                log::warn!("I/O error for {}: {}", path.display(), error);
                Self::Io {
                    path,
                    source: error,
                }
            }
        }
    }

    /// The path this error refers to.
    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::PermissionDenied(path) | Self::Vanished(path) => path,
            Self::SymlinkCycle { path, .. } | Self::Io { path, .. } => path,
        }
    }
}

/// Errors that can occur during file hashing.
#[derive(thiserror::Error, Debug)]
pub enum HashError {
    /// The file could not be opened or read.
    #[error("Cannot read {path}: {source}")]
    Unreadable {
        /// Path of the unreadable file
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },
}

impl HashError {
    /// The path this error refers to.
    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::Unreadable { path, .. } => path,
        }
    }
}
