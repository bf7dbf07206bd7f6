//! BLAKE3 file hasher with streaming support.
//!
//! # Overview
//!
//! [`Hasher`] reads files in fixed-size chunks so memory stays bounded no
//! matter how large the file is. [`Hasher::hash_many`] hashes a batch in
//! parallel on the current rayon pool; each input owns exactly one output
//! slot, so results come back in input order.
//!
//! # Example
//!
//! ```no_run
//! use filestats::scanner::{hash_to_hex, Hasher};
//! use std::path::Path;
//!
//! let hasher = Hasher::new();
//! let hash = hasher.hash(Path::new("scan.nii")).unwrap();
//! println!("{}", hash_to_hex(&hash));
//! ```

use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;

use super::HashError;
use crate::progress::ProgressCallback;

/// A 256-bit BLAKE3 digest.
pub type Hash = [u8; 32];

/// Default read chunk size (64 KiB).
pub const CHUNK_SIZE: usize = 64 * 1024;

/// Phase name reported to progress callbacks.
pub const HASH_PHASE: &str = "hashing";

/// Render a digest as lowercase hexadecimal.
#[must_use]
pub fn hash_to_hex(hash: &Hash) -> String {
    blake3::Hash::from_bytes(*hash).to_hex().to_string()
}

/// A file whose content was hashed successfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashedFile {
    /// Path of the file
    pub path: PathBuf,
    /// Number of bytes read
    pub size: u64,
    /// Content digest
    pub hash: Hash,
}

/// Result of hashing a batch of files.
#[derive(Debug, Default)]
pub struct HashBatch {
    /// Successfully hashed files, in input order
    pub hashed: Vec<HashedFile>,
    /// Files that could not be read, in input order
    pub errors: Vec<HashError>,
}

/// Streaming content hasher.
#[derive(Debug, Clone)]
pub struct Hasher {
    chunk_size: usize,
}

impl Default for Hasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher {
    /// Create a hasher reading [`CHUNK_SIZE`] bytes at a time.
    #[must_use]
    pub fn new() -> Self {
        Self {
            chunk_size: CHUNK_SIZE,
        }
    }

    /// Create a hasher with a custom chunk size (minimum 1 byte).
    #[must_use]
    pub fn with_chunk_size(chunk_size: usize) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
        }
    }

    /// Hash everything `reader` yields, returning the digest and byte count.
    pub fn hash_reader<R: Read>(&self, mut reader: R) -> io::Result<(Hash, u64)> {
        let mut hasher = blake3::Hasher::new();
        let mut buffer = vec![0u8; self.chunk_size];
        let mut total = 0u64;

        loop {
            let read = match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            hasher.update(&buffer[..read]);
            total += read as u64;
        }

        Ok((*hasher.finalize().as_bytes(), total))
    }

    /// Hash the content of the file at `path`.
    pub fn hash(&self, path: &Path) -> Result<Hash, HashError> {
        self.hash_file(path).map(|hashed| hashed.hash)
    }

    /// Hash the file at `path`, keeping the byte count alongside the digest.
    pub fn hash_file(&self, path: &Path) -> Result<HashedFile, HashError> {
        let unreadable = |source| HashError::Unreadable {
            path: path.to_path_buf(),
            source,
        };
        let file = File::open(path).map_err(unreadable)?;
        let (hash, size) = self.hash_reader(file).map_err(unreadable)?;
        log::trace!("Hashed {} ({} bytes)", path.display(), size);

        Ok(HashedFile {
            path: path.to_path_buf(),
            size,
            hash,
        })
    }

    /// Hash a batch of files on the current rayon pool.
    ///
    /// An unreadable file is logged and reported in [`HashBatch::errors`];
    /// the rest of the batch continues. Progress receives one event per file.
    pub fn hash_many(
        &self,
        paths: &[PathBuf],
        progress: Option<&dyn ProgressCallback>,
    ) -> HashBatch {
        if let Some(callback) = progress {
            callback.on_phase_start(HASH_PHASE, paths.len());
        }

        let done = AtomicUsize::new(0);
        let results: Vec<Result<HashedFile, HashError>> = paths
            .par_iter()
            .map(|path| {
                let result = self.hash_file(path);
                if let Some(callback) = progress {
                    let current = done.fetch_add(1, Ordering::Relaxed) + 1;
                    callback.on_progress(current, path.to_string_lossy().as_ref());
                    if let Ok(ref hashed) = result {
                        callback.on_item_completed(hashed.size);
                    }
                }
                result
            })
            .collect();

        let mut batch = HashBatch::default();
        for result in results {
            match result {
                Ok(hashed) => batch.hashed.push(hashed),
                Err(e) => {
                    log::warn!("Failed to hash: {}", e);
                    batch.errors.push(e);
                }
            }
        }

        if let Some(callback) = progress {
            callback.on_phase_end(HASH_PHASE);
        }
        log::debug!(
            "Hashed {} files, {} unreadable",
            batch.hashed.len(),
            batch.errors.len()
        );
        batch
    }
}
