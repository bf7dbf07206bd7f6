//! Digest-keyed duplicate grouping.
//!
//! # Overview
//!
//! [`group`] clusters hashed files by digest in a single pass. Groups are
//! returned in the order their digest was first seen, files within a group
//! in the order they were hashed, and only groups with two or more files
//! are kept.
//!
//! Equal digests are treated as equal content; there is no byte-for-byte
//! re-read. With a 256-bit BLAKE3 digest this is a probabilistic guarantee,
//! not an absolute one.
//!
//! # Example
//!
//! ```
//! use filestats::duplicates::group;
//! use filestats::scanner::HashedFile;
//! use std::path::PathBuf;
//!
//! let same = [7u8; 32];
//! let files = vec![
//!     HashedFile { path: PathBuf::from("/a"), size: 3, hash: same },
//!     HashedFile { path: PathBuf::from("/b"), size: 3, hash: same },
//!     HashedFile { path: PathBuf::from("/c"), size: 3, hash: [8u8; 32] },
//! ];
//!
//! let groups = group(files);
//! assert_eq!(groups.len(), 1);
//! assert_eq!(groups[0].files, vec![PathBuf::from("/a"), PathBuf::from("/b")]);
//! ```

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Serialize, Serializer};

use crate::scanner::{hash_to_hex, Hash, HashedFile};

fn serialize_hex<S: Serializer>(hash: &Hash, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&hash_to_hex(hash))
}

/// Files sharing one content digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateGroup {
    /// BLAKE3 hash of the file content (32 bytes)
    #[serde(serialize_with = "serialize_hex")]
    pub hash: Hash,
    /// File size in bytes (shared by every member)
    pub size: u64,
    /// Member paths, in hashing order
    pub files: Vec<PathBuf>,
}

impl DuplicateGroup {
    /// Create a group with a single member.
    #[must_use]
    pub fn new(hash: Hash, size: u64, first: PathBuf) -> Self {
        Self {
            hash,
            size,
            files: vec![first],
        }
    }

    /// Number of files in this group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if this group is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Number of duplicate copies (total - 1 original).
    #[must_use]
    pub fn duplicate_count(&self) -> usize {
        self.files.len().saturating_sub(1)
    }

    /// Bytes reclaimable by keeping one copy.
    #[must_use]
    pub fn wasted_space(&self) -> u64 {
        self.size.saturating_mul(self.duplicate_count() as u64)
    }

    /// Hash as hexadecimal string.
    #[must_use]
    pub fn hash_hex(&self) -> String {
        hash_to_hex(&self.hash)
    }
}

/// Group hashed files by digest, keeping only groups with 2+ files.
pub fn group<I>(hashed: I) -> Vec<DuplicateGroup>
where
    I: IntoIterator<Item = HashedFile>,
{
    let mut index: HashMap<Hash, usize> = HashMap::new();
    let mut groups: Vec<DuplicateGroup> = Vec::new();

    for file in hashed {
        match index.get(&file.hash) {
            Some(&slot) => groups[slot].files.push(file.path),
            None => {
                index.insert(file.hash, groups.len());
                groups.push(DuplicateGroup::new(file.hash, file.size, file.path));
            }
        }
    }

    let total = groups.len();
    groups.retain(|g| g.len() > 1);
    log::debug!(
        "Grouped {} distinct digests, {} with duplicates",
        total,
        groups.len()
    );
    groups
}
