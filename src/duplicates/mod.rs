//! Duplicate detection module.
//!
//! This module provides functionality for:
//! - Size pre-filtering of candidates
//! - Parallel content hashing on a bounded pool
//! - Digest-keyed duplicate grouping

pub mod finder;
pub mod groups;

pub use finder::{DuplicateFinder, DuplicateReport, FinderConfig, FinderError};
pub use groups::{group, DuplicateGroup};
