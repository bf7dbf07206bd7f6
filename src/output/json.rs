//! JSON output formatter for inventory results.
//!
//! Provides machine-readable JSON output for scripting and automation.
//!
//! # Output Schema
//!
//! ```json
//! {
//!   "roots": ["/data"],
//!   "summary": {
//!     "count": 3, "sum": 600, "mean": 200.0, "min": 100, "max": 300,
//!     "median": 200.0, "stddev": 81.6, "variance": 6666.7
//!   },
//!   "files": [{ "size": 100, "path": "/data/a.nii" }],
//!   "duplicates": {
//!     "groups": [{ "hash": "abc123...", "size": 100, "files": ["/data/a.nii", "/data/b.nii"] }],
//!     "hashed_files": 2,
//!     "unique_size_files": 1,
//!     "duplicate_files": 2,
//!     "wasted_space": 100
//!   },
//!   "warnings": [{ "kind": "permission_denied", "path": "/data/x", "message": "..." }],
//!   "exit_code": 0,
//!   "exit_code_name": "FS000"
//! }
//! ```
//!
//! `duplicates` is `null` unless detection was requested.

use std::io::Write;
use std::path::PathBuf;

use serde::Serialize;

use crate::duplicates::DuplicateGroup;
use crate::error::ExitCode;
use crate::inventory::{InventoryReport, Warning};
use crate::stats::{SizeCollection, Summary};

/// Duplicate section in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonDuplicates<'a> {
    /// Duplicate groups, in order of first appearance
    pub groups: &'a [DuplicateGroup],
    /// Number of files hashed
    pub hashed_files: usize,
    /// Number of files skipped because their size is unique
    pub unique_size_files: usize,
    /// Total number of files in any group
    pub duplicate_files: usize,
    /// Bytes reclaimable by keeping one copy per group
    pub wasted_space: u64,
}

/// Complete JSON output structure.
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput<'a> {
    /// Roots actually walked
    pub roots: &'a [PathBuf],
    /// Size statistics
    pub summary: &'a Summary,
    /// Every file, ascending by size
    pub files: &'a SizeCollection,
    /// Duplicate section, if requested
    pub duplicates: Option<JsonDuplicates<'a>>,
    /// Recovered per-item problems
    pub warnings: &'a [Warning],
    /// The exit code number
    pub exit_code: i32,
    /// The machine-readable exit code name (e.g., "FS000")
    pub exit_code_name: &'static str,
}

impl<'a> JsonOutput<'a> {
    /// Create a new JSON output from a report and the exit code of the run.
    #[must_use]
    pub fn new(report: &'a InventoryReport, exit_code: ExitCode) -> Self {
        Self {
            roots: &report.roots,
            summary: &report.summary,
            files: &report.files,
            duplicates: report.duplicates.as_ref().map(|d| JsonDuplicates {
                groups: &d.groups,
                hashed_files: d.hashed_files,
                unique_size_files: d.unique_size_files,
                duplicate_files: d.duplicate_files(),
                wasted_space: d.wasted_space(),
            }),
            warnings: &report.warnings,
            exit_code: exit_code.as_i32(),
            exit_code_name: exit_code.code_prefix(),
        }
    }

    /// Serialize to compact JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (unlikely for valid data).
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize to pretty-printed JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (unlikely for valid data).
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write JSON to a writer, followed by a newline.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W, pretty: bool) -> Result<(), JsonOutputError> {
        let json = if pretty {
            self.to_json_pretty()?
        } else {
            self.to_json()?
        };
        writer.write_all(json.as_bytes())?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}

/// Errors that can occur during JSON output.
#[derive(thiserror::Error, Debug)]
pub enum JsonOutputError {
    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error during writing
    #[error("I/O error during JSON generation: {0}")]
    Io(#[from] std::io::Error),
}
