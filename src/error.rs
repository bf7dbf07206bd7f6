//! Structured error handling and exit codes.

use serde::Serialize;

/// Exit codes for the filestats binary.
///
/// - 0: Success (completed normally, no items skipped)
/// - 1: General error (bad configuration, no usable root, unexpected failure)
/// - 2: No files (no file matched the patterns)
/// - 3: Partial success (completed, but some items were skipped)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitCode {
    /// Success: Inventory completed without skipped items.
    Success = 0,
    /// General error: An unexpected error occurred.
    GeneralError = 1,
    /// No files: Nothing matched, so there is nothing to summarize.
    NoFiles = 2,
    /// Partial success: Completed, but some directories or files were skipped.
    PartialSuccess = 3,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get the machine-readable code prefix.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "FS000",
            Self::GeneralError => "FS001",
            Self::NoFiles => "FS002",
            Self::PartialSuccess => "FS003",
        }
    }

    /// Pick the exit code for an application error.
    #[must_use]
    pub fn for_error(err: &anyhow::Error) -> Self {
        match err.downcast_ref::<crate::inventory::InventoryError>() {
            Some(crate::inventory::InventoryError::Stats(crate::stats::StatsError::EmptyInput)) => {
                Self::NoFiles
            }
            _ => Self::GeneralError,
        }
    }
}

/// Structured error information for JSON output.
#[derive(Debug, Serialize)]
pub struct StructuredError {
    /// The error code (e.g., "FS001")
    pub code: String,
    /// The exit code number
    pub exit_code: i32,
    /// Human-readable error message, including its causes
    pub message: String,
}

impl StructuredError {
    /// Create a new structured error from an anyhow error and an exit code.
    #[must_use]
    pub fn new(err: &anyhow::Error, exit_code: ExitCode) -> Self {
        Self {
            code: exit_code.code_prefix().to_string(),
            exit_code: exit_code.as_i32(),
            message: format!("{err:#}"),
        }
    }
}
