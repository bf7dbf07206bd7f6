//! Size collection and distribution statistics.
//!
//! - [`collector`]: resolves discovered paths to size-ordered [`FileRecord`]s
//! - [`summary`]: aggregates a [`SizeCollection`] into a [`Summary`]

pub mod collector;
pub mod summary;

pub use collector::{collect, CollectOutcome, FileRecord, SizeCollection};
pub use summary::{summarize, Accumulator, Summary};

/// Errors raised by the statistics layer.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum StatsError {
    /// No files to summarize.
    #[error("No files to summarize")]
    EmptyInput,

    /// The size collection is not ordered by size.
    #[error("Size collection is out of order: first={first} min={min}, last={last} max={max}")]
    SortInvariant {
        /// Size of the first record
        first: u64,
        /// Smallest size seen
        min: u64,
        /// Size of the last record
        last: u64,
        /// Largest size seen
        max: u64,
    },
}
