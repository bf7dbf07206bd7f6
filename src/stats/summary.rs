//! Distribution statistics over a size collection.
//!
//! Sizes are accumulated in one pass: an exact integer sum plus a running
//! mean and sum of squared deviations (Welford), which gives the population
//! variance without the cancellation error of `E[x²] - E[x]²`.
//!
//! `min` and `max` are read from the ends of the sorted collection and
//! cross-checked against the accumulator, so an ordering regression surfaces
//! as [`StatsError::SortInvariant`] instead of a wrong report.

use serde::Serialize;

use super::{SizeCollection, StatsError};

/// Aggregate statistics over file sizes (bytes).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    /// Number of files
    pub count: usize,
    /// Exact total size
    pub sum: u128,
    /// Arithmetic mean
    pub mean: f64,
    /// Smallest size
    pub min: u64,
    /// Largest size
    pub max: u64,
    /// Median size (average of the two middle sizes for an even count)
    pub median: f64,
    /// Population standard deviation
    pub stddev: f64,
    /// Population variance
    pub variance: f64,
}

/// Streaming accumulator for size statistics.
#[derive(Debug, Clone, Copy, Default)]
pub struct Accumulator {
    count: usize,
    sum: u128,
    mean: f64,
    m2: f64,
    min: u64,
    max: u64,
}

impl Accumulator {
    /// Create an empty accumulator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one size.
    pub fn push(&mut self, size: u64) {
        if self.count == 0 {
            self.min = size;
            self.max = size;
        } else {
            self.min = self.min.min(size);
            self.max = self.max.max(size);
        }
        self.count += 1;
        self.sum += u128::from(size);

        let x = size as f64;
        let delta = x - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (x - self.mean);
    }

    /// Number of sizes pushed so far.
    #[must_use]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Exact sum of sizes pushed so far.
    #[must_use]
    pub fn sum(&self) -> u128 {
        self.sum
    }

    /// Smallest and largest size, if any were pushed.
    #[must_use]
    pub fn range(&self) -> Option<(u64, u64)> {
        (self.count > 0).then_some((self.min, self.max))
    }

    /// Population variance, if any sizes were pushed.
    #[must_use]
    pub fn variance(&self) -> Option<f64> {
        (self.count > 0).then(|| (self.m2 / self.count as f64).max(0.0))
    }
}

impl Extend<u64> for Accumulator {
    fn extend<T: IntoIterator<Item = u64>>(&mut self, iter: T) {
        for size in iter {
            self.push(size);
        }
    }
}

/// Summarize a size collection.
///
/// Fails with [`StatsError::EmptyInput`] for an empty collection and with
/// [`StatsError::SortInvariant`] if the collection is not ordered by size.
pub fn summarize(sizes: &SizeCollection) -> Result<Summary, StatsError> {
    let (Some(first), Some(last)) = (sizes.min(), sizes.max()) else {
        return Err(StatsError::EmptyInput);
    };

    let mut acc = Accumulator::new();
    acc.extend(sizes.iter().map(|r| r.size));

    let (min, max) = acc.range().ok_or(StatsError::EmptyInput)?;
    if first.size != min || last.size != max {
        return Err(StatsError::SortInvariant {
            first: first.size,
            min,
            last: last.size,
            max,
        });
    }

    let count = acc.count();
    let variance = acc.variance().ok_or(StatsError::EmptyInput)?;
    let records = sizes.records();
    let median = if count % 2 == 1 {
        records[count / 2].size as f64
    } else {
        (records[count / 2 - 1].size as f64 + records[count / 2].size as f64) / 2.0
    };

    let summary = Summary {
        count,
        sum: acc.sum(),
        mean: acc.sum() as f64 / count as f64,
        min: first.size,
        max: last.size,
        median,
        stddev: variance.sqrt(),
        variance,
    };
    log::debug!("Summary: {:?}", summary);
    Ok(summary)
}
