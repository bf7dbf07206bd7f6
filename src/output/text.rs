//! Plain-text report.
//!
//! ```text
//! Roots:    /data
//! Files:    3
//! Total:    1.2 MiB (1258291 bytes)
//! Mean:     409.6 KiB
//! ...
//! ```

use std::io::{self, Write};

use bytesize::ByteSize;

use crate::inventory::InventoryReport;

/// Default length of the largest-file ranking.
pub const DEFAULT_TOP: usize = 10;

/// Human-readable formatter over a finished report.
#[derive(Debug, Clone, Copy)]
pub struct TextOutput<'a> {
    report: &'a InventoryReport,
    top: usize,
    list_all: bool,
}

impl<'a> TextOutput<'a> {
    /// Formatter with the default ranking length and no full listing.
    #[must_use]
    pub fn new(report: &'a InventoryReport) -> Self {
        Self {
            report,
            top: DEFAULT_TOP,
            list_all: false,
        }
    }

    /// Number of largest files to rank (0 hides the section).
    #[must_use]
    pub fn with_top(mut self, top: usize) -> Self {
        self.top = top;
        self
    }

    /// Also list every file, smallest first.
    #[must_use]
    pub fn with_list_all(mut self, list_all: bool) -> Self {
        self.list_all = list_all;
        self
    }

    /// Write the report.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        self.write_summary(writer)?;
        if self.top > 0 {
            self.write_largest(writer)?;
        }
        if self.list_all {
            self.write_listing(writer)?;
        }
        if self.report.duplicates.is_some() {
            self.write_duplicates(writer)?;
        }
        if !self.report.warnings.is_empty() {
            self.write_warnings(writer)?;
        }
        Ok(())
    }

    fn write_summary<W: Write>(&self, w: &mut W) -> io::Result<()> {
        let s = &self.report.summary;
        let roots: Vec<String> = self
            .report
            .roots
            .iter()
            .map(|r| r.display().to_string())
            .collect();

        writeln!(w, "Roots:    {}", roots.join(", "))?;
        writeln!(w, "Files:    {}", s.count)?;
        writeln!(w, "Total:    {} ({} bytes)", human_u128(s.sum), s.sum)?;
        writeln!(w, "Mean:     {}", human_f64(s.mean))?;
        writeln!(w, "Median:   {}", human_f64(s.median))?;
        writeln!(w, "Std dev:  {}", human_f64(s.stddev))?;
        writeln!(w, "Smallest: {}", ByteSize::b(s.min))?;
        writeln!(w, "Largest:  {}", ByteSize::b(s.max))
    }

    fn write_largest<W: Write>(&self, w: &mut W) -> io::Result<()> {
        writeln!(w)?;
        writeln!(w, "Largest files:")?;
        for (rank, record) in self.report.files.largest(self.top).enumerate() {
            writeln!(
                w,
                "{:>4}. {:>12}  {}",
                rank + 1,
                ByteSize::b(record.size).to_string(),
                record.path.display()
            )?;
        }
        Ok(())
    }

    fn write_listing<W: Write>(&self, w: &mut W) -> io::Result<()> {
        writeln!(w)?;
        writeln!(w, "All files:")?;
        for record in &self.report.files {
            writeln!(w, "{:>12}  {}", record.size, record.path.display())?;
        }
        Ok(())
    }

    fn write_duplicates<W: Write>(&self, w: &mut W) -> io::Result<()> {
        let Some(dups) = self.report.duplicates.as_ref() else {
            return Ok(());
        };

        writeln!(w)?;
        if dups.groups.is_empty() {
            return writeln!(w, "No duplicates found ({} files hashed)", dups.hashed_files);
        }
        writeln!(
            w,
            "Duplicates: {} groups, {} files, {} reclaimable",
            dups.groups.len(),
            dups.duplicate_files(),
            ByteSize::b(dups.wasted_space())
        )?;
        for group in &dups.groups {
            writeln!(w)?;
            writeln!(
                w,
                "  {} x {} [{}]",
                group.len(),
                ByteSize::b(group.size),
                &group.hash_hex()[..16]
            )?;
            for path in &group.files {
                writeln!(w, "    {}", path.display())?;
            }
        }
        Ok(())
    }

    fn write_warnings<W: Write>(&self, w: &mut W) -> io::Result<()> {
        writeln!(w)?;
        writeln!(w, "Skipped {} items:", self.report.warnings.len())?;
        for warning in &self.report.warnings {
            writeln!(w, "  {}", warning.message)?;
        }
        Ok(())
    }
}

fn human_u128(bytes: u128) -> ByteSize {
    ByteSize::b(u64::try_from(bytes).unwrap_or(u64::MAX))
}

fn human_f64(bytes: f64) -> ByteSize {
    // Sub-byte precision is not meaningful here
    ByteSize::b(bytes.round() as u64)
}
