//! Command-line interface definitions for filestats.
//!
//! # Example
//!
//! ```bash
//! # Size statistics for imaging files under ~/data
//! filestats ~/data
//!
//! # Other patterns, a pruned subtree, and duplicate detection
//! filestats ~/data /mnt/archive -p '*.dcm;*.nii.gz' -s ~/data/scratch -d
//!
//! # JSON for scripting
//! filestats ~/data -o json
//! ```

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::config::Config;
use crate::scanner::{PatternError, PatternSet};

/// File inventory and duplicate finder.
///
/// Recursively finds files matching glob patterns under one or more roots,
/// reports size statistics and optionally groups files with identical content.
#[derive(Debug, Parser)]
#[command(name = "filestats")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Root directories to scan
    #[arg(value_name = "ROOT", required = true)]
    pub roots: Vec<PathBuf>,

    /// Semicolon-delimited filename globs (default from config: "*.nii*;*.img*")
    #[arg(short, long, value_name = "PATTERNS", value_parser = parse_patterns)]
    pub pattern: Option<PatternSet>,

    /// Directory to exclude, with everything beneath it (repeatable)
    #[arg(short, long = "skip", value_name = "DIR")]
    pub skip_dirs: Vec<PathBuf>,

    /// Group files with identical content
    #[arg(short, long)]
    pub duplicates: bool,

    /// Number of largest files to list (0 disables the listing)
    #[arg(long, value_name = "N")]
    pub top: Option<usize>,

    /// List every file, smallest first
    #[arg(long)]
    pub list: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Number of threads for hashing
    #[arg(long, value_name = "N")]
    pub io_threads: Option<usize>,

    /// Descend into symlinked directories (cycles abort the run)
    #[arg(long)]
    pub follow_dir_symlinks: bool,

    /// Configuration file (TOML)
    #[arg(long, value_name = "PATH", env = "FILESTATS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Report errors as JSON on stderr
    #[arg(long)]
    pub json_errors: bool,

    /// Hide progress bars
    #[arg(long, env = "FILESTATS_NO_PROGRESS")]
    pub no_progress: bool,

    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors and the report
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Output format for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// JSON for scripting
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Parse a semicolon-delimited pattern list.
///
/// # Examples
///
/// ```
/// use filestats::cli::parse_patterns;
///
/// let set = parse_patterns("*.nii*; *.img*").unwrap();
/// assert_eq!(set.patterns(), ["*.nii*", "*.img*"]);
/// assert!(parse_patterns(" ; ").is_err());
/// ```
pub fn parse_patterns(s: &str) -> Result<PatternSet, PatternError> {
    PatternSet::parse(s)
}

/// Settings after merging the CLI over the layered config.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Filename patterns
    pub patterns: PatternSet,
    /// Skip directories from config and CLI
    pub skip_dirs: Vec<PathBuf>,
    /// Hashing threads
    pub io_threads: usize,
    /// Follow symlinked directories
    pub follow_dir_symlinks: bool,
    /// Ranked listing length
    pub top: usize,
}

impl Cli {
    /// Apply command-line flags on top of `config`.
    pub fn settings(&self, config: Config) -> Result<Settings, PatternError> {
        let patterns = match &self.pattern {
            Some(set) => set.clone(),
            None => PatternSet::parse(&config.patterns)?,
        };
        let mut skip_dirs = config.skip_dirs;
        skip_dirs.extend(self.skip_dirs.iter().cloned());

        Ok(Settings {
            patterns,
            skip_dirs,
            io_threads: self.io_threads.unwrap_or(config.io_threads).max(1),
            follow_dir_symlinks: self.follow_dir_symlinks || config.follow_dir_symlinks,
            top: self.top.unwrap_or(config.top),
        })
    }
}
