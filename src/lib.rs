//! filestats - File Inventory and Duplicate Finder
//!
//! Recursively inventories files matching glob patterns under one or more
//! roots, summarizes their sizes and optionally groups files with identical
//! content using BLAKE3.

pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod inventory;
pub mod logging;
pub mod output;
pub mod progress;
pub mod scanner;
pub mod stats;

use std::io::Write;
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::cli::{Cli, OutputFormat};
use crate::config::Config;
use crate::error::ExitCode;
use crate::inventory::{run_inventory, InventoryRequest};
use crate::output::{JsonOutput, TextOutput};
use crate::progress::Progress;

/// Run the application for parsed command-line arguments.
///
/// Returns [`ExitCode::PartialSuccess`] when the inventory completed but
/// some items were skipped.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, no root is usable,
/// nothing matched, or writing the report fails.
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);

    let config = match cli.config.as_deref() {
        Some(path) => Config::load_from(path)?,
        None => Config::load(),
    };
    let settings = cli.settings(config).context("Invalid patterns in configuration")?;
    log::debug!("Patterns: {:?}", settings.patterns.patterns());

    let mut request = InventoryRequest::new(cli.roots.clone(), settings.patterns)
        .with_skip_dirs(settings.skip_dirs)
        .with_duplicates(cli.duplicates)
        .with_follow_dir_symlinks(settings.follow_dir_symlinks)
        .with_io_threads(settings.io_threads);
    if !cli.quiet && !cli.no_progress {
        request = request.with_progress(Arc::new(Progress::new(false)));
    }

    let report = run_inventory(&request).context("Inventory failed")?;
    let exit_code = if report.is_partial() {
        ExitCode::PartialSuccess
    } else {
        ExitCode::Success
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match cli.output {
        OutputFormat::Text => TextOutput::new(&report)
            .with_top(settings.top)
            .with_list_all(cli.list)
            .write_to(&mut out)
            .context("Failed to write report")?,
        OutputFormat::Json => JsonOutput::new(&report, exit_code)
            .write_to(&mut out, true)
            .context("Failed to write report")?,
    }
    out.flush().context("Failed to write report")?;

    Ok(exit_code)
}
