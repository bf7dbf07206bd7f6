//! Application configuration management.
//!
//! Settings are layered with figment, lowest priority first:
//!
//! 1. Built-in defaults ([`Config::default`])
//! 2. `config.toml` in the platform config directory, or the file given with `--config`
//! 3. Environment variables prefixed `FILESTATS_` (e.g. `FILESTATS_IO_THREADS=8`)
//! 4. Command-line flags (applied by the caller)
//!
//! ```toml
//! patterns = "*.nii*;*.img*"
//! skip_dirs = ["~/data/scratch"]
//! io_threads = 8
//! top = 20
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

/// Prefix for configuration environment variables.
pub const ENV_PREFIX: &str = "FILESTATS_";

/// Default filename patterns: NIfTI and Analyze images, compressed or not.
pub const DEFAULT_PATTERNS: &str = "*.nii*;*.img*";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Semicolon-delimited filename globs.
    pub patterns: String,
    /// Directories excluded from every walk.
    pub skip_dirs: Vec<PathBuf>,
    /// Threads used for hashing.
    pub io_threads: usize,
    /// Descend into symlinked directories.
    pub follow_dir_symlinks: bool,
    /// Length of the ranked largest-file listing.
    pub top: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            patterns: DEFAULT_PATTERNS.to_string(),
            skip_dirs: Vec::new(),
            io_threads: 4,
            follow_dir_symlinks: false,
            top: 10,
        }
    }
}

impl Config {
    /// Load from the default platform-specific path and the environment.
    ///
    /// Any failure falls back to the defaults.
    pub fn load() -> Self {
        let path = Self::config_path();
        match Self::figment(path.as_deref()).extract() {
            Ok(config) => config,
            Err(e) => {
                log::debug!("Failed to load config, using defaults: {}", e);
                Self::default()
            }
        }
    }

    /// Load from an explicit file and the environment.
    ///
    /// Unlike [`Config::load`], a missing or malformed file is an error.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.is_file() {
            anyhow::bail!("Config file not found: {}", path.display());
        }
        Self::figment(Some(path))
            .extract()
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// The layered figment: defaults < file < environment.
    pub fn figment(file: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = file {
            log::debug!("Reading config from {}", path.display());
            figment = figment.merge(Toml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Get the default platform-specific configuration path.
    #[must_use]
    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("org", "filestats", "filestats")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }
}
