//! Filename pattern matching with shell-style globs.
//!
//! Patterns apply to the final path component only. A name matches the set
//! if it matches any pattern; order does not affect the result.

use std::path::Path;

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};

/// Separator used for pattern lists supplied as a single string.
pub const PATTERN_SEPARATOR: char = ';';

/// Errors raised while building a [`PatternSet`].
#[derive(thiserror::Error, Debug)]
pub enum PatternError {
    /// No usable pattern was supplied.
    #[error("At least one filename pattern is required")]
    Empty,

    /// A pattern failed to compile.
    #[error("Invalid pattern '{pattern}': {source}")]
    Invalid {
        /// The offending pattern
        pattern: String,
        /// The underlying glob error
        #[source]
        source: globset::Error,
    },
}

/// A compiled, OR-combined set of filename globs.
#[derive(Debug, Clone)]
pub struct PatternSet {
    patterns: Vec<String>,
    set: GlobSet,
}

impl PatternSet {
    /// Compile a list of glob patterns.
    ///
    /// Supports `*`, `?` and `[...]`. Blank entries are ignored; an empty
    /// result is rejected.
    pub fn new<I, S>(patterns: I) -> Result<Self, PatternError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut builder = GlobSetBuilder::new();
        let mut kept = Vec::new();

        for pattern in patterns {
            let pattern = pattern.as_ref().trim();
            if pattern.is_empty() {
                continue;
            }
            let glob = GlobBuilder::new(pattern)
                .literal_separator(true)
                .backslash_escape(true)
                .build()
                .map_err(|source| PatternError::Invalid {
                    pattern: pattern.to_string(),
                    source,
                })?;
            builder.add(glob);
            kept.push(pattern.to_string());
        }

        if kept.is_empty() {
            return Err(PatternError::Empty);
        }

        let set = builder.build().map_err(|source| PatternError::Invalid {
            pattern: kept.join(";"),
            source,
        })?;
        log::debug!("Compiled {} filename patterns: {:?}", kept.len(), kept);

        Ok(Self {
            patterns: kept,
            set,
        })
    }

    /// Compile a semicolon-delimited pattern list such as `"*.nii*;*.img*"`.
    pub fn parse(list: &str) -> Result<Self, PatternError> {
        Self::new(list.split(PATTERN_SEPARATOR))
    }

    /// Whether `file_name` matches any pattern.
    #[must_use]
    pub fn matches(&self, file_name: &str) -> bool {
        self.set.is_match(file_name)
    }

    /// Whether the final component of `path` matches any pattern.
    ///
    /// Paths without a final component (e.g. `/`) never match.
    #[must_use]
    pub fn matches_path(&self, path: &Path) -> bool {
        path.file_name()
            .is_some_and(|name| self.set.is_match(Path::new(name)))
    }

    /// The source patterns, in the order given.
    #[must_use]
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }
}

/// Whether `file_name` matches any of `patterns`.
///
/// Compiles the patterns on every call; build a [`PatternSet`] once when
/// matching many names.
pub fn matches<S: AsRef<str>>(file_name: &str, patterns: &[S]) -> Result<bool, PatternError> {
    Ok(PatternSet::new(patterns)?.matches(file_name))
}
