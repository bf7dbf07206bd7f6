//! Root normalization and skip-directory matching.
//!
//! Roots are resolved to absolute, NFC-normalized paths without trailing
//! separators and collected into a sorted set. Skip directories are compared
//! component-wise, so `/data/raw` prunes `/data/raw/x` but not `/data/rawer`.
//!
//! # Background
//!
//! macOS uses NFD (Decomposed) normalization for file paths, while Windows
//! and Linux typically use NFC (Composed) normalization. The same visual
//! filename can have different byte representations:
//!
//! - NFC: `café` - 'é' is U+00E9 (single code point)
//! - NFD: `café` - 'e' U+0065 + combining acute accent U+0301
//!
//! Without normalization, a skip entry typed on one system would not prune
//! the directory listed by another.
//!
//! # Example
//!
//! ```no_run
//! use filestats::scanner::path_utils::{normalize, SkipSet};
//!
//! let roots = normalize(["~/data/", "~/data"]).unwrap();
//! assert_eq!(roots.len(), 1);
//!
//! let skip = SkipSet::new(roots.iter().map(|r| r.join("raw")));
//! ```

use std::borrow::Cow;
use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};

use directories::BaseDirs;
use unicode_normalization::UnicodeNormalization;

use super::PathError;

/// Normalize a path string to NFC (Composed) form.
#[must_use]
pub fn normalize_path_str(s: &str) -> Cow<'_, str> {
    if unicode_normalization::is_nfc(s) {
        Cow::Borrowed(s)
    } else {
        Cow::Owned(s.nfc().collect())
    }
}

/// Normalize a [`Path`] to NFC form.
///
/// Paths that are not valid UTF-8 are returned unchanged.
#[must_use]
pub fn normalize_pathbuf(path: &Path) -> Cow<'_, Path> {
    match path.to_str().map(normalize_path_str) {
        Some(Cow::Owned(s)) => Cow::Owned(PathBuf::from(s)),
        _ => Cow::Borrowed(path),
    }
}

/// Expand a leading `~` component to the invoking user's home directory.
fn expand_home(path: &Path) -> Result<PathBuf, PathError> {
    let mut components = path.components();
    match components.next() {
        Some(Component::Normal(first)) if first == "~" => {
            let home = BaseDirs::new()
                .map(|dirs| dirs.home_dir().to_path_buf())
                .ok_or_else(|| PathError::Unresolvable {
                    path: path.to_path_buf(),
                    source: std::io::Error::new(
                        std::io::ErrorKind::NotFound,
                        "home directory is unknown",
                    ),
                })?;
            Ok(home.join(components.as_path()))
        }
        _ => Ok(path.to_path_buf()),
    }
}

/// Lexically resolve `.` and `..` components of an absolute path.
///
/// Collecting components also drops trailing separators.
fn clean(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Resolve a single path: home expansion, absolute form, `.`/`..` cleanup,
/// trailing-separator stripping and NFC normalization. The NFC form is kept
/// only if it exists; otherwise the on-disk spelling is.
///
/// Fails with [`PathError::InvalidPath`] if the result does not exist.
pub fn normalize_path(path: impl AsRef<Path>) -> Result<PathBuf, PathError> {
    let raw = path.as_ref();
    let expanded = expand_home(raw)?;
    let absolute = std::path::absolute(&expanded).map_err(|source| PathError::Unresolvable {
        path: raw.to_path_buf(),
        source,
    })?;
    let cleaned = clean(&absolute);
    let nfc = normalize_pathbuf(&cleaned).into_owned();
    // Byte-exact filesystems may store the name decomposed
    let resolved = if nfc != cleaned && !nfc.exists() {
        cleaned
    } else {
        nfc
    };

    if !resolved.exists() {
        return Err(PathError::InvalidPath(resolved));
    }
    log::trace!("Normalized {} -> {}", raw.display(), resolved.display());
    Ok(resolved)
}

/// Normalize every path, failing on the first one that cannot be resolved.
///
/// Duplicates collapse; the set iterates in sorted order.
pub fn normalize<I, P>(paths: I) -> Result<BTreeSet<PathBuf>, PathError>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    paths.into_iter().map(normalize_path).collect()
}

/// Normalize every path, keeping the valid ones and returning the failures.
///
/// One bad root must not abort the others in a multi-root run.
pub fn normalize_each<I, P>(paths: I) -> (BTreeSet<PathBuf>, Vec<PathError>)
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let mut roots = BTreeSet::new();
    let mut errors = Vec::new();
    for path in paths {
        match normalize_path(path) {
            Ok(root) => {
                roots.insert(root);
            }
            Err(e) => {
                log::warn!("Skipping root: {}", e);
                errors.push(e);
            }
        }
    }
    (roots, errors)
}

/// Drop roots that live inside another root so no subtree is walked twice.
///
/// Relies on the component-wise ordering of `Path`: every descendant sorts
/// directly after its ancestor.
#[must_use]
pub fn collapse_nested(roots: &BTreeSet<PathBuf>) -> Vec<PathBuf> {
    let mut kept: Vec<PathBuf> = Vec::with_capacity(roots.len());
    for root in roots {
        match kept.last() {
            Some(outer) if root.starts_with(outer) => {
                log::debug!(
                    "Root {} is inside {}, not walking it twice",
                    root.display(),
                    outer.display()
                );
            }
            _ => kept.push(root.clone()),
        }
    }
    kept
}

/// Directories excluded from traversal.
///
/// Matching is by path prefix on whole components, never by substring.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkipSet {
    dirs: Vec<PathBuf>,
}

impl SkipSet {
    /// Build a skip set from already-absolute directories.
    ///
    /// Entries are NFC-normalized and stripped of `.`/`..` and trailing separators.
    pub fn new<I, P>(dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut dirs: Vec<PathBuf> = dirs
            .into_iter()
            .map(|d| normalize_pathbuf(&clean(d.as_ref())).into_owned())
            .collect();
        dirs.sort();
        dirs.dedup();
        Self { dirs }
    }

    /// Resolve user-supplied skip paths, returning the ones that do not exist.
    ///
    /// A missing skip directory cannot prune anything, so it is reported and dropped.
    pub fn resolve<I, P>(paths: I) -> (Self, Vec<PathError>)
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let (dirs, errors) = normalize_each(paths);
        (Self::new(dirs), errors)
    }

    /// Whether `path` is one of the skip directories or lies beneath one.
    #[must_use]
    pub fn contains(&self, path: &Path) -> bool {
        if self.dirs.is_empty() {
            return false;
        }
        let path = normalize_pathbuf(path);
        self.dirs.iter().any(|dir| path.starts_with(dir))
    }

    /// Number of skip directories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.dirs.len()
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dirs.is_empty()
    }
}
