//! Report formatters for inventory results.
//!
//! - [`text`]: human-readable summary, rankings and duplicate groups
//! - [`json`]: machine-readable JSON for scripting
//!
//! # Example
//!
//! ```no_run
//! use filestats::inventory::inventory_root;
//! use filestats::output::TextOutput;
//! use std::path::Path;
//!
//! let report = inventory_root(Path::new("/data"), "*.nii*").unwrap();
//! TextOutput::new(&report).write_to(&mut std::io::stdout()).unwrap();
//! ```

pub mod json;
pub mod text;

pub use json::{JsonOutput, JsonOutputError};
pub use text::TextOutput;
