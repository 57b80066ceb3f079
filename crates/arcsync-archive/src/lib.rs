//! Materialization of downloaded resources into a destination directory.
//!
//! # Architecture
//!
//! - `format.rs` - [`Materializer`] selection from a file name
//! - `sanitize.rs` - Path sanitization (zip-slip prevention)
//! - `extract/` - Per-format implementations and raw copy

pub use error::{Error, Result};
pub use extract::Materialized;
pub use format::{Materializer, TarCompress};
pub use sanitize::{reject_symlinked_parents, sanitize_entry_path, sanitize_symlink_target};

mod error;
mod extract;
mod format;
mod sanitize;
