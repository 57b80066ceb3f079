//! Filesystem primitives for the arcsync workspace directory.
//!
//! - [`workspace`] - creating and clearing the destination directory
//! - [`marker`] - per-resource timestamp marker files
//! - [`atomic`] - write-then-rename helpers for small state files

mod atomic;
mod error;
pub mod marker;
pub mod workspace;

pub use atomic::{AtomicWriteOptions, atomic_read, atomic_write};
pub use error::{Error, Result};
pub use marker::Marker;
pub use workspace::{clear_contents, ensure_dir};
