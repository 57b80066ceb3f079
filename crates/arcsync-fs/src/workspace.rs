//! Destination directory handling.

use std::fs;
use std::io;
use std::path::Path;

use crate::{Error, Result};

/// Create `dir` and its parents if absent.
pub fn ensure_dir(dir: impl AsRef<Path>) -> Result<()> {
    let dir = dir.as_ref();
    if dir.is_dir() {
        return Ok(());
    }
    fs::create_dir_all(dir).map_err(|e| Error::CreateDir {
        path: dir.to_path_buf(),
        source: e,
    })
}

/// Delete everything inside `dir`, keeping `dir` itself.
///
/// A missing directory counts as already empty. Returns the number of
/// top-level entries removed.
pub fn clear_contents(dir: impl AsRef<Path>) -> Result<usize> {
    let dir = dir.as_ref();
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(0),
        Err(e) => {
            return Err(Error::Read {
                path: dir.to_path_buf(),
                source: e,
            });
        }
    };

    let mut removed = 0;
    for entry in entries {
        let entry = entry.map_err(|e| Error::Read {
            path: dir.to_path_buf(),
            source: e,
        })?;
        let path = entry.path();
        // symlinks are removed, never followed
        let file_type = entry.file_type().map_err(|e| Error::Read {
            path: path.clone(),
            source: e,
        })?;
        let result = if file_type.is_dir() {
            fs::remove_dir_all(&path)
        } else {
            fs::remove_file(&path)
        };
        result.map_err(|e| Error::Remove {
            path: path.clone(),
            source: e,
        })?;
        removed += 1;
    }

    Ok(removed)
}
