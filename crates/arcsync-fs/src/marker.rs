//! Timestamp marker files.
//!
//! A marker is an empty file stored beside the materialized content whose
//! modification time mirrors the remote change indicator observed at the
//! last successful download of a resource.

use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use filetime::FileTime;

use crate::{Error, Result};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Marker {
    path: PathBuf,
}

impl Marker {
    /// Marker for the resource whose file name is `file_name`, kept in `dir`
    /// as `.<file_name>-timestamp`.
    pub fn for_resource(dir: impl AsRef<Path>, file_name: &str) -> Self {
        Self {
            path: dir.as_ref().join(format!(".{file_name}-timestamp")),
        }
    }

    pub fn path(&self) -> &Path { &self.path }

    pub fn exists(&self) -> bool { self.path.is_file() }

    /// Modification time in epoch milliseconds, `None` when the marker is absent.
    pub fn timestamp(&self) -> Result<Option<i64>> {
        let metadata = match fs::metadata(&self.path) {
            Ok(m) => m,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(Error::Read {
                    path: self.path.clone(),
                    source: e,
                });
            }
        };
        let mtime = FileTime::from_last_modification_time(&metadata);
        Ok(Some(to_millis(mtime)))
    }

    /// True when the marker exists and records exactly `millis`.
    pub fn matches(&self, millis: i64) -> Result<bool> {
        Ok(self.timestamp()? == Some(millis))
    }

    /// Create the marker if needed and set its modification time to `millis`.
    pub fn touch(&self, millis: i64) -> Result<()> {
        OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(&self.path)
            .map_err(|e| Error::Write {
                path: self.path.clone(),
                source: e,
            })?;

        filetime::set_file_mtime(&self.path, from_millis(millis)).map_err(|e| Error::Timestamp {
            path: self.path.clone(),
            source: e,
        })
    }
}

fn to_millis(time: FileTime) -> i64 {
    time.unix_seconds() * 1000 + i64::from(time.nanoseconds() / 1_000_000)
}

fn from_millis(millis: i64) -> FileTime {
    let secs = millis.div_euclid(1000);
    let nanos = (millis.rem_euclid(1000) * 1_000_000) as u32;
    FileTime::from_unix_time(secs, nanos)
}
