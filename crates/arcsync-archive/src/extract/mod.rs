//! Extraction and copy implementations behind [`Materializer`].
//!
//! # Platform Behavior
//!
//! **Unix**: file mode bits recorded in the archive are applied to extracted files.
//!
//! **Windows**: mode bits are ignored.

use std::fs;
use std::io::{self, Read, Seek};
use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};
use crate::format::Materializer;
use crate::sanitize::sanitize_entry_path;

mod tar;
mod zip;

/// What a materialization wrote.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Materialized {
    pub kind:    Materializer,
    /// Entries written: archive members for archives, 1 for a raw copy.
    pub entries: usize,
    /// Bytes of file content written to disk.
    pub bytes:   u64,
}

impl Materializer {
    /// Materialize `reader` into `destination`, creating it first if absent.
    ///
    /// Archives are extracted at the destination root; raw content is copied
    /// to `destination/<file_name>`. A failure part way leaves whatever was
    /// already written in place.
    pub fn materialize<R: Read + Seek>(
        self,
        reader: R,
        destination: &Path,
        file_name: &str,
    ) -> Result<Materialized> {
        ensure_directory(destination)?;

        let (entries, bytes) = match self {
            Self::ZipLike => zip::extract(reader, destination)?,
            Self::GzipTar | Self::Tar => {
                let codec = self.tar_compress().unwrap_or(crate::TarCompress::None);
                tar::extract(reader, codec, destination)?
            }
            Self::Raw => copy_raw(reader, destination, file_name)?,
        };

        tracing::debug!(kind = %self, entries, bytes, dest = %destination.display(), "materialized");

        Ok(Materialized {
            kind: self,
            entries,
            bytes,
        })
    }
}

fn copy_raw<R: Read>(mut reader: R, destination: &Path, file_name: &str) -> Result<(usize, u64)> {
    let mut components = Path::new(file_name).components();
    let single = matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    );
    if !single {
        return Err(Error::InvalidPath(PathBuf::from(file_name)));
    }

    let target = sanitize_entry_path(file_name, destination)?;
    let bytes = write_file(&mut reader, &target, None)?;
    Ok((1, bytes))
}

pub(crate) fn write_file<R: Read + ?Sized>(
    reader: &mut R,
    target: &Path,
    mode: Option<u32>,
) -> Result<u64> {
    if let Some(parent) = target.parent() {
        ensure_directory(parent)?;
    }
    remove_existing_link(target)?;

    let mut file = fs::File::create(target).map_err(|e| Error::ExtractionFailed {
        path: target.to_path_buf(),
        source: e,
    })?;
    let written = io::copy(reader, &mut file).map_err(|e| Error::ExtractionFailed {
        path: target.to_path_buf(),
        source: e,
    })?;

    apply_mode(target, mode)?;
    Ok(written)
}

pub(crate) fn ensure_directory(path: &Path) -> Result<()> {
    if !path.is_dir() {
        fs::create_dir_all(path).map_err(|e| Error::DirectoryCreationFailed {
            path: path.to_path_buf(),
            source: e,
        })?;
    }
    Ok(())
}

/// Existing symlinks at an entry's location are replaced, never written through.
pub(crate) fn remove_existing_link(path: &Path) -> Result<()> {
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.file_type().is_symlink() => {
            fs::remove_file(path).map_err(|e| Error::ExtractionFailed {
                path: path.to_path_buf(),
                source: e,
            })
        }
        _ => Ok(()),
    }
}

#[cfg(unix)]
fn apply_mode(path: &Path, mode: Option<u32>) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    if let Some(mode) = mode {
        fs::set_permissions(path, fs::Permissions::from_mode(mode & 0o7777)).map_err(|e| {
            Error::ExtractionFailed {
                path: path.to_path_buf(),
                source: e,
            }
        })?;
    }
    Ok(())
}

#[cfg(not(unix))]
fn apply_mode(_path: &Path, _mode: Option<u32>) -> Result<()> { Ok(()) }

#[cfg(unix)]
pub(crate) fn write_symlink(target: &Path, link: &Path) -> Result<()> {
    if let Some(parent) = link.parent() {
        ensure_directory(parent)?;
    }
    remove_existing_link(link)?;
    std::os::unix::fs::symlink(target, link).map_err(|e| Error::SymlinkCreationFailed {
        target: target.to_path_buf(),
        link: link.to_path_buf(),
        source: e,
    })
}

#[cfg(windows)]
pub(crate) fn write_symlink(target: &Path, link: &Path) -> Result<()> {
    use std::os::windows::fs;
    if let Some(parent) = link.parent() {
        ensure_directory(parent)?;
    }
    remove_existing_link(link)?;
    let is_dir_target = target.to_string_lossy().ends_with('/')
        || link.parent().is_some_and(|p| p.join(target).is_dir());
    let result = if is_dir_target {
        fs::symlink_dir(target, link)
    } else {
        fs::symlink_file(target, link)
    };
    result.map_err(|e| Error::SymlinkCreationFailed {
        target: target.to_path_buf(),
        link: link.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use tempfile::tempdir;

    #[test]
    fn raw_copy_writes_named_file() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("work");

        let result = Materializer::Raw
            .materialize(Cursor::new(b"\x00\x01payload"), &dest, "data.bin")
            .unwrap();

        assert_eq!(result.entries, 1);
        assert_eq!(result.bytes, 9);
        assert_eq!(fs::read(dest.join("data.bin")).unwrap(), b"\x00\x01payload");
    }

    #[test]
    fn raw_copy_overwrites_previous_content() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("notes.txt"), "old and longer").unwrap();

        Materializer::Raw
            .materialize(Cursor::new(b"new"), dir.path(), "notes.txt")
            .unwrap();

        assert_eq!(fs::read_to_string(dir.path().join("notes.txt")).unwrap(), "new");
    }

    #[test]
    fn raw_copy_rejects_path_like_names() {
        let dir = tempdir().unwrap();
        for name in ["", "..", "a/b"] {
            let result = Materializer::Raw.materialize(Cursor::new(b"x"), dir.path(), name);
            assert!(matches!(result, Err(Error::InvalidPath(_))), "{name:?}");
        }
    }

    #[test]
    fn corrupt_zip_is_reported() {
        let dir = tempdir().unwrap();
        let result = Materializer::ZipLike.materialize(
            Cursor::new(vec![0xDE, 0xAD, 0xBE, 0xEF]),
            dir.path(),
            "broken.zip",
        );
        assert!(matches!(result, Err(Error::Corrupted(_))));
    }

    #[test]
    fn corrupt_gzip_is_reported() {
        let dir = tempdir().unwrap();
        let result = Materializer::GzipTar.materialize(
            Cursor::new(b"definitely not gzip".to_vec()),
            dir.path(),
            "broken.tar.gz",
        );
        assert!(result.is_err());
    }
}
