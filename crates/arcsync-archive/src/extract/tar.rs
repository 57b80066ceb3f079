use std::io::Read;
use std::path::Path;

use crate::error::{Error, Result};
use crate::format::TarCompress;
use crate::sanitize::{reject_symlinked_parents, sanitize_entry_path, sanitize_symlink_target};

use super::{ensure_directory, remove_existing_link, write_file, write_symlink};

pub(super) fn extract<R: Read>(
    reader: R,
    codec: TarCompress,
    destination: &Path,
) -> Result<(usize, u64)> {
    let mut archive = tar::Archive::new(codec.decoder(reader));
    let mut entries = 0usize;
    let mut bytes = 0u64;

    for entry in archive.entries().map_err(corrupted)? {
        let mut entry = entry.map_err(corrupted)?;

        let raw_path = entry.path().map_err(corrupted)?.into_owned();
        let entry_type = entry.header().entry_type();
        let mode = entry.header().mode().ok();
        let target = sanitize_entry_path(&raw_path, destination)?;
        reject_symlinked_parents(&target, destination)?;

        if entry_type.is_dir() {
            ensure_directory(&target)?;
        } else if entry_type.is_symlink() {
            let link_target = entry
                .link_name()
                .map_err(corrupted)?
                .ok_or_else(|| Error::InvalidPath(raw_path.clone()))?
                .into_owned();
            sanitize_symlink_target(&link_target, &target, destination)?;
            write_symlink(&link_target, &target)?;
        } else if entry_type.is_hard_link() {
            let source = entry
                .link_name()
                .map_err(corrupted)?
                .ok_or_else(|| Error::InvalidPath(raw_path.clone()))?
                .into_owned();
            let source = sanitize_entry_path(&source, destination)?;
            reject_symlinked_parents(&source, destination)?;
            write_hard_link(&source, &target)?;
        } else if entry_type.is_file() || entry_type.is_contiguous() {
            if target == destination {
                return Err(Error::InvalidPath(raw_path));
            }
            bytes += write_file(&mut entry, &target, mode).map_err(|e| match e {
                // gzip and tar framing errors surface while reading member data
                Error::ExtractionFailed { source, .. }
                    if source.kind() == std::io::ErrorKind::InvalidData
                        || source.kind() == std::io::ErrorKind::UnexpectedEof =>
                {
                    Error::Corrupted(source.to_string())
                }
                other => other,
            })?;
        } else {
            tracing::debug!(entry = %raw_path.display(), ?entry_type, "skipping tar entry");
            continue;
        }

        entries += 1;
    }

    Ok((entries, bytes))
}

fn write_hard_link(source: &Path, link: &Path) -> Result<()> {
    if let Some(parent) = link.parent() {
        ensure_directory(parent)?;
    }
    remove_existing_link(link)?;
    if link.exists() {
        std::fs::remove_file(link).map_err(|e| Error::ExtractionFailed {
            path: link.to_path_buf(),
            source: e,
        })?;
    }
    std::fs::hard_link(source, link).map_err(|e| Error::ExtractionFailed {
        path: link.to_path_buf(),
        source: e,
    })
}

fn corrupted(e: std::io::Error) -> Error { Error::Corrupted(e.to_string()) }
