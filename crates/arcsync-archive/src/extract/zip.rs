use std::io::{Read, Seek};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::sanitize::{reject_symlinked_parents, sanitize_entry_path};

use super::{ensure_directory, write_file};

pub(super) fn extract<R: Read + Seek>(reader: R, destination: &Path) -> Result<(usize, u64)> {
    let mut archive = zip::ZipArchive::new(reader)?;
    let mut bytes = 0u64;

    for index in 0..archive.len() {
        let mut file = archive.by_index(index)?;
        let raw_path = PathBuf::from(file.name());
        let target = sanitize_entry_path(&raw_path, destination)?;
        reject_symlinked_parents(&target, destination)?;

        if file.is_dir() {
            ensure_directory(&target)?;
        } else {
            let mode = file.unix_mode();
            bytes += write_file(&mut file, &target, mode)?;
        }
    }

    Ok((archive.len(), bytes))
}
