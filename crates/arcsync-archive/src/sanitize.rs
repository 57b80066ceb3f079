use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};

/// Resolve an archive entry path against `base`.
///
/// Absolute entries and entries climbing out of `base` through `..` are
/// rejected. An entry that normalizes to nothing (such as `./`) resolves to
/// `base` itself.
pub fn sanitize_entry_path(entry: impl AsRef<Path>, base: impl AsRef<Path>) -> Result<PathBuf> {
    let entry = entry.as_ref();
    let base = base.as_ref();

    let relative = normalize_relative(entry).ok_or_else(|| Error::ZipSlip {
        entry: entry.to_path_buf(),
        resolved: base.join(entry),
    })?;

    Ok(base.join(relative))
}

/// Validate a symlink target found at `link` (already resolved inside `base`).
///
/// Returns the lexically resolved target, which must stay inside `base`.
pub fn sanitize_symlink_target(
    target: impl AsRef<Path>,
    link: impl AsRef<Path>,
    base: impl AsRef<Path>,
) -> Result<PathBuf> {
    let target = target.as_ref();
    let link = link.as_ref();
    let base = base.as_ref();

    if target.is_absolute() || target.has_root() {
        return Err(Error::AbsoluteSymlinkTarget {
            target: target.to_path_buf(),
            symlink: link.to_path_buf(),
        });
    }

    let link_dir = link
        .parent()
        .and_then(|p| p.strip_prefix(base).ok())
        .unwrap_or_else(|| Path::new(""));

    let escape = || Error::SymlinkEscape {
        target: target.to_path_buf(),
        resolved: link.parent().unwrap_or(base).join(target),
    };

    let relative = normalize_relative(&link_dir.join(target)).ok_or_else(escape)?;
    Ok(base.join(relative))
}

/// Reject `path` (already resolved inside `base`) when a directory between
/// `base` and `path` exists on disk as a symlink.
///
/// Links written by earlier entries are lexically in range but can still
/// point anywhere once chained (`l1 -> .`, `l1/l2 -> ..`), so anything
/// written beneath one is refused. The last component is not checked; the
/// writers replace an existing link there instead of following it.
pub fn reject_symlinked_parents(path: &Path, base: &Path) -> Result<()> {
    let relative = path
        .strip_prefix(base)
        .map_err(|_| Error::InvalidPath(path.to_path_buf()))?;

    let mut current = base.to_path_buf();
    let mut components = relative.components().peekable();
    while let Some(component) = components.next() {
        if components.peek().is_none() {
            break;
        }
        current.push(component);
        match fs::symlink_metadata(&current) {
            Ok(meta) if meta.file_type().is_symlink() => {
                return Err(Error::SymlinkInPath {
                    entry: path.to_path_buf(),
                    link: current,
                });
            }
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(Error::Io(e)),
        }
    }

    Ok(())
}

/// Lexically normalize a relative path; `None` if it is rooted or climbs above its start.
fn normalize_relative(path: &Path) -> Option<PathBuf> {
    let mut result = PathBuf::new();
    let mut depth = 0usize;

    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => return None,
            Component::CurDir => {}
            Component::ParentDir => {
                if depth == 0 {
                    return None;
                }
                result.pop();
                depth -= 1;
            }
            Component::Normal(part) => {
                result.push(part);
                depth += 1;
            }
        }
    }

    Some(result)
}
