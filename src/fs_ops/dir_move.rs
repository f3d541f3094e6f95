//! Directory move implementation.
//! Tries a rename first. Otherwise the tree is copied in full, verified, and only
//! then is the source removed. An aborted copy never touches the source.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use walkdir::{DirEntry, WalkDir};

use crate::config::Config;
use crate::errors::{Result, UndoError};
use crate::shutdown;

use super::copy::safe_copy_and_rename;
use super::helpers::{io_error_with_help, walk_error};
use super::meta::maybe_preserve_metadata;
use super::space::ensure_space;

/// Move the directory `src` to exactly `dst` (not into it).
pub fn move_dir(config: &Config, src: &Path, dst: &Path) -> Result<()> {
    if shutdown::is_requested() {
        return Err(UndoError::Interrupted);
    }

    if let Some(parent) = dst.parent() {
        fs::create_dir_all(parent).map_err(io_error_with_help("create destination directory", parent))?;
    }

    match fs::symlink_metadata(dst) {
        Err(e) if e.kind() == io::ErrorKind::NotFound => match fs::rename(src, dst) {
            Ok(()) => {
                info!(src = %src.display(), dest = %dst.display(), "Renamed directory atomically");
                return Ok(());
            }
            Err(e) => {
                warn!(error = %e, src = %src.display(), "Directory rename failed, copying tree instead");
            }
        },
        _ => {
            warn!(dest = %dst.display(), "Destination exists; merging tree by copy");
        }
    }

    copy_tree_then_remove(config, src, dst)
}

/// Two-phase tree move: mirror and verify everything, then delete `src` in one pass.
pub fn copy_tree_then_remove(config: &Config, src: &Path, dst: &Path) -> Result<()> {
    if let Err(e) = copy_and_verify(config, src, dst) {
        warn!(
            src = %src.display(),
            partial = %dst.display(),
            error = %e,
            "Directory copy aborted; source left intact, partial copy left at destination"
        );
        return Err(e);
    }

    fs::remove_dir_all(src).map_err(io_error_with_help("remove source directory", src))?;
    info!(src = %src.display(), dest = %dst.display(), "Copied directory tree and removed source");
    Ok(())
}

fn collect_entries(src: &Path) -> Result<Vec<DirEntry>> {
    WalkDir::new(src)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .map(|entry| entry.map_err(|e| walk_error(src, e)))
        .collect()
}

fn copy_and_verify(config: &Config, src: &Path, dst: &Path) -> Result<()> {
    let entries = collect_entries(src)?;

    let mut total: u64 = 0;
    for entry in entries.iter().filter(|e| e.file_type().is_file()) {
        let meta = entry.metadata().map_err(|e| walk_error(src, e))?;
        total = total.saturating_add(meta.len());
    }
    if let Some(parent) = dst.parent() {
        ensure_space(parent, total)?;
    }

    // (copied path, expected length)
    let mut copied: Vec<(PathBuf, u64)> = Vec::new();

    for entry in &entries {
        if shutdown::is_requested() {
            return Err(UndoError::Interrupted);
        }

        let rel = entry.path().strip_prefix(src).map_err(|_| {
            UndoError::InvalidArgument(format!(
                "'{}' is not under '{}'",
                entry.path().display(),
                src.display()
            ))
        })?;
        let target = dst.join(rel);
        let ftype = entry.file_type();

        if ftype.is_dir() {
            fs::create_dir_all(&target).map_err(io_error_with_help("create directory", &target))?;
        } else if ftype.is_file() {
            let expected = entry.metadata().map_err(|e| walk_error(src, e))?.len();
            safe_copy_and_rename(entry.path(), &target)?;
            maybe_preserve_metadata(entry.path(), &target, config.preserve_metadata)?;
            copied.push((target, expected));
        } else if ftype.is_symlink() {
            copy_symlink(entry.path(), &target)?;
        } else {
            return Err(UndoError::InvalidArgument(format!(
                "unsupported file type in tree: {}",
                entry.path().display()
            )));
        }
    }

    for (path, expected) in &copied {
        let actual = fs::metadata(path).map_err(io_error_with_help("stat copied file", path))?.len();
        if actual != *expected {
            return Err(UndoError::Verification {
                path: path.clone(),
                expected: *expected,
                actual,
            });
        }
    }

    Ok(())
}

#[cfg(unix)]
fn copy_symlink(link: &Path, target: &Path) -> Result<()> {
    let points_to = fs::read_link(link).map_err(io_error_with_help("read symlink", link))?;
    std::os::unix::fs::symlink(&points_to, target).map_err(io_error_with_help("create symlink", target))
}

#[cfg(not(unix))]
fn copy_symlink(link: &Path, _target: &Path) -> Result<()> {
    Err(UndoError::InvalidArgument(format!(
        "symlinks inside directories are not supported on this platform: {}",
        link.display()
    )))
}
