//! File move implementation.
//! Attempts a rename; on cross-filesystem or other rename errors, falls back to
//! copy into a temp sibling, verify, then remove the source.

use std::fs;
use std::io;
use std::path::Path;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::errors::{Result, UndoError};
use crate::shutdown;

use super::atomic::try_atomic_move;
use super::copy::safe_copy_and_rename;
use super::helpers::io_error_with_help;
use super::meta::maybe_preserve_metadata;
use super::space::ensure_space;
use super::util::is_cross_device;

/// Move the file at `src` to exactly `dst`, creating dst's parent if needed.
/// An existing file at `dst` is replaced.
pub fn move_file(config: &Config, src: &Path, dst: &Path) -> Result<()> {
    if shutdown::is_requested() {
        return Err(UndoError::Interrupted);
    }

    if let Some(parent) = dst.parent() {
        fs::create_dir_all(parent).map_err(io_error_with_help("create destination directory", parent))?;
    }

    match try_atomic_move(src, dst) {
        Ok(()) => {
            info!(src = %src.display(), dest = %dst.display(), "Renamed file atomically");
            Ok(())
        }
        Err(e) => {
            #[cfg(unix)]
            let hint: &str = match e.raw_os_error() {
                _ if is_cross_device(&e) => "cross-filesystem; will copy instead",
                Some(code) if code == libc::EACCES || code == libc::EPERM => {
                    "permission denied; check destination perms"
                }
                _ => "falling back to copy",
            };

            #[cfg(not(unix))]
            let hint: &str = match e.kind() {
                _ if is_cross_device(&e) => "cross-filesystem; will copy instead",
                io::ErrorKind::PermissionDenied => "permission denied; check destination perms",
                _ => "falling back to copy",
            };

            if e.kind() == io::ErrorKind::NotFound && fs::symlink_metadata(src).is_err() {
                return Err(io_error_with_help("move file", src)(e));
            }

            warn!(error = %e, hint, "Atomic rename failed, using copy then remove");
            copy_then_remove(config, src, dst).map(|_| ())
        }
    }
}

/// Copy `src` over `dst`, check the byte count, then delete `src`.
///
/// If the copy is short the copy is discarded and `src` stays. If deleting
/// `src` fails the duplicate at `dst` is kept and the failure is returned.
pub fn copy_then_remove(config: &Config, src: &Path, dst: &Path) -> Result<u64> {
    let expected = fs::metadata(src).map_err(io_error_with_help("stat source file", src))?.len();

    if let Some(parent) = dst.parent() {
        ensure_space(parent, expected)?;
    }

    let bytes = safe_copy_and_rename(src, dst)?;
    if bytes != expected {
        let _ = fs::remove_file(dst);
        return Err(UndoError::Verification {
            path: dst.to_path_buf(),
            expected,
            actual: bytes,
        });
    }

    maybe_preserve_metadata(src, dst, config.preserve_metadata)?;

    if let Err(e) = fs::remove_file(src) {
        error!(
            src = %src.display(),
            dest = %dst.display(),
            "copied file but could not remove the source; both copies are left in place"
        );
        return Err(io_error_with_help("remove original file", src)(e));
    }

    info!(src = %src.display(), dest = %dst.display(), bytes, "Copied file and removed source");
    Ok(bytes)
}
