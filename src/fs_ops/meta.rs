//! Metadata preservation for the copy fallback.
//! A plain rename keeps metadata on its own; a copy only does when asked.

use filetime::{FileTime, set_file_times};
use std::fs;
use std::path::Path;

use crate::errors::Result;

use super::helpers::io_error_with_help;

/// Copy timestamps and (on Unix) permission bits from `src` to `dest` when `preserve` is set.
pub(super) fn maybe_preserve_metadata(src: &Path, dest: &Path, preserve: bool) -> Result<()> {
    if !preserve {
        return Ok(());
    }

    let meta = fs::metadata(src).map_err(io_error_with_help("stat", src))?;

    let at = FileTime::from_last_access_time(&meta);
    let mt = FileTime::from_last_modification_time(&meta);
    set_file_times(dest, at, mt).map_err(io_error_with_help("set timestamps on", dest))?;

    fs::set_permissions(dest, meta.permissions()).map_err(io_error_with_help("set permissions on", dest))?;

    Ok(())
}
