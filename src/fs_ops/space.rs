use std::path::Path;
use tracing::debug;

use crate::errors::{Result, UndoError};
use crate::platform::available_space;

use super::helpers::io_error_with_help;

/// Headroom kept free on the destination filesystem.
const CUSHION: u64 = 4 * 1024 * 1024;

pub(super) fn format_bytes(n: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    const GB: f64 = MB * 1024.0;
    let f = n as f64;
    if f >= GB {
        format!("{:.1} GiB", f / GB)
    } else if f >= MB {
        format!("{:.1} MiB", f / MB)
    } else if f >= KB {
        format!("{:.1} KiB", f / KB)
    } else {
        format!("{} B", n)
    }
}

/// Fail with InsufficientSpace when `required` bytes would not fit under `dst_dir`.
pub(super) fn ensure_space(dst_dir: &Path, required: u64) -> Result<()> {
    let available = available_space(dst_dir).map_err(io_error_with_help("query free space on", dst_dir))?;
    debug!(
        dest = %dst_dir.display(),
        need = %format_bytes(required),
        free = %format_bytes(available),
        "free space check"
    );
    if available < required.saturating_add(CUSHION) {
        return Err(UndoError::InsufficientSpace {
            required,
            available,
            dest: dst_dir.to_path_buf(),
        });
    }
    Ok(())
}
