use std::fs;
use std::path::Path;
use tracing::debug;

use crate::config::Config;
use crate::errors::{Result, UndoError};
use crate::ledger::EntryKind;

use super::dir_move::move_dir;
use super::file_move::move_file;
use super::helpers::io_error_with_help;

/// Classify `path` without following symlinks.
/// Symlinks and special files (sockets, fifos, devices) are refused.
pub fn detect_kind(path: &Path) -> Result<EntryKind> {
    let lmeta = fs::symlink_metadata(path).map_err(io_error_with_help("stat", path))?;
    let ftype = lmeta.file_type();

    if ftype.is_symlink() {
        Err(UndoError::InvalidArgument(format!("refusing to back up symlink: {}", path.display())))
    } else if ftype.is_file() {
        Ok(EntryKind::File)
    } else if ftype.is_dir() {
        Ok(EntryKind::Directory)
    } else {
        Err(UndoError::InvalidArgument(format!(
            "path is neither a regular file nor a directory: {}",
            path.display()
        )))
    }
}

/// Move `src` to `dst` with the mover matching `kind`.
pub fn move_entry(config: &Config, src: &Path, dst: &Path, kind: EntryKind) -> Result<()> {
    debug!(src = %src.display(), dest = %dst.display(), %kind, "dispatch move_entry");
    match kind {
        EntryKind::File => move_file(config, src, dst),
        EntryKind::Directory => move_dir(config, src, dst),
    }
}
