//! Copy into a temp sibling, then rename over the destination.
//! A reader of `dest` sees either the old file or the complete new one, never a partial copy.

use std::fs;
use std::path::Path;

use crate::errors::{Result, UndoError};

use super::atomic::try_atomic_move;
use super::helpers::io_error_with_help;
use super::{io_copy, util};

/// Copy `src` to `dest` through a temp file in dest's directory. Returns bytes copied.
pub fn safe_copy_and_rename(src: &Path, dest: &Path) -> Result<u64> {
    let dest_dir = dest
        .parent()
        .ok_or_else(|| UndoError::InvalidArgument(format!("destination has no parent: {}", dest.display())))?;

    fs::create_dir_all(dest_dir).map_err(io_error_with_help("create destination directory", dest_dir))?;

    let tmp_path = util::unique_temp_path(dest_dir);

    let bytes = match io_copy::copy_streaming(src, &tmp_path) {
        Ok(n) => n,
        Err(e) => {
            let _ = fs::remove_file(&tmp_path);
            return Err(io_error_with_help("copy", src)(e));
        }
    };

    if let Err(e) = try_atomic_move(&tmp_path, dest) {
        let _ = fs::remove_file(&tmp_path);
        return Err(io_error_with_help("rename temporary file into", dest)(e));
    }

    Ok(bytes)
}
