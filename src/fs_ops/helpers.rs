//! I/O error adapters.
//!
//! Wrap io::Error with the operation, the offending path and a platform-aware hint,
//! for use with map_err:
//!   fs::create_dir(dir).map_err(io_error_with_help("create container", dir))?;
//!   File::open(p).map_err(io_error_with_help_io("open source", p))?;

use std::io;
use std::path::Path;

use crate::errors::UndoError;

fn build_message(op: &str, path: &Path, e: &io::Error) -> String {
    let mut msg = format!("{} '{}': {}", op, path.display(), e);

    if let Some(code) = e.raw_os_error() {
        #[cfg(unix)]
        {
            let hint = match code {
                libc::EACCES | libc::EPERM => Some("permission denied; check ownership and write permissions."),
                libc::EXDEV => Some("cross-filesystem; atomic rename not possible."),
                libc::EBUSY => Some("resource busy; ensure no other process is using it."),
                libc::ENOENT => Some("path not found; verify it exists."),
                libc::EEXIST => Some("already exists."),
                libc::ENOTEMPTY => Some("directory not empty."),
                libc::ENOSPC => Some("insufficient space on device."),
                libc::EROFS => Some("read-only filesystem; cannot write here."),
                libc::ELOOP => Some("too many symbolic link levels; possible symlink cycle."),
                libc::ENAMETOOLONG => Some("filename or path too long."),
                libc::EMFILE => Some("process file descriptor limit reached."),
                _ => None,
            };
            if let Some(h) = hint {
                msg.push_str(" (");
                msg.push_str(h);
                msg.push(')');
            }
        }
        #[cfg(windows)]
        {
            let hint = match code {
                5 => Some("access denied; check permissions."),
                17 => Some("not same device; cross-filesystem move."),
                32 => Some("sharing violation; file is in use."),
                2 | 3 => Some("path not found; verify it exists."),
                80 | 183 => Some("already exists."),
                112 => Some("insufficient disk space."),
                206 => Some("filename or path too long."),
                _ => None,
            };
            if let Some(h) = hint {
                msg.push_str(" (");
                msg.push_str(h);
                msg.push(')');
            }
        }
        msg.push_str(&format!(" [os code: {}]", code));
    } else {
        let hint = match e.kind() {
            io::ErrorKind::PermissionDenied => Some("permission denied; check ownership and write permissions."),
            io::ErrorKind::NotFound => Some("path not found; verify it exists."),
            io::ErrorKind::AlreadyExists => Some("already exists."),
            _ => None,
        };
        if let Some(h) = hint {
            msg.push_str(" (");
            msg.push_str(h);
            msg.push(')');
        }
    }

    msg
}

/// Closure for `.map_err(...)` converting io::Error into `UndoError::Io`.
pub fn io_error_with_help<'a>(op: &'a str, path: &'a Path) -> impl FnOnce(io::Error) -> UndoError + 'a {
    move |e: io::Error| UndoError::Io {
        path: path.to_path_buf(),
        message: build_message(op, path, &e),
        source: e,
    }
}

/// Same as [`io_error_with_help`] for functions that stay in io::Result.
/// The original ErrorKind is preserved.
pub fn io_error_with_help_io<'a>(op: &'a str, path: &'a Path) -> impl FnOnce(io::Error) -> io::Error + 'a {
    move |e: io::Error| io::Error::new(e.kind(), build_message(op, path, &e))
}

/// Convert a walkdir failure into an Io error naming the entry that failed.
pub(crate) fn walk_error(root: &Path, err: walkdir::Error) -> UndoError {
    let path = err.path().unwrap_or(root).to_path_buf();
    let io_err = err
        .into_io_error()
        .unwrap_or_else(|| io::Error::other("filesystem loop detected"));
    io_error_with_help("walk directory", &path)(io_err)
}
