use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::errors::{Result, UndoError};

/// Lexical absolute path (cwd-joined when relative); symlinks are not resolved.
pub(crate) fn absolute_path(path: &Path) -> io::Result<PathBuf> {
    std::path::absolute(path)
}

/// Reject targets that look like options (`-rf`, `--force`) before touching anything.
pub(crate) fn reject_option_like(target: &OsStr) -> Result<()> {
    if target.as_encoded_bytes().first() == Some(&b'-') {
        let shown = target.to_string_lossy();
        return Err(UndoError::InvalidArgument(format!(
            "unrecognized option '{shown}' (to remove a file whose name starts with '-', use ./{shown})"
        )));
    }
    if target.is_empty() {
        return Err(UndoError::InvalidArgument("empty path".into()));
    }
    Ok(())
}

/// Refuse to back up the store itself, anything inside it, or a directory enclosing it.
pub(crate) fn ensure_not_store(config: &Config, candidate: &Path) -> Result<()> {
    let cand = canonical_or_self(candidate);
    for (label, protected) in [
        ("app directory", &config.app_path),
        ("backups directory", &config.backups_path),
        ("ledger", &config.ledger_path),
    ] {
        let prot = canonical_or_self(protected);
        if cand == prot || cand.starts_with(&prot) || prot.starts_with(&cand) {
            return Err(UndoError::InvalidArgument(format!(
                "refusing to back up '{}': it overlaps the rmundo {label} '{}'",
                candidate.display(),
                protected.display()
            )));
        }
    }
    Ok(())
}

fn canonical_or_self(p: &Path) -> PathBuf {
    fs::canonicalize(p).unwrap_or_else(|_| p.to_path_buf())
}

/// Quick writable probe: create and remove a small file in `dir`.
/// Uses create_new to avoid clobbering existing files.
pub(crate) fn is_writable_probe(dir: &Path) -> io::Result<()> {
    let probe = dir.join(format!(".rmundo_probe_{}.tmp", std::process::id()));
    fs::OpenOptions::new().create_new(true).write(true).open(&probe)?;
    let _ = fs::remove_file(&probe);
    Ok(())
}
