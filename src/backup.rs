//! Backing up: validate the target, give it a fresh container, move it in, record it.

use std::ffi::OsString;
use std::fs;
use std::path::Path;
use tracing::{error, info, warn};

use crate::batch::{BatchReport, run_batch};
use crate::config::Config;
use crate::errors::{Result, UndoError};
use crate::fs_ops::{allocate_container, detect_kind, move_entry};
use crate::ledger::{BackupRecord, EntryKind, Ledger};
use crate::utils::{absolute_path, ensure_not_store, reject_option_like};

/// Back up a single target and return its ledger record.
pub fn backup_entry(config: &Config, ledger: &Ledger, target: &Path) -> Result<BackupRecord> {
    reject_option_like(target.as_os_str())?;

    let source = absolute_path(target).map_err(|e| {
        UndoError::InvalidArgument(format!("cannot resolve '{}': {e}", target.display()))
    })?;
    let name = source
        .file_name()
        .ok_or_else(|| UndoError::InvalidArgument(format!("'{}' has no file name", target.display())))?
        .to_os_string();

    ensure_not_store(config, &source)?;
    let kind = detect_kind(&source)?;

    let container = allocate_container(&config.backups_path)?;
    let destination = container.join(&name);

    if let Err(e) = move_entry(config, &source, &destination, kind) {
        // the partial copy (if any) is kept for inspection; only drop an empty container
        if fs::remove_dir(&container).is_err() {
            warn!(container = %container.display(), "backup failed; container left in place");
        }
        return Err(e);
    }

    let id = match ledger.insert(&source, &destination, &container, kind) {
        Ok(id) => id,
        Err(e) => {
            error!(
                src = %source.display(),
                code = e.code(),
                kind = e.kind(),
                "could not record backup; moving the item back"
            );
            roll_back(config, &source, &destination, &container, kind);
            return Err(e);
        }
    };

    info!(id, src = %source.display(), dest = %destination.display(), %kind, "backed up");
    ledger.get_by_id(id)
}

fn roll_back(config: &Config, source: &Path, destination: &Path, container: &Path, kind: EntryKind) {
    match move_entry(config, destination, source, kind) {
        Ok(()) => {
            if let Err(e) = fs::remove_dir(container) {
                warn!(container = %container.display(), error = %e, "could not remove container after rollback");
            }
        }
        Err(e) => {
            error!(
                src = %source.display(),
                dest = %destination.display(),
                error = %e,
                "rollback failed; the item remains in the backup store without a record"
            );
        }
    }
}

/// Back up each target in order, stopping at the first failure.
pub fn backup_batch(config: &Config, ledger: &Ledger, targets: Vec<OsString>) -> BatchReport<OsString, BackupRecord> {
    run_batch(targets, |t| backup_entry(config, ledger, Path::new(t)))
}
