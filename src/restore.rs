//! Restoring: reverse a backup, remove its container, then mark it RESTORED.
//!
//! The status is advanced last. A crash part-way leaves either an intact
//! backup (retry the restore) or an item already back in place whose record is
//! still BACKED_UP; the next restore notices the latter and only finishes the
//! cleanup.

use serde::Serialize;
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;
use tracing::{info, warn};

use crate::batch::{BatchReport, run_batch};
use crate::config::Config;
use crate::errors::{Result, UndoError};
use crate::fs_ops::{io_error_with_help, move_entry};
use crate::ledger::{BackupRecord, BackupStatus, Ledger};

fn exists_no_follow(p: &Path) -> bool {
    fs::symlink_metadata(p).is_ok()
}

/// Restore backup `id` to its original path and return the updated record.
pub fn restore(config: &Config, ledger: &Ledger, id: i64) -> Result<BackupRecord> {
    let record = ledger.get_by_id(id)?;

    if record.status != BackupStatus::BackedUp {
        return Err(UndoError::InvalidState {
            id,
            expected: BackupStatus::BackedUp,
            actual: record.status,
        });
    }

    if !record.destination_path.starts_with(&record.container_path) {
        return Err(UndoError::InvalidArgument(format!(
            "backup {id}: container '{}' does not hold '{}'; refusing to touch it",
            record.container_path.display(),
            record.destination_path.display()
        )));
    }

    let dest_present = exists_no_follow(&record.destination_path);
    let source_present = exists_no_follow(&record.source_path);

    if !dest_present && source_present {
        warn!(
            id,
            src = %record.source_path.display(),
            "item is already back in place; finishing an interrupted restore"
        );
    } else {
        if source_present {
            warn!(id, src = %record.source_path.display(), "original path is occupied; it will be overwritten");
        }
        move_entry(config, &record.destination_path, &record.source_path, record.kind)?;
    }

    remove_container(&record.container_path)?;
    ledger.update_status(id, BackupStatus::Restored)?;

    info!(id, src = %record.source_path.display(), "restored");
    Ok(BackupRecord {
        status: BackupStatus::Restored,
        ..record
    })
}

fn remove_container(container: &Path) -> Result<()> {
    match fs::remove_dir_all(container) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(io_error_with_help("remove backup container", container)(e)),
    }
}

/// Parse a comma-separated id list such as `"1,2, 3"`.
pub fn parse_ids(raw: &str) -> Result<Vec<i64>> {
    if raw.trim().is_empty() {
        return Err(UndoError::InvalidArgument("please specify backup ids to restore".into()));
    }
    raw.split(',')
        .map(|tok| {
            let tok = tok.trim();
            tok.parse::<i64>()
                .map_err(|_| UndoError::InvalidArgument(format!("invalid backup id '{tok}'")))
        })
        .collect()
}

/// Restore each id in order, stopping at the first failure.
pub fn restore_batch(config: &Config, ledger: &Ledger, ids: Vec<i64>) -> BatchReport<i64, BackupRecord> {
    run_batch(ids, |id| restore(config, ledger, *id))
}

/// State of a BACKED_UP record compared with the filesystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Finding {
    /// The item sits in its container.
    Intact,
    /// The item is back at its source but the record was never advanced.
    PendingCleanup,
    /// Neither the container copy nor the source exists.
    Missing,
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Finding::Intact => "INTACT",
            Finding::PendingCleanup => "PENDING_CLEANUP",
            Finding::Missing => "MISSING",
        })
    }
}

/// Classify every BACKED_UP record. Read-only.
pub fn reconcile(ledger: &Ledger) -> Result<Vec<(BackupRecord, Finding)>> {
    let records = ledger.list_by_status(BackupStatus::BackedUp)?;
    Ok(records
        .into_iter()
        .map(|r| {
            let finding = if exists_no_follow(&r.destination_path) {
                Finding::Intact
            } else if exists_no_follow(&r.source_path) {
                Finding::PendingCleanup
            } else {
                Finding::Missing
            };
            (r, finding)
        })
        .collect())
}
