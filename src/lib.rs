//! Core library for `rmundo`, a reversible `rm`.
//!
//! Targets are moved into per-backup containers under a backup store and
//! recorded in a SQLite ledger; `restore` moves them back by id.
//!
//! Layout:
//! - `fs_ops`: container allocation and file/directory relocation
//! - `ledger`: durable backup records
//! - `backup` / `restore`: orchestration over one item or a batch
//! - `config`, `platform`, `output`, `cli`: the ambient pieces the binary uses

pub mod backup;
pub mod batch;
pub mod cli;
pub mod config;
pub mod errors;
pub mod fs_ops;
pub mod ledger;
pub mod output;
pub mod platform;
pub mod restore;
pub mod shutdown;
pub mod utils;

pub use backup::{backup_batch, backup_entry};
pub use batch::{BatchReport, run_batch};
pub use config::{
    Config, ConfigSource, LoadedConfig, LogLevel, default_config_path, load_or_init, path_has_symlink_ancestor,
};
pub use errors::{Result, UndoError};
pub use fs_ops::{allocate_container, move_dir, move_entry, move_file};
pub use ledger::{BackupRecord, BackupStatus, EntryKind, Ledger};
pub use restore::{Finding, parse_ids, reconcile, restore, restore_batch};
