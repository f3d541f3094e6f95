//! Typed error definitions for rmundo.
//! Every engine operation fails with one of these; the binary layers anyhow on top.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::ledger::BackupStatus;

pub type Result<T, E = UndoError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum UndoError {
    /// Filesystem failure. `message` already names the operation and path.
    #[error("{message}")]
    Io {
        path: PathBuf,
        message: String,
        #[source]
        source: io::Error,
    },

    #[error("no backup record with id {0}")]
    NotFound(i64),

    #[error("backup with id {id} is {actual}, expected {expected}")]
    InvalidState {
        id: i64,
        expected: BackupStatus,
        actual: BackupStatus,
    },

    #[error("ledger {context}: {source}")]
    Storage {
        context: String,
        #[source]
        source: rusqlite::Error,
    },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    InvalidArgument(String),

    #[error("copy of '{path}' has {actual} bytes, expected {expected}")]
    Verification {
        path: PathBuf,
        expected: u64,
        actual: u64,
    },

    #[error("Insufficient disk space for destination {dest}: need {required} bytes, have {available} bytes")]
    InsufficientSpace {
        required: u64,
        available: u64,
        dest: PathBuf,
    },

    #[error("Operation interrupted by user")]
    Interrupted,
}

impl UndoError {
    /// Stable numeric code, emitted as a structured log field.
    pub fn code(&self) -> i32 {
        match self {
            UndoError::InvalidArgument(_) => 2,
            UndoError::Io { .. } => 3,
            UndoError::NotFound(_) => 4,
            UndoError::InvalidState { .. } => 5,
            UndoError::Storage { .. } => 6,
            UndoError::Config(_) => 7,
            UndoError::Verification { .. } => 8,
            UndoError::InsufficientSpace { .. } => 9,
            UndoError::Interrupted => 130,
        }
    }

    /// Short machine-readable label.
    pub fn kind(&self) -> &'static str {
        match self {
            UndoError::Io { .. } => "io",
            UndoError::NotFound(_) => "not_found",
            UndoError::InvalidState { .. } => "invalid_state",
            UndoError::Storage { .. } => "storage",
            UndoError::Config(_) => "config",
            UndoError::InvalidArgument(_) => "invalid_argument",
            UndoError::Verification { .. } => "verification",
            UndoError::InsufficientSpace { .. } => "insufficient_space",
            UndoError::Interrupted => "interrupted",
        }
    }

    /// The io::ErrorKind behind an Io failure, if any.
    pub fn io_kind(&self) -> Option<io::ErrorKind> {
        match self {
            UndoError::Io { source, .. } => Some(source.kind()),
            _ => None,
        }
    }
}

/// Adapter for ledger calls: `.map_err(storage("insert record"))`.
pub(crate) fn storage(context: &str) -> impl FnOnce(rusqlite::Error) -> UndoError + '_ {
    move |source| UndoError::Storage {
        context: context.to_string(),
        source,
    }
}
