use chrono::{DateTime, NaiveDateTime, Utc};
use rusqlite::Row;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

/// Layout written by SQLite's `CURRENT_TIMESTAMP` in older ledgers.
const LEGACY_TIMESTAMP: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown {what}: '{value}'")]
pub struct ParseEnumError {
    what: &'static str,
    value: String,
}

/// What was relocated; decides which mover reverses it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryKind {
    File,
    Directory,
}

impl EntryKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EntryKind::File => "FILE",
            EntryKind::Directory => "DIRECTORY",
        }
    }
}

/// Lifecycle of a record. BACKED_UP -> RESTORED, never back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BackupStatus {
    BackedUp,
    Restored,
}

impl BackupStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            BackupStatus::BackedUp => "BACKED_UP",
            BackupStatus::Restored => "RESTORED",
        }
    }
}

macro_rules! text_enum {
    ($ty:ty, $what:literal, [$($variant:path),+]) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.pad(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = ParseEnumError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $(
                    if s == $variant.as_str() {
                        return Ok($variant);
                    }
                )+
                Err(ParseEnumError { what: $what, value: s.to_string() })
            }
        }

        impl ToSql for $ty {
            fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
                Ok(ToSqlOutput::from(self.as_str()))
            }
        }

        impl FromSql for $ty {
            fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
                value
                    .as_str()?
                    .parse()
                    .map_err(|e: ParseEnumError| FromSqlError::Other(Box::new(e)))
            }
        }
    };
}

text_enum!(EntryKind, "entry kind", [EntryKind::File, EntryKind::Directory]);
text_enum!(BackupStatus, "backup status", [BackupStatus::BackedUp, BackupStatus::Restored]);

/// One relocation, as stored in the `backups` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupRecord {
    pub id: i64,
    pub source_path: PathBuf,
    pub destination_path: PathBuf,
    pub container_path: PathBuf,
    pub kind: EntryKind,
    pub status: BackupStatus,
    pub created_at: DateTime<Utc>,
}

fn parse_created_at(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, LEGACY_TIMESTAMP)
                .ok()
                .map(|naive| naive.and_utc())
        })
}

/// `created_at` column, RFC 3339 or the legacy layout.
struct StoredTimestamp(DateTime<Utc>);

impl FromSql for StoredTimestamp {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let raw = value.as_str()?;
        parse_created_at(raw)
            .map(StoredTimestamp)
            .ok_or_else(|| FromSqlError::Other(format!("unrecognized timestamp '{raw}'").into()))
    }
}

pub(super) fn row_to_record(row: &Row) -> rusqlite::Result<BackupRecord> {
    let destination_path = PathBuf::from(row.get::<_, String>("dst_path")?);
    // rows from before container_path existed: the container is the parent
    let container_path = match row.get::<_, Option<String>>("container_path")? {
        Some(c) => PathBuf::from(c),
        None => destination_path
            .parent()
            .map(PathBuf::from)
            .unwrap_or_else(|| destination_path.clone()),
    };

    Ok(BackupRecord {
        id: row.get("id")?,
        source_path: PathBuf::from(row.get::<_, String>("src_path")?),
        destination_path,
        container_path,
        kind: row.get("type")?,
        status: row.get("status")?,
        created_at: row.get::<_, StoredTimestamp>("created_at")?.0,
    })
}
