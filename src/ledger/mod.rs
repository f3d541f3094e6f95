//! Durable record of every relocation, backed by a single SQLite connection.
//!
//! The ledger stores state; it does not enforce the BACKED_UP -> RESTORED
//! transition. That check lives with the restore procedure.

mod record;
mod schema;

pub use record::{BackupRecord, BackupStatus, EntryKind, ParseEnumError};

use rusqlite::{Connection, OptionalExtension, params};
use std::path::Path;
use tracing::debug;

use crate::errors::{Result, UndoError, storage};

const SELECT_COLUMNS: &str = "SELECT id, src_path, dst_path, container_path, type, status, created_at FROM backups";

pub struct Ledger {
    conn: Connection,
}

fn path_text<'a>(what: &str, path: &'a Path) -> Result<&'a str> {
    path.to_str().ok_or_else(|| {
        UndoError::InvalidArgument(format!("{what} is not valid UTF-8: {}", path.display()))
    })
}

impl Ledger {
    /// Open (creating if needed) the ledger file at `path`. The parent directory must exist.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(storage("open"))?;
        debug!(ledger = %path.display(), "opened ledger");
        Self::init(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(storage("open"))?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self> {
        schema::migrate(&conn).map_err(storage("migrate schema"))?;
        Ok(Self { conn })
    }

    /// Record a completed relocation as BACKED_UP and return its new id.
    pub fn insert(&self, source: &Path, destination: &Path, container: &Path, kind: EntryKind) -> Result<i64> {
        let src = path_text("source path", source)?;
        let dst = path_text("destination path", destination)?;
        let cont = path_text("container path", container)?;
        let now = chrono::Utc::now().to_rfc3339();

        self.conn
            .execute(
                "INSERT INTO backups (src_path, dst_path, container_path, type, status, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![src, dst, cont, kind, BackupStatus::BackedUp, now],
            )
            .map_err(storage("insert record"))?;

        let id = self.conn.last_insert_rowid();
        debug!(id, src, dst, %kind, "ledger insert");
        Ok(id)
    }

    pub fn get_by_id(&self, id: i64) -> Result<BackupRecord> {
        self.conn
            .query_row(&format!("{SELECT_COLUMNS} WHERE id = ?1"), params![id], record::row_to_record)
            .optional()
            .map_err(storage("look up record"))?
            .ok_or(UndoError::NotFound(id))
    }

    /// Overwrite the status of `id`. No transition rules are applied here.
    pub fn update_status(&self, id: i64, status: BackupStatus) -> Result<()> {
        let changed = self
            .conn
            .execute("UPDATE backups SET status = ?1 WHERE id = ?2", params![status, id])
            .map_err(storage("update status"))?;
        if changed == 0 {
            return Err(UndoError::NotFound(id));
        }
        debug!(id, %status, "ledger status updated");
        Ok(())
    }

    /// Every record, oldest first.
    pub fn list_all(&self) -> Result<Vec<BackupRecord>> {
        self.query_records(&format!("{SELECT_COLUMNS} ORDER BY id ASC"), params![])
    }

    pub fn list_by_status(&self, status: BackupStatus) -> Result<Vec<BackupRecord>> {
        self.query_records(&format!("{SELECT_COLUMNS} WHERE status = ?1 ORDER BY id ASC"), params![status])
    }

    fn query_records(&self, sql: &str, args: &[&dyn rusqlite::ToSql]) -> Result<Vec<BackupRecord>> {
        let mut stmt = self.conn.prepare(sql).map_err(storage("prepare listing"))?;
        let rows = stmt
            .query_map(args, record::row_to_record)
            .map_err(storage("list records"))?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(storage("read record"))
    }
}
