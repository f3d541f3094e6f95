use rusqlite::Connection;
use tracing::info;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS backups (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  src_path TEXT NOT NULL,
  dst_path TEXT NOT NULL,
  container_path TEXT,
  type VARCHAR(15) NOT NULL CHECK(type IN ('FILE','DIRECTORY')),
  status VARCHAR(15) NOT NULL CHECK(status IN ('BACKED_UP','RESTORED')),
  created_at DATETIME DEFAULT CURRENT_TIMESTAMP
);
"#;

fn has_column(conn: &Connection, table: &str, column: &str) -> rusqlite::Result<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", table))?;
    let columns = stmt
        .query_map([], |row| row.get::<_, String>(1))?
        .collect::<rusqlite::Result<Vec<String>>>()?;
    Ok(columns.iter().any(|c| c == column))
}

/// Create the table if needed and bring older layouts up to date. Idempotent.
pub(super) fn migrate(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "PRAGMA journal_mode = DELETE;
         PRAGMA synchronous = FULL;",
    )?;
    conn.execute_batch(SCHEMA)?;

    if !has_column(conn, "backups", "container_path")? {
        info!("[ledger] adding container_path column");
        conn.execute_batch("ALTER TABLE backups ADD COLUMN container_path TEXT")?;
    }

    Ok(())
}
