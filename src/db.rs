use anyhow::Result;
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;
use std::{fs::create_dir_all, path::Path};
use tracing::info;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS rates (
    code TEXT NOT NULL,
    codeIn TEXT NOT NULL,
    name TEXT NOT NULL,
    high TEXT NOT NULL,
    low TEXT NOT NULL,
    varBid TEXT NOT NULL,
    pctChange TEXT NOT NULL,
    bid TEXT NOT NULL,
    ask TEXT NOT NULL,
    timestamp INTEGER NOT NULL,
    createDate TEXT NOT NULL
);
"#;

pub fn init_schema(conn: &Connection) -> Result<()> {
    info!("Ensuring db schema");
    conn.execute_batch(SCHEMA)?;
    Ok(())
}

/// Connection pool over a file-backed database; the file and its parent
/// directory are created when missing.
pub fn pool(db_url: &str) -> Result<Pool<SqliteConnectionManager>> {
    if let Some(parent) = Path::new(db_url).parent() {
        if !parent.as_os_str().is_empty() {
            create_dir_all(parent)?;
        }
    }
    let manager = SqliteConnectionManager::file(db_url);
    Ok(Pool::new(manager)?)
}
