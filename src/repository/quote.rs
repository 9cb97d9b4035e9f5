use crate::model::{Deadline, Expired, PersistenceError, Quote};
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, Connection};
use tokio::task;

const INSERT: &str = "INSERT INTO rates (code, codeIn, name, high, low, varBid, pctChange, bid, ask, timestamp, createDate) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)";

// VM instructions between deadline checks while a statement runs.
const PROGRESS_OPS: i32 = 1000;

pub struct QuoteRepository {
    pool: Pool<SqliteConnectionManager>,
}

impl QuoteRepository {
    pub fn new(pool: Pool<SqliteConnectionManager>) -> QuoteRepository {
        QuoteRepository { pool }
    }

    /// Appends one row for `row` in its own transaction. Either the whole row
    /// becomes visible or nothing does.
    pub async fn insert(&self, row: &Quote, deadline: Deadline) -> Result<(), PersistenceError> {
        row.validate()?;
        let timestamp = row.timestamp_secs()?;

        let pool = self.pool.clone();
        let row = row.clone();

        // The job observes the deadline itself; its result is what the database holds.
        task::spawn_blocking(move || write(&pool, &row, timestamp, deadline)).await?
    }
}

fn write(
    pool: &Pool<SqliteConnectionManager>,
    row: &Quote,
    timestamp: i64,
    deadline: Deadline,
) -> Result<(), PersistenceError> {
    if deadline.is_expired() {
        return Err(Expired.into());
    }

    let mut conn = pool.get_timeout(deadline.remaining())?;
    conn.busy_timeout(deadline.remaining())?;
    conn.progress_handler(PROGRESS_OPS, Some(move || deadline.is_expired()));

    let res = insert_in_transaction(&mut conn, row, timestamp, deadline);

    // The connection goes back to the pool, so the handler must not outlive this call.
    conn.progress_handler(0, None::<fn() -> bool>);
    res
}

fn insert_in_transaction(
    conn: &mut Connection,
    row: &Quote,
    timestamp: i64,
    deadline: Deadline,
) -> Result<(), PersistenceError> {
    let tx = conn.transaction()?;
    {
        let mut stmt = tx.prepare(INSERT)?;
        stmt.execute(params![
            &row.code,
            &row.code_in,
            &row.name,
            &row.high,
            &row.low,
            &row.var_bid,
            &row.pct_change,
            &row.bid,
            &row.ask,
            timestamp,
            &row.create_date,
        ])?;
    }
    if deadline.is_expired() {
        // Dropping `tx` rolls the insert back.
        return Err(Expired.into());
    }
    tx.commit()?;
    Ok(())
}
