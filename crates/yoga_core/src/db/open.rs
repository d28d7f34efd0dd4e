//! Connection lifecycle for the registration store.
//!
//! # Responsibility
//! - Open file or in-memory SQLite connections.
//! - Configure connection settings required by the registration flow.
//! - Trigger schema migrations before handing out a usable connection.
//! - Close connections explicitly so shutdown failures are observable.
//!
//! # Invariants
//! - Returned connections have migrations fully applied.
//! - Every open/close emits one `db_open`/`db_close` outcome event.

use super::migrations::apply_migrations;
use super::{DbError, DbResult};
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens (creating if absent) a SQLite database file and applies all
/// pending migrations.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    open_with("file", || Connection::open(path))
}

/// Opens an in-memory SQLite database and applies all pending migrations.
///
/// Each call yields an independent, empty database.
pub fn open_db_in_memory() -> DbResult<Connection> {
    open_with("memory", Connection::open_in_memory)
}

/// Closes a connection, flushing pending state.
///
/// On failure the error is logged and returned; the connection is dropped.
pub fn close_db(conn: Connection) -> DbResult<()> {
    match conn.close() {
        Ok(()) => {
            info!("event=db_close module=db status=ok");
            Ok(())
        }
        Err((_conn, err)) => {
            error!(
                "event=db_close module=db status=error error_code=db_close_failed error={}",
                err
            );
            Err(DbError::Close(err))
        }
    }
}

fn open_with(
    mode: &'static str,
    open: impl FnOnce() -> rusqlite::Result<Connection>,
) -> DbResult<Connection> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode={mode}");

    let mut conn = match open() {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={} duration_ms={} error_code=db_open_failed error={}",
                mode,
                started_at.elapsed().as_millis(),
                err
            );
            return Err(err.into());
        }
    };

    match bootstrap_connection(&mut conn) {
        Ok(applied) => {
            info!(
                "event=db_open module=db status=ok mode={} duration_ms={} migrations_applied={}",
                mode,
                started_at.elapsed().as_millis(),
                applied
            );
            Ok(conn)
        }
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={} duration_ms={} error_code=db_bootstrap_failed error={}",
                mode,
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

fn bootstrap_connection(conn: &mut Connection) -> DbResult<usize> {
    conn.busy_timeout(BUSY_TIMEOUT)?;
    apply_migrations(conn)
}
