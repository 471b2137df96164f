//! Connection opening and per-connection setup.

use super::migrations::apply_migrations;
use super::{DbResult, DbTarget};
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens `target`, applies connection pragmas and runs pending migrations.
///
/// Logs one `db_open` event with the outcome and elapsed time.
pub fn open(target: &DbTarget) -> DbResult<Connection> {
    let started_at = Instant::now();
    let mode = target.label();

    let result = connect(target).and_then(|mut conn| {
        configure(&conn, target)?;
        apply_migrations(&mut conn)?;
        Ok(conn)
    });

    let duration_ms = started_at.elapsed().as_millis();
    match &result {
        Ok(_) => info!("event=db_open module=db status=ok mode={mode} duration_ms={duration_ms}"),
        Err(err) => error!(
            "event=db_open module=db status=error mode={mode} duration_ms={duration_ms} error={err}"
        ),
    }
    result
}

/// Shorthand for [`open`] with [`DbTarget::File`].
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    open(&DbTarget::File(path.as_ref().to_path_buf()))
}

/// Shorthand for [`open`] with [`DbTarget::Memory`].
pub fn open_db_in_memory() -> DbResult<Connection> {
    open(&DbTarget::Memory)
}

fn connect(target: &DbTarget) -> DbResult<Connection> {
    let conn = match target {
        DbTarget::File(path) => Connection::open(path)?,
        DbTarget::Memory => Connection::open_in_memory()?,
    };
    Ok(conn)
}

fn configure(conn: &Connection, target: &DbTarget) -> DbResult<()> {
    conn.busy_timeout(BUSY_TIMEOUT)?;
    if let DbTarget::File(_) = target {
        // journal_mode returns the resulting mode as a row.
        conn.query_row("PRAGMA journal_mode = WAL;", [], |_| Ok(()))?;
    }
    Ok(())
}
