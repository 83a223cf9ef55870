//! Connection bootstrap for file and in-memory beer stores.

use super::schema::ensure_schema;
use super::{DbError, DbResult};
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);
const IN_MEMORY: &str = ":memory:";

/// Opens the beer store at `path`, creating the file when missing.
///
/// The parent directory must already exist.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    let path = path.as_ref();
    prepare(path.display().to_string(), Connection::open(path))
}

/// Opens a private in-memory beer store. Every call starts empty.
pub fn open_db_in_memory() -> DbResult<Connection> {
    prepare(IN_MEMORY.to_string(), Connection::open_in_memory())
}

fn prepare(location: String, opened: rusqlite::Result<Connection>) -> DbResult<Connection> {
    let started_at = Instant::now();
    let prepared = opened
        .and_then(|conn| conn.busy_timeout(BUSY_TIMEOUT).map(|()| conn))
        .map_err(|source| DbError::Open {
            location: location.clone(),
            source,
        })
        .and_then(|mut conn| ensure_schema(&mut conn).map(|()| conn));

    let duration_ms = started_at.elapsed().as_millis();
    match &prepared {
        Ok(_) => info!(
            "event=db_open module=db status=ok location={} duration_ms={}",
            location, duration_ms
        ),
        Err(err) => error!(
            "event=db_open module=db status=error location={} duration_ms={} error={}",
            location, duration_ms, err
        ),
    }
    prepared
}
