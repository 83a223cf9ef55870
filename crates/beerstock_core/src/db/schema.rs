//! Beer store schema.
//!
//! The version lives in `PRAGMA user_version`. Version 0 is a fresh file and
//! gets the whole schema in one transaction; anything above
//! `SCHEMA_VERSION` is refused untouched.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;
use std::cmp::Ordering;

/// Schema version this build reads and writes.
pub const SCHEMA_VERSION: u32 = 1;

const BEERS_DDL: &str = include_str!("schema.sql");

/// Brings `conn` to `SCHEMA_VERSION`.
pub fn ensure_schema(conn: &mut Connection) -> DbResult<()> {
    let found = stored_version(conn)?;
    match found.cmp(&SCHEMA_VERSION) {
        Ordering::Equal => Ok(()),
        Ordering::Greater => Err(DbError::NewerSchema {
            found,
            supported: SCHEMA_VERSION,
        }),
        Ordering::Less => create_beers_schema(conn, found),
    }
}

/// Reads the schema version stamped on the file.
pub fn stored_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
}

fn create_beers_schema(conn: &mut Connection, found: u32) -> DbResult<()> {
    let schema_error = |source| DbError::Schema {
        version: SCHEMA_VERSION,
        source,
    };

    let tx = conn.transaction().map_err(schema_error)?;
    tx.execute_batch(BEERS_DDL).map_err(schema_error)?;
    tx.pragma_update(None, "user_version", SCHEMA_VERSION)
        .map_err(schema_error)?;
    tx.commit().map_err(schema_error)?;

    info!(
        "event=db_schema module=db status=ok from_version={} to_version={}",
        found, SCHEMA_VERSION
    );
    Ok(())
}
