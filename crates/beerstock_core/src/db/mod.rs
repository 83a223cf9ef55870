//! SQLite beer store bootstrap.
//!
//! A connection handed out by this module is always on the current beer
//! schema; repositories never see an unprepared file.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod open;
pub mod schema;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Failure to prepare or use the beer store.
#[derive(Debug)]
pub enum DbError {
    /// The store at `location` could not be opened or configured.
    Open {
        location: String,
        source: rusqlite::Error,
    },
    /// Creating the beer schema failed; nothing was committed.
    Schema {
        version: u32,
        source: rusqlite::Error,
    },
    /// The file carries a schema written by a newer build.
    NewerSchema { found: u32, supported: u32 },
    /// A statement against a prepared store failed.
    Sqlite(rusqlite::Error),
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open { location, source } => {
                write!(f, "cannot open beer store `{location}`: {source}")
            }
            Self::Schema { version, source } => {
                write!(f, "cannot create beer schema v{version}: {source}")
            }
            Self::NewerSchema { found, supported } => write!(
                f,
                "beer store schema v{found} is newer than this build (v{supported})"
            ),
            Self::Sqlite(err) => write!(f, "{err}"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Open { source, .. } | Self::Schema { source, .. } => Some(source),
            Self::Sqlite(err) => Some(err),
            Self::NewerSchema { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
