//! Collection file access.
//!
//! A collection is one SQLite file holding a single `quotes` table. Files
//! arrive as raw bytes from a blob store and may come from any earlier
//! revision of the format, so every open runs the migration ladder first.
//!
//! # Invariants
//! - The schema version lives in `PRAGMA user_version`; `0` means a legacy
//!   file that may or may not already have a `quotes` table.
//! - A file newer than this binary is refused, never downgraded.
//! - Bytes that are not SQLite at all surface as
//!   [`DbError::NotACollection`], not as a raw driver error.

use rusqlite::ErrorCode;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_collection, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// The file content is not an SQLite database.
    NotACollection(rusqlite::Error),
    /// The file was written by a newer schema than this binary knows.
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::NotACollection(_) => write!(f, "file is not a quote collection"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "collection schema version {db_version} is newer than supported {latest_supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) | Self::NotACollection(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        if value.sqlite_error_code() == Some(ErrorCode::NotADatabase) {
            Self::NotACollection(value)
        } else {
            Self::Sqlite(value)
        }
    }
}
