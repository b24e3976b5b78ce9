//! Quote repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Read every row of the fixed `quotes` table.
//! - Replace the full table content atomically.
//!
//! # Invariants
//! - Rows are returned in rowid order. `id` aliases rowid in the current
//!   schema, so saved collections reload sorted by id.
//! - `replace_all` never leaves a half-written table behind.

use crate::db::DbError;
use crate::model::quote::{Quote, ValidationError};
use crate::model::table::QuoteTable;
use rusqlite::types::ValueRef;
use rusqlite::{params, Connection, Row, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};

const QUOTE_SELECT_SQL: &str = "SELECT
    id,
    content,
    speaker,
    note,
    date,
    tag,
    link
FROM quotes
ORDER BY rowid ASC;";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for collection reads and writes.
#[derive(Debug)]
pub enum RepoError {
    Validation(ValidationError),
    Db(DbError),
    InvalidData(String),
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted quote data: {message}"),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "missing required column `{table}.{column}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::from(value))
    }
}

/// Repository interface for whole-table quote persistence.
pub trait QuoteRepository {
    /// Reads every quote of the collection.
    fn load_all(&self) -> RepoResult<QuoteTable>;
    /// Replaces the collection content with `table`.
    fn replace_all(&mut self, table: &QuoteTable) -> RepoResult<()>;
}

/// SQLite-backed quote repository.
pub struct SqliteQuoteRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteQuoteRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_quotes_table_ready(conn)?;
        Ok(Self { conn })
    }
}

impl QuoteRepository for SqliteQuoteRepository<'_> {
    fn load_all(&self) -> RepoResult<QuoteTable> {
        let mut stmt = self.conn.prepare(QUOTE_SELECT_SQL)?;
        let mut rows = stmt.query([])?;
        let mut quotes = Vec::new();
        while let Some(row) = rows.next()? {
            quotes.push(parse_quote_row(row)?);
        }
        Ok(QuoteTable::from_rows(quotes))
    }

    fn replace_all(&mut self, table: &QuoteTable) -> RepoResult<()> {
        table.ensure_unique_ids()?;

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        tx.execute("DELETE FROM quotes;", [])?;
        {
            let mut insert = tx.prepare(
                "INSERT INTO quotes (id, content, speaker, note, date, tag, link)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            )?;
            for quote in table {
                insert.execute(params![
                    quote.id,
                    quote.content.as_str(),
                    quote.speaker.as_str(),
                    quote.note.as_str(),
                    quote.date.as_str(),
                    quote.tag.as_str(),
                    quote.link.as_deref(),
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }
}

fn parse_quote_row(row: &Row<'_>) -> RepoResult<Quote> {
    let id = match row.get_ref("id")? {
        ValueRef::Integer(value) => value,
        ValueRef::Real(value) if value.fract() == 0.0 => value as i64,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid id value `{other:?}` in quotes.id"
            )))
        }
    };

    let link = text_or_empty(row, "link")?;
    Ok(Quote {
        id,
        content: text_or_empty(row, "content")?,
        speaker: text_or_empty(row, "speaker")?,
        note: text_or_empty(row, "note")?,
        date: text_or_empty(row, "date")?,
        tag: text_or_empty(row, "tag")?,
        link: if link.trim().is_empty() {
            None
        } else {
            Some(link)
        },
    })
}

/// Reads a loosely typed column as text; files written by other tools may
/// store numbers or NULL in text columns.
fn text_or_empty(row: &Row<'_>, column: &str) -> RepoResult<String> {
    match row.get_ref(column)? {
        ValueRef::Null => Ok(String::new()),
        ValueRef::Integer(value) => Ok(value.to_string()),
        ValueRef::Real(value) => Ok(value.to_string()),
        ValueRef::Text(bytes) => Ok(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(_) => Err(RepoError::InvalidData(format!(
            "blob value in quotes.{column}"
        ))),
    }
}

fn ensure_quotes_table_ready(conn: &Connection) -> RepoResult<()> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = 'quotes'
        );",
        [],
        |row| row.get(0),
    )?;
    if exists != 1 {
        return Err(RepoError::MissingRequiredTable("quotes"));
    }

    for column in ["id", "content", "speaker", "note", "date", "tag", "link"] {
        if !crate::db::migrations::table_has_column(conn, "quotes", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "quotes",
                column,
            });
        }
    }

    Ok(())
}
