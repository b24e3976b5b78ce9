//! Quote store over a [`BlobStore`].

use crate::db::{open_collection, DbError};
use crate::model::table::QuoteTable;
use crate::repo::quote_repo::{QuoteRepository, RepoError, SqliteQuoteRepository};
use crate::storage::blob::{BlobError, BlobStore, FileRef, FolderId};
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::Write;
use std::time::Instant;
use tempfile::NamedTempFile;

/// File name marker that identifies collection files inside a folder.
pub const DEFAULT_COLLECTION_EXTENSION: &str = ".db";
/// Name used when a collection is created without an explicit name.
pub const DEFAULT_COLLECTION_NAME: &str = "new_database.db";

pub type StoreResult<T> = Result<T, StoreError>;

/// Store-level error for collection transfers.
#[derive(Debug)]
pub enum StoreError {
    /// Remote fetch/replace/create/delete failed.
    Blob(BlobError),
    /// Local extraction or serialization of the `quotes` table failed.
    Repo(RepoError),
    /// Local scratch file handling failed.
    Io(std::io::Error),
    CollectionNotFound(String),
    CollectionExists(String),
    InvalidCollectionName(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Blob(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::Io(err) => write!(f, "local scratch file error: {err}"),
            Self::CollectionNotFound(name) => write!(f, "collection not found: `{name}`"),
            Self::CollectionExists(name) => write!(f, "collection already exists: `{name}`"),
            Self::InvalidCollectionName(name) => write!(f, "invalid collection name: `{name}`"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Blob(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<BlobError> for StoreError {
    fn from(value: BlobError) -> Self {
        Self::Blob(value)
    }
}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Repo(RepoError::Db(value))
    }
}

impl From<std::io::Error> for StoreError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

/// Loads and saves whole collections through a blob store.
#[derive(Debug)]
pub struct QuoteStore<B: BlobStore> {
    blobs: B,
    extension: String,
}

impl<B: BlobStore> QuoteStore<B> {
    pub fn new(blobs: B) -> Self {
        Self::with_extension(blobs, DEFAULT_COLLECTION_EXTENSION)
    }

    /// Uses `extension` as the collection file name marker.
    pub fn with_extension(blobs: B, extension: impl Into<String>) -> Self {
        let extension = extension.into();
        let extension = if extension.trim().is_empty() {
            DEFAULT_COLLECTION_EXTENSION.to_string()
        } else {
            extension.trim().to_string()
        };
        Self { blobs, extension }
    }

    /// Lists collection files: names containing the extension marker.
    pub fn list(&self, folder: &FolderId) -> StoreResult<Vec<FileRef>> {
        let files = self.blobs.list(folder)?;
        Ok(files
            .into_iter()
            .filter(|file| file.name.contains(self.extension.as_str()))
            .collect())
    }

    /// Finds the collection file called exactly `name`.
    pub fn resolve(&self, folder: &FolderId, name: &str) -> StoreResult<FileRef> {
        self.list(folder)?
            .into_iter()
            .find(|file| file.name == name)
            .ok_or_else(|| StoreError::CollectionNotFound(name.to_string()))
    }

    /// Fetches `file` and extracts its `quotes` table.
    pub fn load(&self, file: &FileRef) -> StoreResult<QuoteTable> {
        let started_at = Instant::now();
        let result = self
            .blobs
            .fetch(file)
            .map_err(StoreError::from)
            .and_then(|bytes| decode_collection(&bytes));
        match &result {
            Ok(table) => info!(
                "event=collection_load module=store status=ok file={} rows={} duration_ms={}",
                file.name,
                table.len(),
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event=collection_load module=store status=error file={} duration_ms={} error={}",
                file.name,
                started_at.elapsed().as_millis(),
                err
            ),
        }
        result
    }

    /// Serializes `table` into a fresh collection file and replaces `file`.
    pub fn save(&self, file: &FileRef, table: &QuoteTable) -> StoreResult<FileRef> {
        let started_at = Instant::now();
        let result = encode_collection(table)
            .and_then(|bytes| self.blobs.replace(file, &bytes).map_err(StoreError::from));
        match &result {
            Ok(_) => info!(
                "event=collection_save module=store status=ok file={} rows={} duration_ms={}",
                file.name,
                table.len(),
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event=collection_save module=store status=error file={} duration_ms={} error={}",
                file.name,
                started_at.elapsed().as_millis(),
                err
            ),
        }
        result
    }

    /// Creates an empty collection file seeded with the `quotes` schema.
    ///
    /// The extension marker is appended when `name` lacks it.
    pub fn create(&self, folder: &FolderId, name: &str) -> StoreResult<FileRef> {
        let name = self.collection_file_name(name)?;
        if self.list(folder)?.iter().any(|file| file.name == name) {
            return Err(StoreError::CollectionExists(name));
        }

        let bytes = encode_collection(&QuoteTable::new())?;
        let created = self.blobs.create_file(folder, &name, &bytes)?;
        info!(
            "event=collection_create module=store status=ok folder={} file={}",
            folder, created.name
        );
        Ok(created)
    }

    /// Deletes the collection file called exactly `name`.
    ///
    /// Returns whether a match was found and removed.
    pub fn delete(&self, folder: &FolderId, name: &str) -> StoreResult<bool> {
        let Some(file) = self
            .blobs
            .list(folder)?
            .into_iter()
            .find(|file| file.name == name)
        else {
            info!(
                "event=collection_delete module=store status=ok folder={} file={} removed=false",
                folder, name
            );
            return Ok(false);
        };

        let removed = self.blobs.delete_file(&file)?;
        info!(
            "event=collection_delete module=store status=ok folder={} file={} removed={}",
            folder, name, removed
        );
        Ok(removed)
    }

    /// Raw content of `file`, used to roll a write back.
    pub fn snapshot(&self, file: &FileRef) -> StoreResult<Vec<u8>> {
        Ok(self.blobs.fetch(file)?)
    }

    /// Writes raw content captured by [`QuoteStore::snapshot`] back.
    pub fn restore(&self, file: &FileRef, bytes: &[u8]) -> StoreResult<()> {
        self.blobs.replace(file, bytes)?;
        Ok(())
    }

    fn collection_file_name(&self, name: &str) -> StoreResult<String> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Ok(DEFAULT_COLLECTION_NAME.to_string());
        }
        if trimmed.contains(['/', '\\']) || trimmed == "." || trimmed == ".." {
            return Err(StoreError::InvalidCollectionName(trimmed.to_string()));
        }
        if trimmed.contains(self.extension.as_str()) {
            Ok(trimmed.to_string())
        } else {
            Ok(format!("{trimmed}{}", self.extension))
        }
    }
}

/// Extracts the `quotes` table from raw collection file bytes.
///
/// Older files are migrated in the scratch copy; empty input reads as an
/// empty collection.
pub fn decode_collection(bytes: &[u8]) -> StoreResult<QuoteTable> {
    let mut scratch = scratch_file()?;
    scratch.write_all(bytes)?;
    scratch.flush()?;

    let mut conn = open_collection(scratch.path())?;
    let table = SqliteQuoteRepository::try_new(&mut conn)?.load_all()?;
    Ok(table)
}

/// Serializes `table` into the bytes of a complete collection file.
pub fn encode_collection(table: &QuoteTable) -> StoreResult<Vec<u8>> {
    let scratch = scratch_file()?;
    {
        let mut conn = open_collection(scratch.path())?;
        SqliteQuoteRepository::try_new(&mut conn)?.replace_all(table)?;
        conn.close().map_err(|(_, err)| DbError::from(err))?;
    }
    Ok(std::fs::read(scratch.path())?)
}

fn scratch_file() -> std::io::Result<NamedTempFile> {
    tempfile::Builder::new()
        .prefix("quotebook-")
        .suffix(".db")
        .tempfile()
}
