//! Blob store contract and shared reference types.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

pub type BlobResult<T> = Result<T, BlobError>;

/// Identifier of a remote folder.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FolderId(String);

impl FolderId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for FolderId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Handle of one remote file as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileRef {
    /// Backend-assigned opaque id.
    pub id: String,
    /// Display file name, unique within a folder for lookups.
    pub name: String,
}

/// Remote storage failures.
#[derive(Debug)]
pub enum BlobError {
    NotFound(String),
    AlreadyExists(String),
    InvalidName(String),
    /// Remote side refused or could not be reached.
    Unavailable(String),
    Io(std::io::Error),
}

impl Display for BlobError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(what) => write!(f, "remote file not found: {what}"),
            Self::AlreadyExists(what) => write!(f, "remote file already exists: {what}"),
            Self::InvalidName(what) => write!(f, "invalid remote name: `{what}`"),
            Self::Unavailable(message) => write!(f, "remote storage unavailable: {message}"),
            Self::Io(err) => write!(f, "{err}"),
        }
    }
}

impl Error for BlobError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for BlobError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

/// Blocking whole-blob storage of collection files inside folders.
pub trait BlobStore {
    /// Lists every file directly inside `folder`.
    fn list(&self, folder: &FolderId) -> BlobResult<Vec<FileRef>>;
    /// Downloads the full content of `file`.
    fn fetch(&self, file: &FileRef) -> BlobResult<Vec<u8>>;
    /// Replaces the content of an existing file in place.
    fn replace(&self, file: &FileRef, bytes: &[u8]) -> BlobResult<FileRef>;
    /// Creates a new file inside `folder`.
    fn create_file(&self, folder: &FolderId, name: &str, bytes: &[u8]) -> BlobResult<FileRef>;
    /// Deletes `file`; returns `false` when it did not exist.
    fn delete_file(&self, file: &FileRef) -> BlobResult<bool>;
}

impl<T: BlobStore + ?Sized> BlobStore for Arc<T> {
    fn list(&self, folder: &FolderId) -> BlobResult<Vec<FileRef>> {
        (**self).list(folder)
    }

    fn fetch(&self, file: &FileRef) -> BlobResult<Vec<u8>> {
        (**self).fetch(file)
    }

    fn replace(&self, file: &FileRef, bytes: &[u8]) -> BlobResult<FileRef> {
        (**self).replace(file, bytes)
    }

    fn create_file(&self, folder: &FolderId, name: &str, bytes: &[u8]) -> BlobResult<FileRef> {
        (**self).create_file(folder, name, bytes)
    }

    fn delete_file(&self, file: &FileRef) -> BlobResult<bool> {
        (**self).delete_file(file)
    }
}

/// Validates one path segment used as a folder id or file name.
pub(crate) fn validate_segment(value: &str) -> BlobResult<()> {
    let trimmed = value.trim();
    if trimmed.is_empty()
        || trimmed != value
        || value == "."
        || value == ".."
        || value.contains(['/', '\\'])
    {
        return Err(BlobError::InvalidName(value.to_string()));
    }
    Ok(())
}
