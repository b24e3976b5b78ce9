//! Session context for one active collection.
//!
//! # Responsibility
//! - Own the in-memory table of the selected collection.
//! - Route edits through the record editor and track unsaved changes.
//!
//! # Invariants
//! - `open`, `reload`, `switch_to` and `save` are the only points where the
//!   table is synchronized with the store.
//! - A failed load or save leaves the session state unchanged.

use crate::model::quote::{Quote, QuoteDraft, QuoteId};
use crate::model::table::QuoteTable;
use crate::service::editor::{
    delete_quotes, insert_quote, renumber_quotes, update_quote, EditError,
};
use crate::service::transfer::{copy_quotes, move_quotes, TransferError, TransferOutcome};
use crate::store::{QuoteStore, StoreError};
use crate::storage::blob::{BlobStore, FileRef, FolderId};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type SessionResult<T> = Result<T, SessionError>;

/// Session-level failure.
#[derive(Debug)]
pub enum SessionError {
    Store(StoreError),
    Edit(EditError),
    Transfer(TransferError),
    /// Switching away would discard unsaved edits.
    UnsavedChanges(String),
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
            Self::Edit(err) => write!(f, "{err}"),
            Self::Transfer(err) => write!(f, "{err}"),
            Self::UnsavedChanges(name) => {
                write!(f, "collection `{name}` has unsaved changes")
            }
        }
    }
}

impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::Edit(err) => Some(err),
            Self::Transfer(err) => Some(err),
            Self::UnsavedChanges(_) => None,
        }
    }
}

impl From<StoreError> for SessionError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<EditError> for SessionError {
    fn from(value: EditError) -> Self {
        Self::Edit(value)
    }
}

impl From<TransferError> for SessionError {
    fn from(value: TransferError) -> Self {
        Self::Transfer(value)
    }
}

/// One user's working context over one collection.
pub struct Session<B: BlobStore> {
    store: QuoteStore<B>,
    folder: FolderId,
    file: FileRef,
    table: QuoteTable,
    dirty: bool,
}

impl<B: BlobStore> Session<B> {
    /// Resolves `name` in `folder` and loads it.
    pub fn open(store: QuoteStore<B>, folder: FolderId, name: &str) -> SessionResult<Self> {
        let file = store.resolve(&folder, name)?;
        let table = store.load(&file)?;
        Ok(Self {
            store,
            folder,
            file,
            table,
            dirty: false,
        })
    }

    pub fn store(&self) -> &QuoteStore<B> {
        &self.store
    }

    pub fn folder(&self) -> &FolderId {
        &self.folder
    }

    pub fn file(&self) -> &FileRef {
        &self.file
    }

    pub fn table(&self) -> &QuoteTable {
        &self.table
    }

    /// Direct access for bulk edits; marks the session dirty.
    pub fn table_mut(&mut self) -> &mut QuoteTable {
        self.dirty = true;
        &mut self.table
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Loads another collection of the same folder.
    ///
    /// # Errors
    /// - `SessionError::UnsavedChanges` when the current table is dirty.
    pub fn switch_to(&mut self, name: &str) -> SessionResult<()> {
        if self.dirty {
            return Err(SessionError::UnsavedChanges(self.file.name.clone()));
        }
        let file = self.store.resolve(&self.folder, name)?;
        let table = self.store.load(&file)?;
        self.file = file;
        self.table = table;
        Ok(())
    }

    /// Drops unsaved edits and reloads the active collection.
    pub fn reload(&mut self) -> SessionResult<()> {
        self.table = self.store.load(&self.file)?;
        self.dirty = false;
        Ok(())
    }

    /// Writes the whole table back to the active collection file.
    pub fn save(&mut self) -> SessionResult<()> {
        self.file = self.store.save(&self.file, &self.table)?;
        self.dirty = false;
        Ok(())
    }

    pub fn insert(&mut self, draft: QuoteDraft) -> SessionResult<Quote> {
        let quote = insert_quote(&mut self.table, draft)?;
        self.dirty = true;
        Ok(quote)
    }

    pub fn update(&mut self, id: QuoteId, draft: QuoteDraft) -> SessionResult<Quote> {
        let quote = update_quote(&mut self.table, id, draft)?;
        self.dirty = true;
        Ok(quote)
    }

    pub fn delete(&mut self, ids: &[QuoteId]) -> SessionResult<Vec<Quote>> {
        let removed = delete_quotes(&mut self.table, ids)?;
        if !removed.is_empty() {
            self.dirty = true;
        }
        Ok(removed)
    }

    pub fn renumber(&mut self) -> Vec<(QuoteId, QuoteId)> {
        let changed = renumber_quotes(&mut self.table);
        if !changed.is_empty() {
            self.dirty = true;
        }
        changed
    }

    /// Copies quotes into collection `name`; the active table is untouched.
    pub fn copy_to(&self, name: &str, ids: &[QuoteId]) -> SessionResult<TransferOutcome> {
        let destination = self.store.resolve(&self.folder, name)?;
        Ok(copy_quotes(
            &self.store,
            &self.file,
            &self.table,
            ids,
            &destination,
        )?)
    }

    /// Moves quotes into collection `name` and saves both collections.
    ///
    /// Pending edits of the active table are saved along with the removal.
    pub fn move_to(&mut self, name: &str, ids: &[QuoteId]) -> SessionResult<TransferOutcome> {
        let destination = self.store.resolve(&self.folder, name)?;
        let outcome = move_quotes(
            &self.store,
            &self.file,
            &mut self.table,
            ids,
            &destination,
        )?;
        self.dirty = false;
        Ok(outcome)
    }
}
