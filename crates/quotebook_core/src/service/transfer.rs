//! Cross-collection copy and move.
//!
//! # Responsibility
//! - Append selected quotes to another collection under fresh ids.
//! - Make move all-or-nothing across the two collection files.
//!
//! # Invariants
//! - The destination is always reloaded from the store, never trusted from
//!   memory.
//! - Copied quotes get `dest max(id) + 1` onward; source ids are dropped.
//! - A failed move leaves the source table exactly as it was and restores
//!   the destination file, or reports `PartialFailure` when it cannot.

use crate::model::quote::{Quote, QuoteId};
use crate::model::table::QuoteTable;
use crate::service::editor::{require_ids, EditError};
use crate::store::{decode_collection, QuoteStore, StoreError};
use crate::storage::blob::{BlobStore, FileRef};
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Transfer failure.
#[derive(Debug)]
pub enum TransferError {
    /// Source and destination are the same collection file.
    SameCollection(String),
    /// A selected id is missing from the source, or the destination has no
    /// id left to assign.
    Edit(EditError),
    /// Destination load/save failed; nothing was changed.
    Store(StoreError),
    /// Source save failed after the destination was written; the
    /// destination was restored and nothing was changed.
    SourceSaveFailed { save_error: StoreError },
    /// Source save failed and the destination could not be restored either.
    /// The moved quotes now exist in both files.
    PartialFailure {
        save_error: StoreError,
        rollback_error: StoreError,
    },
}

impl Display for TransferError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SameCollection(name) => {
                write!(f, "source and destination are the same collection `{name}`")
            }
            Self::Edit(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
            Self::SourceSaveFailed { save_error } => write!(
                f,
                "saving the source collection failed, destination restored: {save_error}"
            ),
            Self::PartialFailure {
                save_error,
                rollback_error,
            } => write!(
                f,
                "move partially applied: source save failed ({save_error}) and destination restore failed ({rollback_error})"
            ),
        }
    }
}

impl Error for TransferError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::SameCollection(_) => None,
            Self::Edit(err) => Some(err),
            Self::Store(err) => Some(err),
            Self::SourceSaveFailed { save_error } => Some(save_error),
            Self::PartialFailure { save_error, .. } => Some(save_error),
        }
    }
}

impl From<EditError> for TransferError {
    fn from(value: EditError) -> Self {
        Self::Edit(value)
    }
}

impl From<StoreError> for TransferError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Result of a successful copy or move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferOutcome {
    pub destination: FileRef,
    /// Quotes as written to the destination, with their new ids.
    pub copied: Vec<Quote>,
    /// Ids the quotes had in the source table.
    pub source_ids: Vec<QuoteId>,
}

/// Copies quotes `ids` of `source` into the collection `destination`.
///
/// The source table is not modified.
pub fn copy_quotes<B: BlobStore>(
    store: &QuoteStore<B>,
    source_file: &FileRef,
    source: &QuoteTable,
    ids: &[QuoteId],
    destination: &FileRef,
) -> Result<TransferOutcome, TransferError> {
    let selected = select_for_transfer(source_file, source, ids, destination)?;
    let mut dest_table = store.load(destination)?;
    let outcome = append_copies(&mut dest_table, &selected, destination)?;
    store.save(destination, &dest_table)?;

    info!(
        "event=transfer_copy module=transfer status=ok from={} to={} count={}",
        source_file.name,
        destination.name,
        outcome.copied.len()
    );
    Ok(outcome)
}

/// Moves quotes `ids` of `source` into `destination`, persisting both files.
///
/// On success the quotes are gone from `source` and both collections are
/// saved. On failure `source` is unchanged; see [`TransferError`] for the
/// state of the destination.
pub fn move_quotes<B: BlobStore>(
    store: &QuoteStore<B>,
    source_file: &FileRef,
    source: &mut QuoteTable,
    ids: &[QuoteId],
    destination: &FileRef,
) -> Result<TransferOutcome, TransferError> {
    let selected = select_for_transfer(source_file, source, ids, destination)?;

    let dest_snapshot = store.snapshot(destination)?;
    let mut dest_table = decode_collection(&dest_snapshot)?;
    let outcome = append_copies(&mut dest_table, &selected, destination)?;
    store.save(destination, &dest_table)?;

    let before = source.clone();
    let wanted = require_ids(source, ids)?;
    source.remove_ids(&wanted);
    if let Err(save_error) = store.save(source_file, source) {
        *source = before;
        warn!(
            "event=transfer_move module=transfer status=rollback from={} to={}",
            source_file.name, destination.name
        );
        return match store.restore(destination, &dest_snapshot) {
            Ok(()) => Err(TransferError::SourceSaveFailed { save_error }),
            Err(rollback_error) => {
                error!(
                    "event=transfer_move module=transfer status=error from={} to={} error_code=rollback_failed error={}",
                    source_file.name, destination.name, rollback_error
                );
                Err(TransferError::PartialFailure {
                    save_error,
                    rollback_error,
                })
            }
        };
    }

    info!(
        "event=transfer_move module=transfer status=ok from={} to={} count={}",
        source_file.name,
        destination.name,
        outcome.copied.len()
    );
    Ok(outcome)
}

fn select_for_transfer(
    source_file: &FileRef,
    source: &QuoteTable,
    ids: &[QuoteId],
    destination: &FileRef,
) -> Result<Vec<Quote>, TransferError> {
    if source_file.id == destination.id {
        return Err(TransferError::SameCollection(destination.name.clone()));
    }
    let wanted = require_ids(source, ids)?;
    Ok(source
        .iter()
        .filter(|quote| wanted.contains(&quote.id))
        .cloned()
        .collect())
}

fn append_copies(
    dest_table: &mut QuoteTable,
    selected: &[Quote],
    destination: &FileRef,
) -> Result<TransferOutcome, TransferError> {
    let mut copied = Vec::with_capacity(selected.len());
    let mut source_ids = Vec::with_capacity(selected.len());
    for quote in selected {
        let mut copy = quote.clone();
        copy.id = dest_table.next_id().ok_or(EditError::IdSpaceExhausted)?;
        source_ids.push(quote.id);
        dest_table.push(copy.clone());
        copied.push(copy);
    }
    Ok(TransferOutcome {
        destination: destination.clone(),
        copied,
        source_ids,
    })
}
