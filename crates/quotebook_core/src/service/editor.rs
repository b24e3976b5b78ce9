//! Record editor over an in-memory quote table.
//!
//! # Responsibility
//! - Insert, overwrite, delete and renumber quotes.
//!
//! # Invariants
//! - Rejected edits leave the table unchanged.
//! - Unknown ids are reported as `EditError::NotFound`, never a panic.

use crate::model::quote::{Quote, QuoteDraft, QuoteId, ValidationError};
use crate::model::table::QuoteTable;
use log::debug;
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Editor error for record-level mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    Validation(ValidationError),
    NotFound(QuoteId),
    /// The table already holds `QuoteId::MAX`; run a renumber first.
    IdSpaceExhausted,
}

impl Display for EditError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "quote not found: {id}"),
            Self::IdSpaceExhausted => write!(f, "no quote id left after {}", QuoteId::MAX),
        }
    }
}

impl Error for EditError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::NotFound(_) | Self::IdSpaceExhausted => None,
        }
    }
}

impl From<ValidationError> for EditError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Appends a new quote built from `draft` and returns it.
///
/// # Errors
/// - `EditError::Validation(EmptyRecord)` when every field is blank.
/// - `EditError::IdSpaceExhausted` when no id follows the current maximum.
pub fn insert_quote(table: &mut QuoteTable, draft: QuoteDraft) -> Result<Quote, EditError> {
    draft.validate()?;
    let id = table.next_id().ok_or(EditError::IdSpaceExhausted)?;
    let quote = draft.into_new_quote(id);
    debug!("event=quote_insert module=editor status=ok id={}", quote.id);
    table.push(quote.clone());
    Ok(quote)
}

/// Overwrites every field of quote `id` with `draft`.
///
/// # Errors
/// - `EditError::NotFound` when no row has `id`.
/// - `EditError::Validation(EmptyRecord)` when every field is blank.
pub fn update_quote(
    table: &mut QuoteTable,
    id: QuoteId,
    draft: QuoteDraft,
) -> Result<Quote, EditError> {
    draft.validate()?;
    let quote = table.get_mut(id).ok_or(EditError::NotFound(id))?;
    draft.overwrite(quote);
    debug!("event=quote_update module=editor status=ok id={}", id);
    Ok(quote.clone())
}

/// Removes all quotes listed in `ids` and returns them in table order.
///
/// Nothing is removed when any id is unknown.
pub fn delete_quotes(table: &mut QuoteTable, ids: &[QuoteId]) -> Result<Vec<Quote>, EditError> {
    let wanted = require_ids(table, ids)?;
    let removed = table.remove_ids(&wanted);
    debug!(
        "event=quote_delete module=editor status=ok count={}",
        removed.len()
    );
    Ok(removed)
}

/// Compacts ids to `1..=len` in row order; returns changed `(old, new)` pairs.
pub fn renumber_quotes(table: &mut QuoteTable) -> Vec<(QuoteId, QuoteId)> {
    let changed = table.renumber();
    debug!(
        "event=quote_renumber module=editor status=ok changed={}",
        changed.len()
    );
    changed
}

/// Checks that every id exists and returns them as a set.
pub(crate) fn require_ids(
    table: &QuoteTable,
    ids: &[QuoteId],
) -> Result<HashSet<QuoteId>, EditError> {
    let mut wanted = HashSet::with_capacity(ids.len());
    for id in ids {
        if !table.contains(*id) {
            return Err(EditError::NotFound(*id));
        }
        wanted.insert(*id);
    }
    Ok(wanted)
}
