//! In-memory quote table.
//!
//! # Responsibility
//! - Hold the rows of one collection in their stored order.
//! - Own the identifier policy: `max(id) + 1`, or `1` for an empty table.
//!
//! # Invariants
//! - Ids are never reassigned implicitly; only [`QuoteTable::renumber`]
//!   changes existing ids.

use crate::model::quote::{Quote, QuoteId, ValidationError};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuoteTable {
    rows: Vec<Quote>,
}

impl QuoteTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rows(rows: Vec<Quote>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Quote] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Quote> {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Quote> {
        self.rows.iter()
    }

    pub fn get(&self, id: QuoteId) -> Option<&Quote> {
        self.rows.iter().find(|quote| quote.id == id)
    }

    pub fn get_mut(&mut self, id: QuoteId) -> Option<&mut Quote> {
        self.rows.iter_mut().find(|quote| quote.id == id)
    }

    pub fn contains(&self, id: QuoteId) -> bool {
        self.get(id).is_some()
    }

    /// Next id under the max-plus-one policy.
    ///
    /// `None` once the largest id is `QuoteId::MAX`.
    pub fn next_id(&self) -> Option<QuoteId> {
        match self.rows.iter().map(|quote| quote.id).max() {
            Some(max) => max.checked_add(1),
            None => Some(1),
        }
    }

    /// Appends a quote as-is. Callers are responsible for id uniqueness.
    pub fn push(&mut self, quote: Quote) {
        self.rows.push(quote);
    }

    /// Removes every row whose id is in `ids` and returns them in table order.
    pub fn remove_ids(&mut self, ids: &HashSet<QuoteId>) -> Vec<Quote> {
        let (removed, kept) = std::mem::take(&mut self.rows)
            .into_iter()
            .partition(|quote| ids.contains(&quote.id));
        self.rows = kept;
        removed
    }

    /// Reassigns ids to `1..=len` in current row order.
    ///
    /// Returns `(old_id, new_id)` pairs for rows whose id changed.
    pub fn renumber(&mut self) -> Vec<(QuoteId, QuoteId)> {
        let mut changed = Vec::new();
        for (idx, quote) in self.rows.iter_mut().enumerate() {
            let new_id = idx as QuoteId + 1;
            if quote.id != new_id {
                changed.push((quote.id, new_id));
                quote.id = new_id;
            }
        }
        changed
    }

    /// Sorted union of every row's tag set.
    pub fn known_tags(&self) -> BTreeSet<String> {
        self.rows.iter().flat_map(Quote::tag_set).collect()
    }

    /// Checks the persistence invariant: ids are unique.
    pub fn ensure_unique_ids(&self) -> Result<(), ValidationError> {
        let mut seen = HashSet::with_capacity(self.rows.len());
        for quote in &self.rows {
            if !seen.insert(quote.id) {
                return Err(ValidationError::DuplicateId(quote.id));
            }
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a QuoteTable {
    type Item = &'a Quote;
    type IntoIter = std::slice::Iter<'a, Quote>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::QuoteTable;
    use crate::model::quote::{QuoteDraft, ValidationError};
    use std::collections::HashSet;

    fn table_with_ids(ids: &[i64]) -> QuoteTable {
        QuoteTable::from_rows(
            ids.iter()
                .map(|id| QuoteDraft::new(format!("q{id}")).into_new_quote(*id))
                .collect(),
        )
    }

    #[test]
    fn next_id_is_max_plus_one_or_one_when_empty() {
        assert_eq!(QuoteTable::new().next_id(), Some(1));
        assert_eq!(table_with_ids(&[4, 2, 9]).next_id(), Some(10));
        assert_eq!(table_with_ids(&[-3]).next_id(), Some(-2));
    }

    #[test]
    fn next_id_is_none_at_the_top_of_the_id_space() {
        assert_eq!(table_with_ids(&[1, i64::MAX]).next_id(), None);
    }

    #[test]
    fn remove_ids_keeps_order_of_remaining_rows() {
        let mut table = table_with_ids(&[1, 2, 3, 4]);
        let removed = table.remove_ids(&HashSet::from([2, 4]));
        assert_eq!(removed.iter().map(|q| q.id).collect::<Vec<_>>(), vec![2, 4]);
        assert_eq!(table.iter().map(|q| q.id).collect::<Vec<_>>(), vec![1, 3]);
    }

    #[test]
    fn renumber_compacts_ids_in_row_order() {
        let mut table = table_with_ids(&[3, 7, 8]);
        let changed = table.renumber();
        assert_eq!(changed, vec![(3, 1), (7, 2), (8, 3)]);
        assert_eq!(table.next_id(), Some(4));
    }

    #[test]
    fn duplicate_ids_are_reported() {
        let table = table_with_ids(&[1, 2, 1]);
        assert_eq!(
            table.ensure_unique_ids(),
            Err(ValidationError::DuplicateId(1))
        );
    }
}
